use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use time::OffsetDateTime;

// Always three fractional digits, e.g. `2026-10-18T09:30:00.100Z`. Values are UTC.
time::serde::format_description!(
    iso_millis,
    OffsetDateTime,
    "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z"
);

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: i64,
    pub text: String,
    pub completed: bool,
    #[serde(with = "iso_millis")]
    pub created_at: OffsetDateTime,
    /// Unset until the first update.
    #[serde(with = "iso_millis::option", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<OffsetDateTime>,
}

/// `text` stays untyped so falsy non-strings can be told apart from other values.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateTodo {
    pub text: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTodo {
    /// `Some(Value::Null)` for an explicit `null`, `None` when the field is missing.
    #[serde(default, deserialize_with = "present")]
    pub text: Option<Value>,
    pub completed: Option<bool>,
}

fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, Serialize)]
pub struct DeletedTodo {
    pub message: &'static str,
    pub todo: Todo,
}

#[derive(Debug, Clone, Serialize)]
pub struct Health {
    pub status: &'static str,
    #[serde(with = "iso_millis")]
    pub timestamp: OffsetDateTime,
    pub service: &'static str,
}

/// Current UTC time, truncated to whole milliseconds.
pub fn now() -> OffsetDateTime {
    let now = OffsetDateTime::now_utc();
    now.replace_millisecond(now.millisecond()).unwrap_or(now)
}
