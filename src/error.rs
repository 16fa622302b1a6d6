use axum::response::{IntoResponse, Response};
use axum::{http::StatusCode, Json};
use serde_json::json;
use tracing::error;

pub const INTERNAL_ERROR_MESSAGE: &str = "Something went wrong!";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(&'static str),
    #[error("Todo not found")]
    TodoNotFound,
    #[error("Route not found")]
    RouteNotFound,
    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::TodoNotFound | AppError::RouteNotFound => StatusCode::NOT_FOUND,
            AppError::Internal(ref detail) => {
                error!(%detail, "Request failed");
                return internal_error_response();
            }
        };

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

pub fn internal_error_response() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": INTERNAL_ERROR_MESSAGE })),
    )
        .into_response()
}

impl<T> From<std::sync::PoisonError<T>> for AppError {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        AppError::Internal(format!("todo store lock poisoned: {err}"))
    }
}
