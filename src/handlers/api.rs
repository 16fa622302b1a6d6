use axum::extract::State;
use axum::{http::StatusCode, Json};
use serde_json::Value;
use tracing::info;

use crate::error::AppError;
use crate::middleware::{JsonBody, TodoId};
use crate::models::{CreateTodo, DeletedTodo, Todo, UpdateTodo};
use crate::AppState;

pub async fn list_all_todos(State(state): State<AppState>) -> Result<Json<Vec<Todo>>, AppError> {
    let todos = state.store.list()?;
    info!(count = todos.len(), "Listed todos");
    Ok(Json(todos))
}

pub async fn get_single_todo(
    State(state): State<AppState>,
    TodoId(id): TodoId,
) -> Result<Json<Todo>, AppError> {
    let Some(id) = id else {
        return Err(AppError::TodoNotFound);
    };

    match state.store.get(id)? {
        Some(todo) => Ok(Json(todo)),
        None => Err(AppError::TodoNotFound),
    }
}

pub async fn create_new_todo(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CreateTodo>,
) -> Result<(StatusCode, Json<Todo>), AppError> {
    let text = required_text(req.text.as_ref())?;
    let todo = state.store.create(text)?;
    info!(?todo, "Created todo");
    Ok((StatusCode::CREATED, Json(todo)))
}

pub async fn update_existing_todo(
    State(state): State<AppState>,
    TodoId(id): TodoId,
    JsonBody(req): JsonBody<UpdateTodo>,
) -> Result<Json<Todo>, AppError> {
    let Some(id) = id else {
        return Err(AppError::TodoNotFound);
    };

    // Unknown ids are a 404 before the body is looked at.
    if state.store.get(id)?.is_none() {
        return Err(AppError::TodoNotFound);
    }
    let text = match req.text {
        None => None,
        Some(Value::String(text)) => Some(text),
        Some(other) => {
            return Err(AppError::Internal(format!(
                "todo text must be a string, got {other}"
            )));
        }
    };

    match state.store.update(id, text.as_deref(), req.completed)? {
        Some(todo) => {
            info!(?todo, "Updated todo");
            Ok(Json(todo))
        }
        None => Err(AppError::TodoNotFound),
    }
}

pub async fn delete_existing_todo(
    State(state): State<AppState>,
    TodoId(id): TodoId,
) -> Result<Json<DeletedTodo>, AppError> {
    let Some(id) = id else {
        return Err(AppError::TodoNotFound);
    };

    match state.store.delete(id)? {
        Some(todo) => {
            info!(?todo, "Deleted todo");
            Ok(Json(DeletedTodo {
                message: "Todo deleted successfully",
                todo,
            }))
        }
        None => Err(AppError::TodoNotFound),
    }
}

/// Trimmed, non-empty create text. Missing, blank and falsy values (`null`, `false`, `0`)
/// are a bad request; any other non-string is an internal error.
fn required_text(text: Option<&Value>) -> Result<&str, AppError> {
    const REQUIRED: AppError = AppError::BadRequest("Todo text is required");

    match text {
        None | Some(Value::Null) | Some(Value::Bool(false)) => Err(REQUIRED),
        Some(Value::Number(n)) if n.as_f64() == Some(0.0) => Err(REQUIRED),
        Some(Value::String(text)) => match text.trim() {
            "" => Err(REQUIRED),
            trimmed => Ok(trimmed),
        },
        Some(other) => Err(AppError::Internal(format!(
            "todo text must be a string, got {other}"
        ))),
    }
}

/// Fallback for any path or method without a handler.
pub async fn route_not_found() -> AppError {
    AppError::RouteNotFound
}
