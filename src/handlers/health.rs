use axum::Json;

use crate::models::{now, Health};

pub async fn health() -> Json<Health> {
    Json(Health {
        status: "OK",
        timestamp: now(),
        service: "todo-backend",
    })
}
