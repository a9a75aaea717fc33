// handlers/public/root.rs - GET / and GET /health

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::config::StorageBackend;

pub async fn root() -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "name": "todo-api",
            "version": env!("CARGO_PKG_VERSION"),
            "description": "Multi-tenant to-do list backend",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "public_auth": "/api/auth/register, /api/auth/login (public)",
                "auth": "/api/auth/whoami, /api/auth/password (protected)",
                "user": "/api/user[/:id[/task-lists]] (protected)",
                "task_list": "/api/task-list[/:id[/tasks]] (protected)",
                "task": "/api/task[/:id] (protected)",
                "label": "/api/label[/:id] (protected)",
            }
        }
    }))
}

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();
    let backend = match state.store.backend() {
        StorageBackend::Postgres => "postgres",
        StorageBackend::Memory => "memory",
    };

    match state.store.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": backend
                }
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "error": true,
                    "message": "database unavailable",
                    "code": "SERVICE_UNAVAILABLE",
                    "data": {
                        "status": "degraded",
                        "timestamp": now,
                        "database": backend
                    }
                })),
            )
        }
    }
}
