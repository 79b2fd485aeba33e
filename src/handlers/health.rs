use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use std::time::Instant;

use super::AppState;

/// Liveness plus a database ping when one is configured.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let start = Instant::now();

    let database = match &state.db {
        Some(db) => match crate::db::check_connection(db).await {
            Ok(()) => json!({ "status": "up", "latency_ms": start.elapsed().as_millis() as u64 }),
            Err(e) => {
                return (
                    StatusCode::SERVICE_UNAVAILABLE,
                    Json(json!({
                        "status": "down",
                        "version": env!("CARGO_PKG_VERSION"),
                        "database": { "status": "down", "error": e.response_message() }
                    })),
                );
            }
        },
        None => json!({ "status": "in-memory" }),
    };

    (
        StatusCode::OK,
        Json(json!({
            "status": "up",
            "version": env!("CARGO_PKG_VERSION"),
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "database": database
        })),
    )
}
