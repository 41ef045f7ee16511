/*
 * Responsibility
 * - GET /health (liveness, never behind the access middleware)
 */
use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;

pub async fn health() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({"status": "OK", "message": "Server is healthy and running"})),
    )
}
