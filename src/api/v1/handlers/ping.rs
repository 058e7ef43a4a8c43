/*
 * Responsibility
 * - GET /api/v1/ping
 * - reachable only when the caller's token carries an allowed group
 */
use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;

pub async fn ping() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"message": "pong"})))
}
