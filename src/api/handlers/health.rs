/*
 * Responsibility
 * - GET /health (疎通用)
 * - /api の外に置くので認証・商品ガードは通らない
 */
use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "ok"})))
}
