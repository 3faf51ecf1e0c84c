use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PingResponse {
    pub message: String,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/ping", get(ping))
}

/// GET /api/ping: Authenticated hello.
#[utoipa::path(
    get,
    path = "/api/ping",
    responses(
        (status = 200, description = "Caller is authenticated", body = PingResponse),
        (status = 401, description = "Missing or invalid credential", body = crate::error::ErrorBody),
    ),
    tag = "system"
)]
pub async fn ping() -> Json<PingResponse> {
    Json(PingResponse {
        message: "Hello World".to_string(),
    })
}
