//! # Caller Account Endpoint
//!
//! `GET /api/user` and `GET /api/verify` return the identity provider's
//! account record for the authenticated caller, looked up by the email in
//! their verified token.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use booking_auth::UserRecord;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::CallerIdentity;
use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserDataResponse {
    #[serde(rename = "userData")]
    #[schema(value_type = Object)]
    pub user_data: UserRecord,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/user", get(current_user))
        .route("/api/verify", get(current_user))
}

/// GET /api/user: The caller's account record.
#[utoipa::path(
    get,
    path = "/api/user",
    responses(
        (status = 200, description = "Account record", body = UserDataResponse),
        (status = 401, description = "Missing or invalid credential", body = crate::error::ErrorBody),
        (status = 404, description = "No account for the caller's email", body = crate::error::ErrorBody),
        (status = 500, description = "Identity provider failure", body = crate::error::ErrorBody),
    ),
    tag = "users"
)]
pub async fn current_user(
    State(state): State<AppState>,
    caller: CallerIdentity,
) -> Result<Json<UserDataResponse>, AppError> {
    match state.users.lookup_by_email(caller.email()).await? {
        Some(user_data) => Ok(Json(UserDataResponse { user_data })),
        None => Err(AppError::NotFound("User record not found".to_string())),
    }
}
