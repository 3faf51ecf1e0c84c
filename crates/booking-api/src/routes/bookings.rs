//! # Booking Endpoints
//!
//! | Method | Path | Success |
//! |--------|------|---------|
//! | GET | `/api/bookings` | 200, every booking |
//! | GET | `/api/bookings/:id` | 200, one booking |
//! | POST | `/api/bookings/add` | 201, the created booking |
//!
//! Identifier parsing, timestamp stamping, and not-found detection live in
//! the gateway; handlers only bind input and translate errors.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use booking_core::{Booking, NewBooking};

use crate::auth::CallerIdentity;
use crate::error::AppError;
use crate::extractors::extract_validated_json;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/bookings", get(list_bookings))
        .route("/api/bookings/add", post(add_booking))
        .route("/api/bookings/:id", get(get_booking))
}

/// GET /api/bookings: List every booking.
#[utoipa::path(
    get,
    path = "/api/bookings",
    responses(
        (status = 200, description = "All bookings, unordered", body = [Booking]),
        (status = 401, description = "Missing or invalid credential", body = crate::error::ErrorBody),
        (status = 500, description = "Storage failure", body = crate::error::ErrorBody),
    ),
    tag = "bookings"
)]
pub async fn list_bookings(State(state): State<AppState>) -> Result<Json<Vec<Booking>>, AppError> {
    Ok(Json(state.bookings.list_all().await?))
}

/// GET /api/bookings/:id: Fetch one booking.
#[utoipa::path(
    get,
    path = "/api/bookings/{id}",
    params(("id" = String, Path, description = "24-character hex booking id")),
    responses(
        (status = 200, description = "Booking found", body = Booking),
        (status = 400, description = "Malformed id", body = crate::error::ErrorBody),
        (status = 401, description = "Missing or invalid credential", body = crate::error::ErrorBody),
        (status = 404, description = "No booking with this id", body = crate::error::ErrorBody),
        (status = 500, description = "Storage failure", body = crate::error::ErrorBody),
    ),
    tag = "bookings"
)]
pub async fn get_booking(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Booking>, AppError> {
    Ok(Json(state.bookings.get_by_id(&id).await?))
}

/// POST /api/bookings/add: Create a booking.
#[utoipa::path(
    post,
    path = "/api/bookings/add",
    request_body = NewBooking,
    responses(
        (status = 201, description = "Booking created", body = Booking),
        (status = 400, description = "Malformed body or missing name", body = crate::error::ErrorBody),
        (status = 401, description = "Missing or invalid credential", body = crate::error::ErrorBody),
        (status = 500, description = "Storage failure", body = crate::error::ErrorBody),
    ),
    tag = "bookings"
)]
pub async fn add_booking(
    State(state): State<AppState>,
    caller: CallerIdentity,
    body: Result<Json<NewBooking>, JsonRejection>,
) -> Result<(StatusCode, Json<Booking>), AppError> {
    let new = extract_validated_json(body)?;
    let booking = state.bookings.create(new).await?;
    tracing::info!(booking_id = %booking.id, caller = %caller.email(), "booking added");
    Ok((StatusCode::CREATED, Json(booking)))
}
