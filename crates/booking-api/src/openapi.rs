//! # OpenAPI Specification Assembly
//!
//! Collects every utoipa-documented route into one OpenAPI document,
//! served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI spec for the booking API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Booking API",
        version = "0.1.0",
        description = "Authenticated booking records backed by MongoDB, with caller account lookup through Firebase Authentication.",
        license(name = "BUSL-1.1")
    ),
    paths(
        crate::routes::ping::ping,
        crate::routes::bookings::list_bookings,
        crate::routes::bookings::get_booking,
        crate::routes::bookings::add_booking,
        crate::routes::users::current_user,
    ),
    components(schemas(
        booking_core::Booking,
        booking_core::NewBooking,
        crate::error::ErrorBody,
        crate::routes::ping::PingResponse,
        crate::routes::users::UserDataResponse,
    )),
    tags(
        (name = "system", description = "Service checks"),
        (name = "bookings", description = "Booking records"),
        (name = "users", description = "Caller account records"),
    )
)]
pub struct ApiDoc;

/// Serves the OpenAPI JSON spec at `/openapi.json`.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
