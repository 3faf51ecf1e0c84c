//! # API Route Modules
//!
//! Everything here is mounted under `/api` behind the auth middleware:
//!
//! - `ping`: liveness check for authenticated clients.
//! - `bookings`: create, list, and fetch booking records through the
//!   record store gateway.
//! - `users`: the caller's account record from the identity provider.

pub mod bookings;
pub mod ping;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// All `/api` routes, without middleware.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(ping::router())
        .merge(bookings::router())
        .merge(users::router())
}
