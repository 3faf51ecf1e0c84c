//! # booking-api: Booking HTTP Service
//!
//! Assembles the booking, ping, and user routers into a single Axum
//! application with shared middleware for authentication, tracing, and
//! metrics.
//!
//! ## Routes
//!
//! | Method | Path | Auth |
//! |--------|------|------|
//! | GET | `/api/ping` | yes |
//! | GET | `/api/bookings` | yes |
//! | GET | `/api/bookings/:id` | yes |
//! | POST | `/api/bookings/add` | yes |
//! | GET | `/api/user`, `/api/verify` | yes |
//! | GET | `/health/liveness`, `/health/readiness` | no |
//! | GET | `/metrics`, `/openapi.json` | no |
//!
//! ## Middleware Stack (Tower)
//!
//! TraceLayer → MetricsLayer → AuthLayer (`/api` only)
//!
//! ## Crate Policy
//!
//! - Sits at the top of the dependency DAG.
//! - No storage or identity-provider logic in route handlers; they bind
//!   input and delegate to the gateway and the auth clients.
//! - All errors map to `{"error": message}` responses via `AppError`.

pub mod auth;
pub mod bootstrap;
pub mod config;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

pub use error::AppError;
pub use state::AppState;

use axum::extract::State;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::get;
use axum::{Extension, Router};

use crate::middleware::metrics::{metrics_middleware, render_metrics, ApiMetrics};

/// Build the complete application router.
pub fn app(state: AppState) -> Router {
    let metrics = ApiMetrics::new();

    // Authenticated API routes.
    let api = routes::router()
        .layer(from_fn_with_state(
            state.credentials.clone(),
            auth::auth_middleware,
        ))
        .with_state(state.clone());

    // Unauthenticated health checks and service metadata.
    let ops = Router::new()
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness))
        .route("/metrics", get(render_metrics))
        .merge(openapi::router())
        .with_state(state);

    Router::new()
        .merge(ops)
        .merge(api)
        .layer(from_fn(metrics_middleware))
        .layer(middleware::tracing_layer::layer())
        .layer(Extension(metrics))
}

async fn liveness() -> &'static str {
    "ok"
}

/// Ready once the record store answers a ping.
async fn readiness(State(state): State<AppState>) -> Result<&'static str, AppError> {
    state.bookings.ping().await.map_err(|e| {
        tracing::warn!(error = %e, "readiness check failed");
        AppError::ServiceUnavailable(format!("record store unreachable: {e}"))
    })?;
    Ok("ready")
}
