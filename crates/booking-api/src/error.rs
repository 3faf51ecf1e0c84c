//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Folds gateway, credential, and directory errors into HTTP statuses and
//! a flat `{"error": "<message>"}` body.
//!
//! | Variant | Status |
//! |---------|--------|
//! | `BadRequest` | 400 |
//! | `Unauthorized` | 401 |
//! | `NotFound` | 404 |
//! | `Internal` | 500 |
//! | `ServiceUnavailable` | 503 |

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use booking_auth::{DirectoryError, VerificationError};
use booking_core::ValidationError;
use booking_store::StoreError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// JSON error response body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// Human-readable error message.
    pub error: String,
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// Malformed body or identifier (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Missing or rejected credential (401).
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Resource not found (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// A dependency failed (500). The cause is included in the response.
    #[error("internal error: {0}")]
    Internal(String),

    /// Not ready to serve (503). Used by the readiness check.
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn message(&self) -> &str {
        match self {
            Self::BadRequest(m)
            | Self::Unauthorized(m)
            | Self::NotFound(m)
            | Self::Internal(m)
            | Self::ServiceUnavailable(m) => m,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = ErrorBody {
            error: self.message().to_string(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::InvalidIdentifier(_) => Self::BadRequest(err.to_string()),
            StoreError::RecordNotFound(_) => Self::NotFound(err.to_string()),
            StoreError::StorageUnavailable(_) | StoreError::StorageWriteError(_) => {
                Self::Internal(err.to_string())
            }
        }
    }
}

impl From<VerificationError> for AppError {
    fn from(err: VerificationError) -> Self {
        if err.is_credential_failure() {
            Self::Unauthorized(err.to_string())
        } else {
            Self::Internal(err.to_string())
        }
    }
}

impl From<DirectoryError> for AppError {
    fn from(err: DirectoryError) -> Self {
        Self::Internal(format!("user lookup failed: {err}"))
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        Self::BadRequest(err.to_string())
    }
}
