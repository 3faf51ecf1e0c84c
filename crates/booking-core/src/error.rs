//! Validation errors for booking domain primitives.

use thiserror::Error;

/// Validation failures raised before any storage call is made.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The identifier is not a 24-character hexadecimal object id.
    #[error("invalid booking id: \"{0}\" (expected 24 hexadecimal characters)")]
    InvalidBookingId(String),

    /// A required field is absent or empty.
    #[error("field \"{0}\" is required")]
    MissingField(&'static str),
}
