//! # Custom Extractors & Validation
//!
//! Provides the [`Validate`] trait for request DTOs and helpers that map
//! body rejections and required-field failures to 400.

use axum::extract::rejection::JsonRejection;
use axum::Json;
use booking_core::{NewBooking, ValidationError};

use crate::error::AppError;

/// Request types with binding rules beyond what serde checks.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

impl Validate for NewBooking {
    fn validate(&self) -> Result<(), ValidationError> {
        NewBooking::validate(self)
    }
}

/// Extract a JSON body, mapping any rejection (bad syntax, wrong content
/// type, missing fields) to [`AppError::BadRequest`].
pub fn extract_json<T>(result: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    result
        .map(|Json(v)| v)
        .map_err(|err| AppError::BadRequest(format!("invalid payload: {}", err.body_text())))
}

/// Extract a JSON body and apply [`Validate`].
pub fn extract_validated_json<T: Validate>(
    result: Result<Json<T>, JsonRejection>,
) -> Result<T, AppError> {
    let value = extract_json(result)?;
    value.validate()?;
    Ok(value)
}
