//! # Booking Records
//!
//! [`Booking`] is the sole domain entity. Its identifier is assigned by the
//! store on insert and both timestamps are stamped together at creation;
//! there is no update path, so `created_at == updated_at` holds for every
//! record.
//!
//! [`NewBooking`] is what clients send. Only `name` is read; any `id` or
//! timestamp fields in the payload are ignored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ValidationError;
use crate::id::BookingId;

/// A stored booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Booking {
    /// Store-assigned identifier, rendered as 24 hex characters.
    #[schema(value_type = String, example = "65a1f0c2b3d4e5f601234567")]
    pub id: BookingId,
    /// Display label.
    #[schema(example = "Conference Room A")]
    pub name: String,
    /// Creation instant (UTC, millisecond precision).
    pub created_at: DateTime<Utc>,
    /// Equal to `created_at`; records are never updated.
    pub updated_at: DateTime<Utc>,
}

/// Payload accepted by the create endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct NewBooking {
    /// Display label. Required and non-empty.
    #[schema(example = "Conference Room A")]
    pub name: String,
}

impl NewBooking {
    /// Construct a payload with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Check required-field binding: `name` must not be empty.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.is_empty() {
            return Err(ValidationError::MissingField("name"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> Booking {
        let at = Utc.with_ymd_and_hms(2024, 1, 12, 9, 30, 0).unwrap();
        Booking {
            id: BookingId::parse("65a1f0c2b3d4e5f601234567").unwrap(),
            name: "Conference Room A".to_string(),
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn booking_serializes_with_snake_case_fields() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["id"], "65a1f0c2b3d4e5f601234567");
        assert_eq!(json["name"], "Conference Room A");
        assert_eq!(json["created_at"], "2024-01-12T09:30:00Z");
        assert_eq!(json["updated_at"], "2024-01-12T09:30:00Z");
    }

    #[test]
    fn new_booking_ignores_extra_fields() {
        let payload: NewBooking = serde_json::from_str(
            r#"{"name":"Desk 4","id":"ffffffffffffffffffffffff","created_at":"2001-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(payload, NewBooking::new("Desk 4"));
    }

    #[test]
    fn new_booking_requires_name_field() {
        assert!(serde_json::from_str::<NewBooking>("{}").is_err());
        assert!(serde_json::from_str::<NewBooking>(r#"{"name":42}"#).is_err());
    }

    #[test]
    fn empty_name_fails_validation() {
        assert_eq!(
            NewBooking::new("").validate(),
            Err(ValidationError::MissingField("name"))
        );
        assert!(NewBooking::new("Desk 4").validate().is_ok());
    }
}
