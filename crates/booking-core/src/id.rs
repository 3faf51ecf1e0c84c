//! # Booking Identifier
//!
//! [`BookingId`] wraps the 12-byte object id the document store assigns on
//! insert. Its only textual form is 24 lowercase hexadecimal characters,
//! which is what appears in URLs and JSON bodies.

use std::fmt;
use std::str::FromStr;

use bson::oid::ObjectId;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ValidationError;

/// Identifier of a stored booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BookingId(ObjectId);

impl BookingId {
    /// Generate a fresh identifier. Only storage backends that assign ids
    /// themselves (the in-memory backend) should call this.
    pub fn generate() -> Self {
        Self(ObjectId::new())
    }

    /// Wrap an object id returned by the document store.
    pub fn from_object_id(id: ObjectId) -> Self {
        Self(id)
    }

    /// Access the underlying object id.
    pub fn as_object_id(&self) -> ObjectId {
        self.0
    }

    /// Parse the textual form, rejecting anything that is not exactly
    /// 24 hexadecimal characters.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        ObjectId::parse_str(raw)
            .map(Self)
            .map_err(|_| ValidationError::InvalidBookingId(raw.to_string()))
    }

    /// The 24-character lowercase hex form.
    pub fn to_hex(&self) -> String {
        self.0.to_hex()
    }
}

impl FromStr for BookingId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_hex())
    }
}

impl Serialize for BookingId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_hex())
    }
}

impl<'de> Deserialize<'de> for BookingId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
