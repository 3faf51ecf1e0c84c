#![deny(missing_docs)]

//! # booking-core: Domain Types for the Booking Service
//!
//! Foundational types shared by the storage gateway and the HTTP layer.
//! Depends only on `serde`, `thiserror`, `chrono`, `bson` (for the
//! storage-assigned object identifier), and `utoipa` (OpenAPI schemas).
//!
//! ## Types
//!
//! | Type | Role |
//! |------|------|
//! | [`Booking`] | A stored booking record |
//! | [`NewBooking`] | The creation payload accepted from clients |
//! | [`BookingId`] | 24-hex-digit identifier assigned by the store |
//! | [`ValidationError`] | Rejected identifiers and payloads |

pub mod booking;
pub mod error;
pub mod id;

pub use booking::{Booking, NewBooking};
pub use error::ValidationError;
pub use id::BookingId;
