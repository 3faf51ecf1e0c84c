//! # booking-store: Record Store Gateway
//!
//! Persists and retrieves [`Booking`](booking_core::Booking) records.
//!
//! The [`BookingGateway`] owns the request-independent rules: it stamps
//! `created_at`/`updated_at` with a single instant, parses identifiers
//! before any backend call, and turns a missing document into
//! [`StoreError::RecordNotFound`]. Storage itself sits behind the
//! [`BookingCollection`] trait:
//!
//! | Backend | Module | Use |
//! |---------|--------|-----|
//! | [`MongoCollection`] | [`mongo`] | production, one shared pooled client |
//! | [`MemoryCollection`] | [`memory`] | local development and tests |

pub mod collection;
pub mod error;
pub mod gateway;
pub mod memory;
pub mod mongo;

pub use collection::{BookingCollection, BookingDraft};
pub use error::StoreError;
pub use gateway::BookingGateway;
pub use memory::MemoryCollection;
pub use mongo::{MongoCollection, MongoSettings};
