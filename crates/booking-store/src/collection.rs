//! Backend seam for booking storage.

use async_trait::async_trait;
use booking_core::{Booking, BookingId};
use chrono::{DateTime, Utc};

use crate::error::StoreError;

/// A booking that has been stamped but not yet assigned an identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingDraft {
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BookingDraft {
    /// Attach the identifier the backend assigned.
    pub fn into_booking(self, id: BookingId) -> Booking {
        Booking {
            id,
            name: self.name,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Storage backend for bookings.
///
/// Implementations do not validate or stamp anything; that is the
/// gateway's job. Every method maps its native failures into
/// [`StoreError::StorageUnavailable`] or [`StoreError::StorageWriteError`].
#[async_trait]
pub trait BookingCollection: Send + Sync + 'static {
    /// Insert a draft and return the identifier the backend assigned.
    async fn insert(&self, draft: &BookingDraft) -> Result<BookingId, StoreError>;

    /// Every stored booking, in backend-native order.
    async fn find_all(&self) -> Result<Vec<Booking>, StoreError>;

    /// The booking with the given id, or `None`.
    async fn find_by_id(&self, id: BookingId) -> Result<Option<Booking>, StoreError>;

    /// Round-trip to the backend to confirm it is reachable.
    async fn ping(&self) -> Result<(), StoreError>;
}
