//! In-process booking backend.
//!
//! Keeps records in insertion order behind a `parking_lot::RwLock`. Locks
//! are taken and released inside each call; none is held across an await.

use std::sync::Arc;

use async_trait::async_trait;
use booking_core::{Booking, BookingId};
use parking_lot::RwLock;

use crate::collection::{BookingCollection, BookingDraft};
use crate::error::StoreError;

/// Thread-safe in-memory collection.
#[derive(Debug, Clone, Default)]
pub struct MemoryCollection {
    records: Arc<RwLock<Vec<Booking>>>,
}

impl MemoryCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

#[async_trait]
impl BookingCollection for MemoryCollection {
    async fn insert(&self, draft: &BookingDraft) -> Result<BookingId, StoreError> {
        let id = BookingId::generate();
        self.records.write().push(draft.clone().into_booking(id));
        Ok(id)
    }

    async fn find_all(&self) -> Result<Vec<Booking>, StoreError> {
        Ok(self.records.read().clone())
    }

    async fn find_by_id(&self, id: BookingId) -> Result<Option<Booking>, StoreError> {
        Ok(self.records.read().iter().find(|b| b.id == id).cloned())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
