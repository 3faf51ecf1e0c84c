//! # Record Store Gateway
//!
//! The only path handlers use to reach booking storage.

use std::fmt;
use std::sync::Arc;

use booking_core::{Booking, BookingId, NewBooking};
use chrono::{SubsecRound, Utc};

use crate::collection::{BookingCollection, BookingDraft};
use crate::error::StoreError;
use crate::memory::MemoryCollection;

/// Cheaply cloneable handle over a shared [`BookingCollection`].
#[derive(Clone)]
pub struct BookingGateway {
    collection: Arc<dyn BookingCollection>,
}

impl fmt::Debug for BookingGateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BookingGateway").finish_non_exhaustive()
    }
}

impl BookingGateway {
    /// Wrap a backend.
    pub fn new(collection: Arc<dyn BookingCollection>) -> Self {
        Self { collection }
    }

    /// Gateway over a fresh, empty in-memory backend.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryCollection::new()))
    }

    /// Stamp and store a new booking.
    ///
    /// Both timestamps come from one clock reading, truncated to
    /// milliseconds so the returned record matches what a later read
    /// from the document store yields.
    pub async fn create(&self, new: NewBooking) -> Result<Booking, StoreError> {
        let now = Utc::now().trunc_subsecs(3);
        let draft = BookingDraft {
            name: new.name,
            created_at: now,
            updated_at: now,
        };

        let id = self.collection.insert(&draft).await?;
        tracing::debug!(booking_id = %id, "booking created");
        Ok(draft.into_booking(id))
    }

    /// Every stored booking. No filtering, pagination, or ordering.
    pub async fn list_all(&self) -> Result<Vec<Booking>, StoreError> {
        self.collection.find_all().await
    }

    /// Fetch one booking by its textual identifier.
    ///
    /// A malformed identifier fails with [`StoreError::InvalidIdentifier`]
    /// without touching the backend.
    pub async fn get_by_id(&self, raw_id: &str) -> Result<Booking, StoreError> {
        let id = BookingId::parse(raw_id)?;
        self.collection
            .find_by_id(id)
            .await?
            .ok_or_else(|| StoreError::RecordNotFound(id.to_hex()))
    }

    /// Backend health check.
    pub async fn ping(&self) -> Result<(), StoreError> {
        self.collection.ping().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Backend that counts calls and delegates to an in-memory store.
    #[derive(Default)]
    struct CountingCollection {
        inner: MemoryCollection,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl BookingCollection for CountingCollection {
        async fn insert(&self, draft: &BookingDraft) -> Result<BookingId, StoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.insert(draft).await
        }
        async fn find_all(&self) -> Result<Vec<Booking>, StoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.find_all().await
        }
        async fn find_by_id(&self, id: BookingId) -> Result<Option<Booking>, StoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.find_by_id(id).await
        }
        async fn ping(&self) -> Result<(), StoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct DownCollection;

    #[async_trait]
    impl BookingCollection for DownCollection {
        async fn insert(&self, _draft: &BookingDraft) -> Result<BookingId, StoreError> {
            Err(StoreError::StorageWriteError("duplicate key".into()))
        }
        async fn find_all(&self) -> Result<Vec<Booking>, StoreError> {
            Err(StoreError::StorageUnavailable("connection refused".into()))
        }
        async fn find_by_id(&self, _id: BookingId) -> Result<Option<Booking>, StoreError> {
            Err(StoreError::StorageUnavailable("connection refused".into()))
        }
        async fn ping(&self) -> Result<(), StoreError> {
            Err(StoreError::StorageUnavailable("connection refused".into()))
        }
    }

    #[tokio::test]
    async fn create_stamps_equal_timestamps_within_window() {
        let gateway = BookingGateway::in_memory();
        let before = Utc::now().trunc_subsecs(3);
        let booking = gateway.create(NewBooking::new("Conference Room A")).await.unwrap();
        let after = Utc::now();

        assert_eq!(booking.created_at, booking.updated_at);
        assert!(booking.created_at >= before);
        assert!(booking.created_at <= after);
        assert_eq!(booking.created_at.timestamp_subsec_nanos() % 1_000_000, 0);
    }

    #[tokio::test]
    async fn create_then_get_preserves_name() {
        let gateway = BookingGateway::in_memory();
        let created = gateway.create(NewBooking::new("Desk 12")).await.unwrap();
        let fetched = gateway.get_by_id(&created.id.to_hex()).await.unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.name, "Desk 12");
    }

    #[tokio::test]
    async fn list_returns_every_created_booking() {
        let gateway = BookingGateway::in_memory();
        let mut expected = HashSet::new();
        for name in ["A", "B", "C", "D"] {
            expected.insert(gateway.create(NewBooking::new(name)).await.unwrap().id);
        }
        let listed: HashSet<_> = gateway
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.id)
            .collect();
        assert_eq!(listed, expected);
    }

    #[tokio::test]
    async fn list_on_empty_store_is_empty() {
        let gateway = BookingGateway::in_memory();
        assert!(gateway.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn malformed_id_never_reaches_backend() {
        let backend = Arc::new(CountingCollection::default());
        let gateway = BookingGateway::new(backend.clone());

        let err = gateway.get_by_id("not-a-valid-id").await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidIdentifier(_)));
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn unknown_id_is_record_not_found() {
        let backend = Arc::new(CountingCollection::default());
        let gateway = BookingGateway::new(backend.clone());

        let err = gateway
            .get_by_id("65a1f0c2b3d4e5f601234567")
            .await
            .unwrap_err();
        match err {
            StoreError::RecordNotFound(id) => assert_eq!(id, "65a1f0c2b3d4e5f601234567"),
            other => panic!("expected RecordNotFound, got {other:?}"),
        }
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn backend_failures_propagate() {
        let gateway = BookingGateway::new(Arc::new(DownCollection));

        assert!(matches!(
            gateway.create(NewBooking::new("x")).await,
            Err(StoreError::StorageWriteError(_))
        ));
        assert!(matches!(
            gateway.list_all().await,
            Err(StoreError::StorageUnavailable(_))
        ));
        assert!(matches!(
            gateway.get_by_id("65a1f0c2b3d4e5f601234567").await,
            Err(StoreError::StorageUnavailable(_))
        ));
        assert!(gateway.ping().await.is_err());
    }
}
