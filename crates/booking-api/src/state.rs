//! # Application State
//!
//! Long-lived clients built once at startup and shared by every request.
//! Each field is an `Arc`-backed handle, so cloning the state per request
//! is cheap and there is no global mutable state.

use std::sync::Arc;

use booking_auth::fixed::{StaticTokenVerifier, StaticUserDirectory};
use booking_auth::{CredentialVerifier, UserDirectory};
use booking_store::BookingGateway;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub bookings: BookingGateway,
    pub credentials: CredentialVerifier,
    pub users: Arc<dyn UserDirectory>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("bookings", &self.bookings)
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

impl AppState {
    pub fn new(
        bookings: BookingGateway,
        credentials: CredentialVerifier,
        users: Arc<dyn UserDirectory>,
    ) -> Self {
        Self {
            bookings,
            credentials,
            users,
        }
    }

    /// In-memory storage with static credential tables. Used by tests and
    /// local experiments that should not touch external services.
    pub fn with_static_auth(
        bookings: BookingGateway,
        tokens: StaticTokenVerifier,
        users: StaticUserDirectory,
    ) -> Self {
        Self::new(
            bookings,
            CredentialVerifier::new(Arc::new(tokens)),
            Arc::new(users),
        )
    }
}
