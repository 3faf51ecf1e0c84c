//! # Static Providers
//!
//! In-process [`TokenVerifier`] and [`UserDirectory`] backed by fixed
//! tables. Used by tests and by local runs that have no identity provider
//! project to talk to.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use crate::directory::{UserDirectory, UserRecord};
use crate::error::{DirectoryError, VerificationError};
use crate::identity::Claims;
use crate::verifier::TokenVerifier;

/// Shared view of how many times a provider was consulted.
#[derive(Debug, Clone, Default)]
pub struct CallCounter(Arc<AtomicUsize>);

impl CallCounter {
    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    fn bump(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

/// Accepts exactly the tokens it was configured with.
#[derive(Debug, Clone, Default)]
pub struct StaticTokenVerifier {
    tokens: HashMap<String, Claims>,
    unavailable: bool,
    calls: CallCounter,
}

impl StaticTokenVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// A verifier that behaves as if the provider were down.
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    /// Accept `token`, yielding `claims`.
    pub fn with_claims(mut self, token: impl Into<String>, claims: Claims) -> Self {
        self.tokens.insert(token.into(), claims);
        self
    }

    /// Accept `token` as belonging to `email`.
    pub fn with_email(self, token: impl Into<String>, email: impl Into<String>) -> Self {
        let token = token.into();
        let email: String = email.into();
        let mut claims = Claims::new();
        claims.insert("sub".into(), format!("uid-{token}").into());
        claims.insert("email".into(), email.into());
        self.with_claims(token, claims)
    }

    pub fn call_counter(&self) -> CallCounter {
        self.calls.clone()
    }
}

#[async_trait]
impl TokenVerifier for StaticTokenVerifier {
    async fn verify_token(&self, token: &str) -> Result<Claims, VerificationError> {
        self.calls.bump();
        if self.unavailable {
            return Err(VerificationError::ProviderUnavailable(
                "static provider configured as unavailable".into(),
            ));
        }
        self.tokens
            .get(token)
            .cloned()
            .ok_or_else(|| VerificationError::invalid_token("token not registered"))
    }
}

/// Directory over a fixed set of accounts, keyed by email.
#[derive(Debug, Clone, Default)]
pub struct StaticUserDirectory {
    users: HashMap<String, UserRecord>,
    unavailable: bool,
}

impl StaticUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// A directory whose every lookup fails with an upstream error.
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    /// Register `record` under its email. Records without an email are
    /// unreachable by lookup and are ignored.
    pub fn with_user(mut self, record: UserRecord) -> Self {
        if let Some(email) = record.email.clone() {
            self.users.insert(email, record);
        }
        self
    }
}

#[async_trait]
impl UserDirectory for StaticUserDirectory {
    async fn lookup_by_email(&self, email: &str) -> Result<Option<UserRecord>, DirectoryError> {
        if self.unavailable {
            return Err(DirectoryError::ApiError {
                endpoint: "static directory".into(),
                status: 503,
                body: "configured as unavailable".into(),
            });
        }
        Ok(self.users.get(email).cloned())
    }
}
