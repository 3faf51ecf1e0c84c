//! # Credential Verifier
//!
//! [`CredentialVerifier`] is the single entry point the HTTP layer calls,
//! once per request. It owns header parsing and identity projection and
//! delegates the cryptographic check to a [`TokenVerifier`].

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::VerificationError;
use crate::identity::{Claims, Identity};

/// Validates an opaque bearer token with an identity provider.
///
/// Implementations return [`VerificationError::InvalidToken`] for any
/// rejection and [`VerificationError::ProviderUnavailable`] when the
/// provider cannot be consulted.
#[async_trait]
pub trait TokenVerifier: Send + Sync + 'static {
    async fn verify_token(&self, token: &str) -> Result<Claims, VerificationError>;
}

/// Extract the token from a `"<scheme> <token>"` header value.
///
/// The scheme is required but not interpreted. A missing or blank value is
/// [`VerificationError::MissingCredential`]; any field count other than two
/// is [`VerificationError::MalformedHeader`].
pub fn bearer_token(header: Option<&str>) -> Result<&str, VerificationError> {
    let value = header
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(VerificationError::MissingCredential)?;

    let mut fields = value.split_whitespace();
    match (fields.next(), fields.next(), fields.next()) {
        (Some(_scheme), Some(token), None) => Ok(token),
        _ => Err(VerificationError::MalformedHeader),
    }
}

/// Shared, cheaply cloneable credential verifier.
#[derive(Clone)]
pub struct CredentialVerifier {
    tokens: Arc<dyn TokenVerifier>,
}

impl fmt::Debug for CredentialVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialVerifier").finish_non_exhaustive()
    }
}

impl CredentialVerifier {
    pub fn new(tokens: Arc<dyn TokenVerifier>) -> Self {
        Self { tokens }
    }

    /// Verify an `Authorization` header value and project the identity.
    pub async fn verify(&self, header: Option<&str>) -> Result<Identity, VerificationError> {
        let token = bearer_token(header)?;
        let claims = self.tokens.verify_token(token).await?;
        Identity::from_claims(&claims)
    }
}
