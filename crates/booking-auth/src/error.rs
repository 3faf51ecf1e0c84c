//! # Authentication Error Types
//!
//! [`VerificationError`] covers everything that can go wrong between
//! reading the header and producing an identity. Its `Display` text is
//! what clients see, so the token-rejection variant keeps its detail in a
//! separate field that is only logged.

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

/// Why a credential was not accepted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerificationError {
    /// No `Authorization` header, or an empty one.
    #[error("authorization token is missing")]
    MissingCredential,

    /// The header is not exactly `"<scheme> <token>"`.
    #[error("invalid token format")]
    MalformedHeader,

    /// The identity provider rejected the token.
    #[error("invalid token")]
    InvalidToken {
        /// Diagnostic detail for logs. Not returned to clients.
        reason: String,
    },

    /// The token verified but carries no usable `email` claim.
    #[error("token has no email claim")]
    MissingEmailClaim,

    /// The identity provider could not be reached.
    #[error("identity provider unavailable: {0}")]
    ProviderUnavailable(String),
}

impl VerificationError {
    /// Shorthand for [`VerificationError::InvalidToken`].
    pub fn invalid_token(reason: impl Into<String>) -> Self {
        Self::InvalidToken {
            reason: reason.into(),
        }
    }

    /// True for failures caused by the caller's credential rather than by
    /// a dependency.
    pub fn is_credential_failure(&self) -> bool {
        !matches!(self, Self::ProviderUnavailable(_))
    }
}

/// Errors from user directory lookups.
#[derive(Error, Debug)]
pub enum DirectoryError {
    /// Transport-level failure.
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// The provider answered with a non-success status.
    #[error("{endpoint} returned {status}: {body}")]
    ApiError {
        endpoint: String,
        status: u16,
        body: String,
    },

    /// The provider's response body did not match the expected shape.
    #[error("failed to decode response from {endpoint}: {source}")]
    Deserialization {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// The service-account assertion could not be signed.
    #[error("failed to sign service account assertion: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),

    /// No access token could be obtained. Shared by every lookup that
    /// waited on the same exchange.
    #[error("access token exchange failed: {0}")]
    TokenExchange(#[source] Arc<DirectoryError>),
}

/// Errors loading service-account credentials. Fatal at startup.
#[derive(Error, Debug)]
pub enum CredentialsError {
    #[error("failed to read credentials file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("credentials are not a valid service account key: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("unsupported credential type \"{0}\" (expected \"service_account\")")]
    UnsupportedType(String),

    #[error("service account private key is not a valid RSA PEM: {0}")]
    InvalidPrivateKey(String),
}
