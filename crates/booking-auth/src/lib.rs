//! # booking-auth: Credential Verification
//!
//! Turns an `Authorization` header value into an authenticated
//! [`Identity`], or a [`VerificationError`] explaining why not.
//!
//! ## Flow
//!
//! ```text
//! "Bearer eyJ..."  ──bearer_token()──▶  "eyJ..."
//!                  ──TokenVerifier──▶   Claims (untyped JSON map)
//!                  ──Identity::from_claims()──▶  Identity { email }
//! ```
//!
//! The header must be exactly two whitespace-separated fields. Anything
//! else is rejected as [`VerificationError::MalformedHeader`] before the
//! identity provider is contacted.
//!
//! ## Providers
//!
//! - [`firebase`]: Firebase Authentication. ID tokens are RS256 JWTs
//!   checked against Google's published signing keys; account records come
//!   from the Identity Toolkit API using a service-account key.
//! - [`fixed`]: static in-process verifier and directory for local runs and
//!   tests.

pub mod directory;
pub mod error;
pub mod firebase;
pub mod fixed;
pub mod identity;
pub mod verifier;

pub use directory::{UserDirectory, UserRecord};
pub use error::{CredentialsError, DirectoryError, VerificationError};
pub use identity::{Claims, Identity};
pub use verifier::{bearer_token, CredentialVerifier, TokenVerifier};
