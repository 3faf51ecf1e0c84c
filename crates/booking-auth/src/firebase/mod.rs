//! # Firebase Authentication
//!
//! | Concern | Module | Upstream |
//! |---------|--------|----------|
//! | Service-account key file | [`credentials`] | local JSON file |
//! | ID token signing keys | [`keys`] | `securetoken@system.gserviceaccount.com` JWKS |
//! | ID token verification | [`tokens`] | none beyond the key fetch |
//! | Account lookup | [`users`] | OAuth2 token endpoint, Identity Toolkit `accounts:lookup` |
//!
//! Both clients share one `reqwest::Client` built at startup with the
//! configured timeout.

pub mod credentials;
pub mod keys;
pub mod tokens;
pub mod users;

pub use credentials::ServiceAccountKey;
pub use tokens::FirebaseTokenVerifier;
pub use users::FirebaseUserDirectory;

use std::time::Duration;

use url::Url;

/// Google's published JWKS for Firebase ID token signing keys.
pub const DEFAULT_JWKS_URL: &str =
    "https://www.googleapis.com/service_accounts/v1/jwk/securetoken@system.gserviceaccount.com";

/// Identity Toolkit REST API base.
pub const DEFAULT_IDENTITY_TOOLKIT_URL: &str = "https://identitytoolkit.googleapis.com";

/// Default spacing between forced signing-key refetches.
pub const DEFAULT_MIN_KEY_REFRESH_SECS: u64 = 30;

/// Endpoint locations and project binding for the Firebase clients.
#[derive(Debug, Clone)]
pub struct FirebaseConfig {
    /// Expected `aud` of ID tokens and the project whose accounts are looked up.
    pub project_id: String,
    pub jwks_url: Url,
    pub identity_toolkit_url: Url,
    pub timeout_secs: u64,
    /// Minimum spacing between signing-key refetches forced by an unknown
    /// `kid`.
    pub min_key_refresh_secs: u64,
}

impl FirebaseConfig {
    /// Expected `iss` of ID tokens for this project.
    pub fn issuer(&self) -> String {
        format!("https://securetoken.google.com/{}", self.project_id)
    }

    /// Build the HTTP client both Firebase clients share.
    pub fn http_client(&self) -> Result<reqwest::Client, reqwest::Error> {
        reqwest::Client::builder()
            .timeout(Duration::from_secs(self.timeout_secs))
            .build()
    }
}
