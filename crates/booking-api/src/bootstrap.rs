//! # Service Bootstrap
//!
//! Builds every long-lived client from an [`AppConfig`] exactly once.
//!
//! ## Bootstrap Sequence
//!
//! 1. **Record store**: connect to MongoDB and ping it, or start the
//!    in-memory collection.
//! 2. **Service account**: read the Firebase key file.
//! 3. **Identity clients**: one shared `reqwest::Client` for the token
//!    verifier and the user directory.
//!
//! Any failure here is fatal; `main` logs it and exits non-zero.

use std::sync::Arc;

use booking_auth::firebase::{FirebaseTokenVerifier, FirebaseUserDirectory, ServiceAccountKey};
use booking_auth::{CredentialVerifier, CredentialsError};
use booking_store::{BookingGateway, MongoCollection, StoreError};

use crate::config::{AppConfig, StorageBackend};
use crate::state::AppState;

/// Errors during startup.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("record store: {0}")]
    Storage(#[from] StoreError),

    #[error("identity provider credentials: {0}")]
    Credentials(#[from] CredentialsError),

    #[error("identity provider HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Connect the record store and identity provider clients.
pub async fn bootstrap(config: &AppConfig) -> Result<AppState, BootstrapError> {
    let bookings = match &config.storage {
        StorageBackend::Mongo(settings) => {
            let collection = MongoCollection::connect(settings).await?;
            BookingGateway::new(Arc::new(collection))
        }
        StorageBackend::Memory => {
            tracing::warn!("using in-memory record store; bookings are lost on restart");
            BookingGateway::in_memory()
        }
    };

    let account = ServiceAccountKey::from_file(&config.firebase.credentials_path)?;
    let firebase = config.firebase.resolve(&account);
    let http = firebase.http_client()?;

    let tokens = FirebaseTokenVerifier::new(http.clone(), &firebase);
    let users = FirebaseUserDirectory::new(http, &firebase, &account)?;

    tracing::info!(
        project_id = %firebase.project_id,
        client_email = %account.client_email,
        "identity provider configured"
    );

    Ok(AppState::new(
        bookings,
        CredentialVerifier::new(Arc::new(tokens)),
        Arc::new(users),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use crate::config::{FirebaseSettings, LogFormat};
    use booking_auth::firebase::{DEFAULT_IDENTITY_TOOLKIT_URL, DEFAULT_JWKS_URL};

    const TEST_KEY: &str = include_str!("../../booking-auth/tests/fixtures/test_signing_key.pem");

    fn config(credentials_path: std::path::PathBuf) -> AppConfig {
        AppConfig {
            port: 0,
            storage: StorageBackend::Memory,
            firebase: FirebaseSettings {
                credentials_path,
                project_id: None,
                jwks_url: DEFAULT_JWKS_URL.parse().unwrap(),
                identity_toolkit_url: DEFAULT_IDENTITY_TOOLKIT_URL.parse().unwrap(),
                timeout_secs: 5,
                min_key_refresh_secs: 30,
            },
            log_format: LogFormat::Text,
        }
    }

    fn key_file(private_key: &str) -> tempfile::NamedTempFile {
        let body = serde_json::json!({
            "type": "service_account",
            "project_id": "bookings-test",
            "private_key_id": "test-key-1",
            "private_key": private_key,
            "client_email": "svc@bookings-test.iam.gserviceaccount.com",
        });
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(body.to_string().as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn memory_backend_with_valid_key_file() {
        let file = key_file(TEST_KEY);
        let state = bootstrap(&config(file.path().to_path_buf())).await.unwrap();
        assert!(state.bookings.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_key_file_is_fatal() {
        let err = bootstrap(&config("/nonexistent/private_key.json".into()))
            .await
            .unwrap_err();
        assert!(matches!(err, BootstrapError::Credentials(_)));
    }

    #[tokio::test]
    async fn unusable_private_key_is_fatal() {
        let file = key_file("not a pem");
        let err = bootstrap(&config(file.path().to_path_buf())).await.unwrap_err();
        assert!(matches!(
            err,
            BootstrapError::Credentials(CredentialsError::InvalidPrivateKey(_))
        ));
    }
}
