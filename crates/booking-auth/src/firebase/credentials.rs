//! Service-account key file, as downloaded from the Firebase console.
//!
//! Only the fields the OAuth2 JWT-bearer flow needs are kept. The private
//! key is held in a [`Zeroizing`] buffer and redacted from `Debug`.

use std::path::Path;

use serde::Deserialize;
use zeroize::Zeroizing;

use crate::error::CredentialsError;

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

#[derive(Deserialize)]
struct RawServiceAccountKey {
    #[serde(rename = "type")]
    kind: Option<String>,
    project_id: String,
    #[serde(default)]
    private_key_id: Option<String>,
    private_key: String,
    client_email: String,
    #[serde(default)]
    token_uri: Option<String>,
}

/// Parsed service-account credentials.
#[derive(Clone)]
pub struct ServiceAccountKey {
    pub project_id: String,
    pub client_email: String,
    pub private_key_id: Option<String>,
    pub private_key: Zeroizing<String>,
    pub token_uri: String,
}

impl std::fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("project_id", &self.project_id)
            .field("client_email", &self.client_email)
            .field("private_key_id", &self.private_key_id)
            .field("private_key", &"[REDACTED]")
            .field("token_uri", &self.token_uri)
            .finish()
    }
}

impl ServiceAccountKey {
    /// Read and parse a key file.
    pub fn from_file(path: &Path) -> Result<Self, CredentialsError> {
        let contents = std::fs::read_to_string(path).map_err(|source| CredentialsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let contents = Zeroizing::new(contents);
        Self::from_json(&contents)
    }

    /// Parse key file contents.
    pub fn from_json(contents: &str) -> Result<Self, CredentialsError> {
        let raw: RawServiceAccountKey = serde_json::from_str(contents)?;
        let private_key = Zeroizing::new(raw.private_key);

        if let Some(kind) = raw.kind {
            if kind != "service_account" {
                return Err(CredentialsError::UnsupportedType(kind));
            }
        }

        Ok(Self {
            project_id: raw.project_id,
            client_email: raw.client_email,
            private_key_id: raw.private_key_id,
            private_key,
            token_uri: raw
                .token_uri
                .unwrap_or_else(|| DEFAULT_TOKEN_URI.to_string()),
        })
    }
}
