//! # Service Configuration
//!
//! Read from the process environment once at startup. A `.env` file in the
//! working directory is loaded first (see `main`), so local setups can keep
//! database and identity-provider settings out of the shell.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `PORT` | `8080` |
//! | `STORAGE_BACKEND` | `mongodb` (or `memory`) |
//! | `MONGODB_URI` | built from `DB_USER`, `DB_PASSWORD`, `DB_HOST` |
//! | `DB_NAME` / `DB_COLLECTION` | `Bookings` / `Bookings` |
//! | `FIREBASE_CREDENTIALS` | `private_key.json` |
//! | `FIREBASE_PROJECT_ID` | the credentials file's `project_id` |
//! | `FIREBASE_JWKS_URL` | Google securetoken JWKS |
//! | `FIREBASE_IDENTITY_TOOLKIT_URL` | `https://identitytoolkit.googleapis.com` |
//! | `IDENTITY_TIMEOUT_SECS` | `10` |
//! | `FIREBASE_KEY_REFRESH_MIN_SECS` | `30` |
//! | `LOG_FORMAT` | `text` (or `json`) |

use std::path::PathBuf;

use booking_auth::firebase::{self, FirebaseConfig, ServiceAccountKey};
use booking_store::MongoSettings;
use thiserror::Error;
use url::Url;
use zeroize::Zeroizing;

const DEFAULT_DATABASE: &str = "Bookings";
const DEFAULT_COLLECTION: &str = "Bookings";
const DEFAULT_CREDENTIALS_FILE: &str = "private_key.json";

/// Configuration errors. Fatal at startup.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var} has invalid value \"{value}\": {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Where bookings are stored.
#[derive(Debug, Clone)]
pub enum StorageBackend {
    Mongo(MongoSettings),
    /// Process-local; contents are lost on restart.
    Memory,
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl LogFormat {
    /// Read `LOG_FORMAT`. Unrecognized values fall back to text.
    pub fn from_env() -> Self {
        Self::parse(std::env::var("LOG_FORMAT").ok().as_deref())
    }

    fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::to_ascii_lowercase).as_deref() {
            Some("json") => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Identity provider settings.
#[derive(Debug, Clone)]
pub struct FirebaseSettings {
    pub credentials_path: PathBuf,
    /// Overrides the credentials file's project when set.
    pub project_id: Option<String>,
    pub jwks_url: Url,
    pub identity_toolkit_url: Url,
    pub timeout_secs: u64,
    /// Minimum spacing between signing-key refetches forced by an unknown
    /// key id.
    pub min_key_refresh_secs: u64,
}

impl FirebaseSettings {
    /// Bind these settings to a loaded service account.
    pub fn resolve(&self, account: &ServiceAccountKey) -> FirebaseConfig {
        FirebaseConfig {
            project_id: self
                .project_id
                .clone()
                .unwrap_or_else(|| account.project_id.clone()),
            jwks_url: self.jwks_url.clone(),
            identity_toolkit_url: self.identity_toolkit_url.clone(),
            timeout_secs: self.timeout_secs,
            min_key_refresh_secs: self.min_key_refresh_secs,
        }
    }
}

/// Top-level service configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub storage: StorageBackend,
    pub firebase: FirebaseSettings,
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match var("PORT") {
            Some(raw) => raw.parse().map_err(|e: std::num::ParseIntError| ConfigError::Invalid {
                var: "PORT",
                value: raw.clone(),
                reason: e.to_string(),
            })?,
            None => 8080,
        };

        let storage = match var("STORAGE_BACKEND").as_deref() {
            None | Some("mongodb") | Some("mongo") => StorageBackend::Mongo(MongoSettings {
                uri: mongo_uri(&var)?,
                database: var("DB_NAME").unwrap_or_else(|| DEFAULT_DATABASE.to_string()),
                collection: var("DB_COLLECTION").unwrap_or_else(|| DEFAULT_COLLECTION.to_string()),
            }),
            Some("memory") => StorageBackend::Memory,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    var: "STORAGE_BACKEND",
                    value: other.to_string(),
                    reason: "expected \"mongodb\" or \"memory\"".to_string(),
                })
            }
        };

        let timeout_secs = env_u64(&var, "IDENTITY_TIMEOUT_SECS", 10)?;
        let min_key_refresh_secs = env_u64(
            &var,
            "FIREBASE_KEY_REFRESH_MIN_SECS",
            firebase::DEFAULT_MIN_KEY_REFRESH_SECS,
        )?;

        let firebase = FirebaseSettings {
            credentials_path: var("FIREBASE_CREDENTIALS")
                .unwrap_or_else(|| DEFAULT_CREDENTIALS_FILE.to_string())
                .into(),
            project_id: var("FIREBASE_PROJECT_ID"),
            jwks_url: env_url(&var, "FIREBASE_JWKS_URL", firebase::DEFAULT_JWKS_URL)?,
            identity_toolkit_url: env_url(
                &var,
                "FIREBASE_IDENTITY_TOOLKIT_URL",
                firebase::DEFAULT_IDENTITY_TOOLKIT_URL,
            )?,
            timeout_secs,
            min_key_refresh_secs,
        };

        Ok(Self {
            port,
            storage,
            firebase,
            log_format: LogFormat::parse(var("LOG_FORMAT").as_deref()),
        })
    }
}

/// `MONGODB_URI` if set, otherwise an Atlas SRV URI assembled from
/// `DB_USER`, `DB_PASSWORD`, and `DB_HOST`.
fn mongo_uri(var: &impl Fn(&str) -> Option<String>) -> Result<Zeroizing<String>, ConfigError> {
    if let Some(uri) = var("MONGODB_URI") {
        return Ok(Zeroizing::new(uri));
    }
    let user = var("DB_USER").ok_or(ConfigError::Missing("MONGODB_URI or DB_USER"))?;
    let password = Zeroizing::new(var("DB_PASSWORD").ok_or(ConfigError::Missing("DB_PASSWORD"))?);
    let host = var("DB_HOST").ok_or(ConfigError::Missing("DB_HOST"))?;
    Ok(Zeroizing::new(format!(
        "mongodb+srv://{user}:{}@{host}/?retryWrites=true&w=majority",
        password.as_str()
    )))
}

fn env_u64(
    var: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: u64,
) -> Result<u64, ConfigError> {
    match var(key) {
        Some(raw) => raw.parse().map_err(|e: std::num::ParseIntError| ConfigError::Invalid {
            var: key,
            value: raw.clone(),
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}

fn env_url(
    var: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: &str,
) -> Result<Url, ConfigError> {
    let raw = var(key).unwrap_or_else(|| default.to_string());
    Url::parse(&raw).map_err(|e| ConfigError::Invalid {
        var: key,
        value: raw.clone(),
        reason: e.to_string(),
    })
}
