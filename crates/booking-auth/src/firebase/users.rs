//! # Account Lookup
//!
//! Fetches account records from the Identity Toolkit API.
//!
//! Calls are authorized with an OAuth2 access token obtained through the
//! JWT-bearer grant: a short-lived assertion signed with the service
//! account's private key is exchanged at the key's `token_uri`. The access
//! token is held in a `moka` cache until a minute before it expires and
//! dropped early if the API answers 401. Concurrent lookups on a cold
//! cache share one exchange.
//!
//! | Step | Request |
//! |------|---------|
//! | token | `POST {token_uri}` form `grant_type`, `assertion` |
//! | lookup | `POST {identity_toolkit}/v1/projects/{project}/accounts:lookup` `{"email": [..]}` |

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use moka::future::Cache;
use moka::Expiry;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use super::credentials::ServiceAccountKey;
use super::FirebaseConfig;
use crate::directory::{UserDirectory, UserRecord};
use crate::error::{CredentialsError, DirectoryError};

const OAUTH_SCOPES: &str =
    "https://www.googleapis.com/auth/identitytoolkit https://www.googleapis.com/auth/cloud-platform";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
const TOKEN_REFRESH_MARGIN: Duration = Duration::from_secs(60);

#[derive(Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

struct AccessToken {
    value: Zeroizing<String>,
    lifetime: Duration,
}

/// Evicts a cached access token one refresh margin before it expires.
struct TokenExpiry;

impl Expiry<(), Arc<AccessToken>> for TokenExpiry {
    fn expire_after_create(
        &self,
        _key: &(),
        value: &Arc<AccessToken>,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.lifetime.saturating_sub(TOKEN_REFRESH_MARGIN))
    }
}

#[derive(Serialize)]
struct LookupRequest<'a> {
    email: [&'a str; 1],
}

#[derive(Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<FirebaseAccount>,
}

/// Account shape returned by `accounts:lookup`. Timestamps are
/// millisecond epoch values encoded as strings.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FirebaseAccount {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    email_verified: bool,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    photo_url: Option<String>,
    #[serde(default)]
    phone_number: Option<String>,
    #[serde(default)]
    disabled: bool,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    last_login_at: Option<String>,
}

fn millis(raw: Option<&str>) -> Option<DateTime<Utc>> {
    let ms = raw?.parse::<i64>().ok()?;
    Utc.timestamp_millis_opt(ms).single()
}

impl From<FirebaseAccount> for UserRecord {
    fn from(account: FirebaseAccount) -> Self {
        Self {
            created_at: millis(account.created_at.as_deref()),
            last_login_at: millis(account.last_login_at.as_deref()),
            uid: account.local_id,
            email: account.email,
            email_verified: account.email_verified,
            display_name: account.display_name,
            photo_url: account.photo_url,
            phone_number: account.phone_number,
            disabled: account.disabled,
        }
    }
}

/// [`UserDirectory`] backed by Firebase Authentication.
pub struct FirebaseUserDirectory {
    http: reqwest::Client,
    lookup_url: String,
    client_email: String,
    token_uri: String,
    key_id: Option<String>,
    signing_key: EncodingKey,
    access_token: Cache<(), Arc<AccessToken>>,
}

impl std::fmt::Debug for FirebaseUserDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirebaseUserDirectory")
            .field("lookup_url", &self.lookup_url)
            .field("client_email", &self.client_email)
            .field("token_uri", &self.token_uri)
            .finish_non_exhaustive()
    }
}

impl FirebaseUserDirectory {
    /// Build the directory client. Fails if the service-account private key
    /// is not a usable RSA key.
    pub fn new(
        http: reqwest::Client,
        config: &FirebaseConfig,
        account: &ServiceAccountKey,
    ) -> Result<Self, CredentialsError> {
        let signing_key = EncodingKey::from_rsa_pem(account.private_key.as_bytes())
            .map_err(|e| CredentialsError::InvalidPrivateKey(e.to_string()))?;

        let lookup_url = format!(
            "{}/v1/projects/{}/accounts:lookup",
            config.identity_toolkit_url.as_str().trim_end_matches('/'),
            config.project_id
        );

        Ok(Self {
            http,
            lookup_url,
            client_email: account.client_email.clone(),
            token_uri: account.token_uri.clone(),
            key_id: account.private_key_id.clone(),
            signing_key,
            access_token: Cache::builder()
                .max_capacity(1)
                .expire_after(TokenExpiry)
                .build(),
        })
    }

    fn assertion(&self) -> Result<String, DirectoryError> {
        let now = Utc::now().timestamp();
        let claims = AssertionClaims {
            iss: &self.client_email,
            scope: OAUTH_SCOPES,
            aud: &self.token_uri,
            iat: now,
            exp: now + ASSERTION_LIFETIME_SECS,
        };
        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.key_id.clone();
        Ok(encode(&header, &claims, &self.signing_key)?)
    }

    /// The cached access token, exchanging a fresh assertion if absent.
    async fn access_token(&self) -> Result<Arc<AccessToken>, DirectoryError> {
        self.access_token
            .try_get_with((), self.exchange_assertion())
            .await
            .map_err(DirectoryError::TokenExchange)
    }

    async fn exchange_assertion(&self) -> Result<Arc<AccessToken>, DirectoryError> {
        let endpoint = "POST token_uri";
        let assertion = Zeroizing::new(self.assertion()?);
        let resp = self
            .http
            .post(&self.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(|e| DirectoryError::Http {
                endpoint: endpoint.into(),
                source: e,
            })?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(DirectoryError::ApiError {
                endpoint: endpoint.into(),
                status,
                body,
            });
        }

        let token: TokenResponse = resp.json().await.map_err(|e| DirectoryError::Deserialization {
            endpoint: endpoint.into(),
            source: e,
        })?;

        let lifetime = token.expires_in.unwrap_or(ASSERTION_LIFETIME_SECS).max(0);
        tracing::debug!(expires_in = lifetime, "obtained identity toolkit access token");
        Ok(Arc::new(AccessToken {
            value: Zeroizing::new(token.access_token),
            lifetime: Duration::from_secs(lifetime as u64),
        }))
    }
}

#[async_trait]
impl UserDirectory for FirebaseUserDirectory {
    async fn lookup_by_email(&self, email: &str) -> Result<Option<UserRecord>, DirectoryError> {
        let endpoint = "POST accounts:lookup";
        let token = self.access_token().await?;

        let resp = self
            .http
            .post(&self.lookup_url)
            .bearer_auth(token.value.as_str())
            .json(&LookupRequest { email: [email] })
            .send()
            .await
            .map_err(|e| DirectoryError::Http {
                endpoint: endpoint.into(),
                source: e,
            })?;

        if resp.status() == reqwest::StatusCode::UNAUTHORIZED {
            self.access_token.invalidate(&()).await;
        }

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(DirectoryError::ApiError {
                endpoint: endpoint.into(),
                status,
                body,
            });
        }

        let lookup: LookupResponse = resp.json().await.map_err(|e| DirectoryError::Deserialization {
            endpoint: endpoint.into(),
            source: e,
        })?;

        Ok(lookup.users.into_iter().next().map(UserRecord::from))
    }
}
