//! # Signing Key Cache
//!
//! Fetches the JWKS that signs Firebase ID tokens and keeps the decoded
//! keys in a `moka` cache for as long as the response's
//! `Cache-Control: max-age` allows (one hour when the header is absent).
//! Concurrent misses share a single fetch.
//!
//! A key id that is not in the current set forces a refetch, which picks
//! up rotated keys early. Forced refetches are throttled to one per
//! `min_refresh` interval; inside that window an unknown `kid` is rejected
//! without contacting the provider.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::DecodingKey;
use moka::future::Cache;
use moka::Expiry;
use parking_lot::Mutex;
use reqwest::header::{HeaderMap, CACHE_CONTROL};
use url::Url;

use crate::error::VerificationError;

const DEFAULT_KEY_TTL: Duration = Duration::from_secs(3600);

/// One fetched JWKS.
struct KeySet {
    keys: HashMap<String, DecodingKey>,
    ttl: Duration,
    fetched_at: Instant,
}

/// Expires each fetched set after its advertised `max-age`.
struct MaxAgeExpiry;

impl Expiry<(), Arc<KeySet>> for MaxAgeExpiry {
    fn expire_after_create(
        &self,
        _key: &(),
        value: &Arc<KeySet>,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// Remote JWKS with an in-process cache.
pub struct SigningKeys {
    http: reqwest::Client,
    url: Url,
    cache: Cache<(), Arc<KeySet>>,
    min_refresh: Duration,
    last_forced: Mutex<Option<Instant>>,
}

impl std::fmt::Debug for SigningKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKeys")
            .field("url", &self.url.as_str())
            .field("cached", &self.cache.contains_key(&()))
            .field("min_refresh", &self.min_refresh)
            .finish()
    }
}

impl SigningKeys {
    pub fn new(http: reqwest::Client, url: Url, min_refresh: Duration) -> Self {
        Self {
            http,
            url,
            cache: Cache::builder()
                .max_capacity(1)
                .expire_after(MaxAgeExpiry)
                .build(),
            min_refresh,
            last_forced: Mutex::new(None),
        }
    }

    /// Resolve `kid` to a decoding key, forcing at most one refetch per
    /// `min_refresh` interval.
    pub async fn key(&self, kid: &str) -> Result<DecodingKey, VerificationError> {
        let set = self.current().await?;
        if let Some(key) = set.keys.get(kid) {
            return Ok(key.clone());
        }

        if !self.claim_forced_refresh(&set) {
            return Err(VerificationError::invalid_token(format!(
                "no signing key with kid {kid}"
            )));
        }

        tracing::debug!(kid = %kid, "unknown kid, refetching signing keys");
        self.cache.invalidate(&()).await;
        let set = self.current().await?;
        set.keys.get(kid).cloned().ok_or_else(|| {
            VerificationError::invalid_token(format!("no signing key with kid {kid}"))
        })
    }

    /// The cached set, loading it if absent. Concurrent callers wait on
    /// one fetch.
    async fn current(&self) -> Result<Arc<KeySet>, VerificationError> {
        self.cache
            .try_get_with((), self.fetch())
            .await
            .map_err(|e| (*e).clone())
    }

    /// True if this caller may force a refetch now. The window is measured
    /// from both the last fetch and the last forced refetch.
    fn claim_forced_refresh(&self, set: &KeySet) -> bool {
        if set.fetched_at.elapsed() < self.min_refresh {
            return false;
        }
        let mut last = self.last_forced.lock();
        if matches!(*last, Some(at) if at.elapsed() < self.min_refresh) {
            return false;
        }
        *last = Some(Instant::now());
        true
    }

    async fn fetch(&self) -> Result<Arc<KeySet>, VerificationError> {
        let resp = self
            .http
            .get(self.url.clone())
            .send()
            .await
            .map_err(|e| {
                VerificationError::ProviderUnavailable(format!("fetching signing keys: {e}"))
            })?;

        if !resp.status().is_success() {
            return Err(VerificationError::ProviderUnavailable(format!(
                "signing key endpoint returned {}",
                resp.status().as_u16()
            )));
        }

        let ttl = max_age(resp.headers()).unwrap_or(DEFAULT_KEY_TTL);
        let set: JwkSet = resp.json().await.map_err(|e| {
            VerificationError::ProviderUnavailable(format!("decoding signing keys: {e}"))
        })?;

        let keys: HashMap<String, DecodingKey> = set
            .keys
            .iter()
            .filter_map(|jwk| {
                let kid = jwk.common.key_id.clone()?;
                match DecodingKey::from_jwk(jwk) {
                    Ok(key) => Some((kid, key)),
                    Err(e) => {
                        tracing::warn!(kid = %kid, error = %e, "skipping unusable signing key");
                        None
                    }
                }
            })
            .collect();

        tracing::debug!(count = keys.len(), ttl_secs = ttl.as_secs(), "fetched signing keys");
        Ok(Arc::new(KeySet {
            keys,
            ttl,
            fetched_at: Instant::now(),
        }))
    }
}

/// `max-age` directive of a `Cache-Control` header.
fn max_age(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(CACHE_CONTROL)?
        .to_str()
        .ok()?
        .split(',')
        .find_map(|directive| directive.trim().strip_prefix("max-age=")?.parse().ok())
        .map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CACHE_CONTROL, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn reads_max_age_among_directives() {
        assert_eq!(
            max_age(&headers("public, max-age=21984, must-revalidate, no-transform")),
            Some(Duration::from_secs(21984))
        );
    }

    #[test]
    fn missing_or_bad_max_age_is_none() {
        assert_eq!(max_age(&HeaderMap::new()), None);
        assert_eq!(max_age(&headers("no-cache")), None);
        assert_eq!(max_age(&headers("max-age=soon")), None);
    }
}
