//! Firebase ID token verification.
//!
//! A token is accepted when it is an RS256 JWT whose `kid` resolves to a
//! current Google signing key, whose signature checks out, whose `aud` is
//! the project id and `iss` is `https://securetoken.google.com/<project>`,
//! which has not expired, which carries an `iat`, and whose `sub` is
//! non-empty.

use std::time::Duration;

use async_trait::async_trait;
use jsonwebtoken::{decode, decode_header, Algorithm, Validation};
use serde_json::Value;

use super::keys::SigningKeys;
use super::FirebaseConfig;
use crate::error::VerificationError;
use crate::identity::Claims;
use crate::verifier::TokenVerifier;

/// [`TokenVerifier`] for Firebase Authentication ID tokens.
#[derive(Debug)]
pub struct FirebaseTokenVerifier {
    project_id: String,
    issuer: String,
    keys: SigningKeys,
}

impl FirebaseTokenVerifier {
    pub fn new(http: reqwest::Client, config: &FirebaseConfig) -> Self {
        Self {
            project_id: config.project_id.clone(),
            issuer: config.issuer(),
            keys: SigningKeys::new(
                http,
                config.jwks_url.clone(),
                Duration::from_secs(config.min_key_refresh_secs),
            ),
        }
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[&self.project_id]);
        validation.set_issuer(&[&self.issuer]);
        validation.set_required_spec_claims(&["exp", "aud", "iss", "sub"]);
        validation
    }
}

#[async_trait]
impl TokenVerifier for FirebaseTokenVerifier {
    async fn verify_token(&self, token: &str) -> Result<Claims, VerificationError> {
        let header = decode_header(token)
            .map_err(|e| VerificationError::invalid_token(format!("undecodable header: {e}")))?;

        if header.alg != Algorithm::RS256 {
            return Err(VerificationError::invalid_token(format!(
                "unexpected algorithm {:?}",
                header.alg
            )));
        }
        let kid = header
            .kid
            .ok_or_else(|| VerificationError::invalid_token("token header has no kid"))?;

        let key = self.keys.key(&kid).await?;
        let data = decode::<Claims>(token, &key, &self.validation())
            .map_err(|e| VerificationError::invalid_token(e.to_string()))?;

        if !data.claims.get("iat").is_some_and(Value::is_number) {
            return Err(VerificationError::invalid_token("missing iat"));
        }

        match data.claims.get("sub").and_then(Value::as_str) {
            Some(sub) if !sub.is_empty() => Ok(data.claims),
            _ => Err(VerificationError::invalid_token("empty subject")),
        }
    }
}
