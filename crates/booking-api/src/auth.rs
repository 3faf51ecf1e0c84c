//! # Authentication Middleware
//!
//! Every `/api` request passes through [`auth_middleware`], which calls the
//! [`CredentialVerifier`] exactly once. On success the resulting identity
//! is stored in the request extensions as a [`CallerIdentity`]; handlers
//! read it back with the `FromRequestParts` extractor and never re-verify.
//!
//! | Outcome | Response |
//! |---------|----------|
//! | verified | handler runs |
//! | missing / malformed / rejected credential | 401 `{"error": ...}` |
//! | identity provider unreachable | 500 `{"error": ...}` |

use axum::extract::{Request, State};
use axum::http::request::Parts;
use axum::http::header;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use booking_auth::{CredentialVerifier, Identity, VerificationError};

use crate::error::AppError;

/// Identity of the authenticated caller, available to all route handlers
/// via Axum's `FromRequestParts`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity(pub Identity);

impl CallerIdentity {
    pub fn email(&self) -> &str {
        &self.0.email
    }
}

/// Extracts the identity the auth middleware injected into extensions.
/// Returns 401 if none is present.
#[axum::async_trait]
impl<S: Send + Sync> axum::extract::FromRequestParts<S> for CallerIdentity {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CallerIdentity>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("no caller identity in request context".into()))
    }
}

/// Verify the `Authorization` header and attach the caller's identity.
pub async fn auth_middleware(
    State(credentials): State<CredentialVerifier>,
    mut request: Request,
    next: Next,
) -> Response {
    let authorization = request
        .headers()
        .get(header::AUTHORIZATION)
        .map(|v| v.to_str().map(str::to_owned));

    let verified = match authorization {
        None => credentials.verify(None).await,
        Some(Ok(value)) => credentials.verify(Some(&value)).await,
        Some(Err(_)) => Err(VerificationError::MalformedHeader),
    };

    match verified {
        Ok(identity) => {
            request.extensions_mut().insert(CallerIdentity(identity));
            next.run(request).await
        }
        Err(err) => {
            if let VerificationError::InvalidToken { reason } = &err {
                tracing::warn!(reason = %reason, "authentication failed: token rejected");
            } else if err.is_credential_failure() {
                tracing::warn!(reason = %err, "authentication failed");
            }
            AppError::from(err).into_response()
        }
    }
}
