//! Authenticated caller identity.

use serde_json::Value;

use crate::error::VerificationError;

/// Decoded token claims, untyped as received from the provider.
pub type Claims = serde_json::Map<String, Value>;

/// The caller's identity, projected from verified claims. Request-scoped;
/// never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub email: String,
}

impl Identity {
    /// Project verified claims into an identity.
    ///
    /// The `email` claim must be present, a string, and non-empty.
    pub fn from_claims(claims: &Claims) -> Result<Self, VerificationError> {
        match claims.get("email").and_then(Value::as_str) {
            Some(email) if !email.is_empty() => Ok(Self {
                email: email.to_string(),
            }),
            _ => Err(VerificationError::MissingEmailClaim),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn claims(value: Value) -> Claims {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn projects_email_claim() {
        let identity = Identity::from_claims(&claims(json!({
            "email": "ada@example.com",
            "sub": "uid-1",
        })))
        .unwrap();
        assert_eq!(identity.email, "ada@example.com");
    }

    #[test]
    fn missing_email_is_rejected() {
        let err = Identity::from_claims(&claims(json!({"sub": "uid-1"}))).unwrap_err();
        assert_eq!(err, VerificationError::MissingEmailClaim);
    }

    #[test]
    fn non_string_email_is_rejected() {
        let err = Identity::from_claims(&claims(json!({"email": 7}))).unwrap_err();
        assert_eq!(err, VerificationError::MissingEmailClaim);
        let err = Identity::from_claims(&claims(json!({"email": null}))).unwrap_err();
        assert_eq!(err, VerificationError::MissingEmailClaim);
    }

    #[test]
    fn empty_email_is_rejected() {
        let err = Identity::from_claims(&claims(json!({"email": ""}))).unwrap_err();
        assert_eq!(err, VerificationError::MissingEmailClaim);
    }
}
