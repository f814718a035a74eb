//! Token → browser session bridge.

use std::sync::{Arc, RwLock};

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::Deserialize;
use thiserror::Error;

use bazaar_auth::Role;
use bazaar_core::UserId;

use crate::dispatch::TokenStore;

/// Locally recognized identity, derived from a validated access token.
///
/// Derived, not authoritative: it is never re-validated against the issuer
/// after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalSession {
    pub subject: UserId,
    pub email: String,
    pub name: String,
    pub role: Role,
    /// Raw token retained only for reattachment to outbound calls.
    pub raw_token: String,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// A required claim is absent: an integration bug with the issuer, not
    /// a recoverable user error. Sign-in aborts.
    #[error("token claim '{0}' is missing or unreadable")]
    MissingClaim(&'static str),

    #[error("token cannot be decoded: {0}")]
    Undecodable(String),
}

/// Claims as read for session establishment; every field optional so a
/// missing one can be reported precisely.
#[derive(Debug, Deserialize)]
struct RawClaims {
    sub: Option<String>,
    email: Option<String>,
    name: Option<String>,
    role: Option<String>,
}

/// Bridges an issued token into a cookie-backed browser identity.
///
/// Trust boundary: `establish` copies claims without re-verifying the
/// signature. That is deliberate — the token arrives here directly from the
/// success path of a login call the issuer just answered, so verification
/// already happened upstream. Never feed an externally supplied token to
/// this type without first running it through `TokenValidator`.
#[derive(Debug)]
pub struct SessionBridge {
    tokens: Arc<TokenStore>,
    current: RwLock<Option<LocalSession>>,
}

impl SessionBridge {
    pub fn new(tokens: Arc<TokenStore>) -> Self {
        Self {
            tokens,
            current: RwLock::new(None),
        }
    }

    /// Decode the token's claims into a local identity, mark the browser as
    /// authenticated, and retain the raw token for outbound calls.
    pub fn establish(&self, token: &str) -> Result<LocalSession, SessionError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.required_spec_claims = Default::default();

        let data = decode::<RawClaims>(token, &DecodingKey::from_secret(&[]), &validation)
            .map_err(|e| SessionError::Undecodable(e.to_string()))?;
        let claims = data.claims;

        let subject = claims
            .sub
            .as_deref()
            .and_then(|s| s.parse::<UserId>().ok())
            .ok_or(SessionError::MissingClaim("sub"))?;
        let email = claims.email.ok_or(SessionError::MissingClaim("email"))?;
        let name = claims.name.ok_or(SessionError::MissingClaim("name"))?;
        let role = claims.role.ok_or(SessionError::MissingClaim("role"))?;

        let session = LocalSession {
            subject,
            email,
            name,
            role: Role::new(role),
            raw_token: token.to_string(),
        };

        self.tokens.set(token);
        if let Ok(mut guard) = self.current.write() {
            *guard = Some(session.clone());
        }

        tracing::info!(user = %session.subject, "browser session established");
        Ok(session)
    }

    pub fn current(&self) -> Option<LocalSession> {
        self.current.read().ok()?.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current().is_some()
    }

    /// Logout: clears the local identity and the stored raw token.
    pub fn terminate(&self) {
        if let Ok(mut guard) = self.current.write() {
            *guard = None;
        }
        self.tokens.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::Utc;
    use jsonwebtoken::{EncodingKey, Header, encode};

    use bazaar_auth::TokenIssuer;

    fn bridge() -> SessionBridge {
        SessionBridge::new(Arc::new(TokenStore::new()))
    }

    #[test]
    fn establish_copies_claims_and_retains_the_raw_token() {
        let sub = UserId::new();
        let token = TokenIssuer::new(b"secret")
            .issue(sub, "a@x.com", "Alice", &Role::CUSTOMER, Utc::now())
            .unwrap();

        let bridge = bridge();
        let session = bridge.establish(&token).unwrap();

        assert_eq!(session.subject, sub);
        assert_eq!(session.email, "a@x.com");
        assert_eq!(session.name, "Alice");
        assert_eq!(session.role, Role::CUSTOMER);
        assert_eq!(session.raw_token, token);

        assert!(bridge.is_authenticated());
        assert_eq!(bridge.tokens.get().as_deref(), Some(token.as_str()));
    }

    #[test]
    fn missing_claim_aborts_sign_in() {
        // A token missing the role claim entirely.
        let claims = serde_json::json!({
            "sub": UserId::new().to_string(),
            "email": "a@x.com",
            "name": "Alice",
        });
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"secret"),
        )
        .unwrap();

        let bridge = bridge();
        assert_eq!(
            bridge.establish(&token),
            Err(SessionError::MissingClaim("role"))
        );
        assert!(!bridge.is_authenticated());
        assert_eq!(bridge.tokens.get(), None);
    }

    #[test]
    fn garbage_token_is_undecodable() {
        let bridge = bridge();
        assert!(matches!(
            bridge.establish("not-a-token"),
            Err(SessionError::Undecodable(_))
        ));
    }

    #[test]
    fn terminate_clears_identity_and_token() {
        let token = TokenIssuer::new(b"secret")
            .issue(UserId::new(), "a@x.com", "Alice", &Role::CUSTOMER, Utc::now())
            .unwrap();

        let bridge = bridge();
        bridge.establish(&token).unwrap();
        bridge.terminate();

        assert!(!bridge.is_authenticated());
        assert_eq!(bridge.tokens.get(), None);
    }
}
