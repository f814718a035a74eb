//! Sealed identity cookie for the browser tier.
//!
//! The cookie carries the derived identity only, never the raw access
//! token. It is signed with the web tier's own secret so a tampered cookie
//! is rejected on the way back in.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use bazaar_auth::Role;
use bazaar_core::UserId;

use crate::session::LocalSession;

/// Identity as recovered from a sealed cookie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CookieIdentity {
    pub subject: UserId,
    pub email: String,
    pub name: String,
    pub role: Role,
}

#[derive(Debug, Error)]
pub enum CookieError {
    #[error("cookie cannot be sealed: {0}")]
    Seal(#[source] jsonwebtoken::errors::Error),

    #[error("cookie is invalid or tampered")]
    Invalid,
}

/// Seals and opens the identity cookie with a web-tier secret distinct from
/// the token issuer's signing key.
#[derive(Clone)]
pub struct CookieCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl CookieCodec {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }

    pub fn seal(&self, session: &LocalSession) -> Result<String, CookieError> {
        let identity = CookieIdentity {
            subject: session.subject,
            email: session.email.clone(),
            name: session.name.clone(),
            role: session.role.clone(),
        };
        encode(&Header::new(Algorithm::HS256), &identity, &self.encoding)
            .map_err(CookieError::Seal)
    }

    pub fn open(&self, cookie: &str) -> Result<CookieIdentity, CookieError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims = Default::default();

        decode::<CookieIdentity>(cookie, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|_| CookieError::Invalid)
    }
}
