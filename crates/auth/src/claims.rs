use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use bazaar_core::UserId;

use crate::Role;

/// Claim set embedded in every access token.
///
/// Self-contained by design: any holder of the shared secret can verify
/// authenticity and expiry without contacting the issuer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject: the user's stable identifier.
    pub sub: UserId,

    /// Email the user registered with.
    pub email: String,

    /// Display name.
    pub name: String,

    /// The single role the user holds.
    pub role: Role,

    /// Issued-at, seconds since the Unix epoch.
    pub iat: i64,

    /// Expiry, seconds since the Unix epoch.
    pub exp: i64,
}

impl AccessClaims {
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.iat, 0)
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// Enforce that the caller's role is in the operation's allowed set.
    pub fn require_role(&self, allowed: &[Role]) -> Result<(), ValidationError> {
        if allowed.contains(&self.role) {
            Ok(())
        } else {
            Err(ValidationError::Forbidden(self.role.as_str().to_string()))
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("token is malformed")]
    Malformed,

    #[error("token signature is invalid")]
    SignatureInvalid,

    #[error("token has expired")]
    Expired,

    #[error("role '{0}' is not permitted for this operation")]
    Forbidden(String),
}

/// Deterministically validate the claim time window.
///
/// This validates the claims only; signature verification happens in
/// [`crate::TokenValidator`] before this is called. A token is rejected at
/// exactly its expiry instant: `now >= exp` is `Expired`.
pub fn validate_window(claims: &AccessClaims, now: DateTime<Utc>) -> Result<(), ValidationError> {
    if claims.exp <= claims.iat {
        return Err(ValidationError::Malformed);
    }
    if now.timestamp() >= claims.exp {
        return Err(ValidationError::Expired);
    }
    Ok(())
}
