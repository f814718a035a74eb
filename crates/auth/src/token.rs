//! Token issuance and stateless validation.
//!
//! Every resource service verifies tokens locally with the shared secret;
//! there is no round-trip back to the issuer. Signature and shape are
//! checked by `jsonwebtoken`; the time window is owned by
//! [`validate_window`] so the expiry boundary is exact.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use thiserror::Error;

use bazaar_core::UserId;

use crate::claims::{AccessClaims, ValidationError, validate_window};
use crate::roles::Role;

/// Fixed token lifetime: one hour from issuance.
const TOKEN_TTL_SECS: i64 = 3600;

#[derive(Debug, Error)]
#[error("token encoding failed: {0}")]
pub struct IssueError(#[from] jsonwebtoken::errors::Error);

/// Signs claim sets with the process-wide secret.
///
/// Deterministic given identical inputs and issuance instant. Key material
/// is loaded once at startup; its absence is a configuration fault there,
/// never a runtime error here.
pub struct TokenIssuer {
    key: EncodingKey,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            key: EncodingKey::from_secret(secret),
            ttl: Duration::seconds(TOKEN_TTL_SECS),
        }
    }

    pub fn with_ttl(secret: &[u8], ttl: Duration) -> Self {
        Self {
            key: EncodingKey::from_secret(secret),
            ttl,
        }
    }

    /// Build and sign the claim set for a verified user.
    pub fn issue(
        &self,
        sub: UserId,
        email: &str,
        name: &str,
        role: &Role,
        now: DateTime<Utc>,
    ) -> Result<String, IssueError> {
        let claims = AccessClaims {
            sub,
            email: email.to_string(),
            name: name.to_string(),
            role: role.clone(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.key)?)
    }
}

/// Stateless token verification gate, shared by every resource service.
pub struct TokenValidator {
    key: DecodingKey,
}

impl TokenValidator {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            key: DecodingKey::from_secret(secret),
        }
    }

    /// Verify signature and expiry, then hand back the claim set.
    pub fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<AccessClaims, ValidationError> {
        let mut validation = Validation::new(Algorithm::HS256);
        // The pure window check below owns expiry, with no leeway.
        validation.validate_exp = false;
        validation.required_spec_claims = Default::default();

        let data = decode::<AccessClaims>(token, &self.key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::InvalidSignature => ValidationError::SignatureInvalid,
                _ => ValidationError::Malformed,
            }
        })?;

        validate_window(&data.claims, now)?;
        Ok(data.claims)
    }
}
