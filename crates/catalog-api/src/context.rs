use bazaar_auth::{AccessClaims, Role};

/// Authenticated caller for a request, derived from validated token claims.
///
/// Immutable and present on every protected route.
#[derive(Debug, Clone)]
pub struct CallerContext {
    claims: AccessClaims,
}

impl CallerContext {
    pub fn new(claims: AccessClaims) -> Self {
        Self { claims }
    }

    pub fn claims(&self) -> &AccessClaims {
        &self.claims
    }

    pub fn role(&self) -> &Role {
        &self.claims.role
    }
}
