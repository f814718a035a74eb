use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Role identifier used for coarse-grained authorization.
///
/// Roles are opaque strings at this layer; the set is small and effectively
/// static, and a user holds at most one role at a time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(Cow<'static, str>);

impl Role {
    /// Administrative role: required for every mutating catalog operation.
    pub const ADMIN: Role = Role(Cow::Borrowed("ADMIN"));

    /// Default role granted when registration does not name one.
    pub const CUSTOMER: Role = Role(Cow::Borrowed("CUSTOMER"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_admin(&self) -> bool {
        *self == Self::ADMIN
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}
