//! User records and role assignment over a shared in-memory store.
//!
//! Uniqueness of identities is enforced by the store itself (single writer
//! under the lock), not by handler-level coordination: a duplicate
//! concurrent registration fails for the loser and never corrupts state.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use thiserror::Error;

use bazaar_auth::{Role, hash_password, policy_violation, verify_password};
use bazaar_core::UserId;

/// A registered user. Owned exclusively by the store; never mutated by this
/// core after creation except for role replacement.
#[derive(Debug, Clone, PartialEq)]
pub struct UserRecord {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub phone_number: String,
    pub password_hash: String,
    pub role: Option<Role>,
}

impl UserRecord {
    /// Role embedded in issued claims: CUSTOMER until one is assigned.
    pub fn effective_role(&self) -> Role {
        self.role.clone().unwrap_or(Role::CUSTOMER)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("a user with this email already exists")]
    DuplicateIdentity,

    #[error("{0}")]
    WeakCredential(&'static str),

    #[error("store fault: {0}")]
    StoreFault(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("no user matches this identity")]
    NotFound,

    #[error("password check failed")]
    InvalidCredential,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AssignmentError {
    #[error("unknown user")]
    UnknownUser,

    #[error("store fault: {0}")]
    StoreFault(String),
}

#[derive(Debug, Default)]
struct Inner {
    /// Keyed by lowercased identity; identity matching is case-insensitive.
    users: HashMap<String, UserRecord>,
    /// Known role names, created lazily on first assignment.
    roles: HashSet<String>,
}

/// Shared backing store behind [`CredentialStore`] and [`RoleAssigner`].
#[derive(Debug, Clone, Default)]
pub struct IdentityStore {
    inner: Arc<RwLock<Inner>>,
}

impl IdentityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn credentials(&self) -> CredentialStore {
        CredentialStore {
            store: self.clone(),
        }
    }

    pub fn role_assigner(&self) -> RoleAssigner {
        RoleAssigner {
            store: self.clone(),
        }
    }
}

/// Holds user records; verifies passwords against stored hashes.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    store: IdentityStore,
}

impl CredentialStore {
    /// Create a user with a securely hashed password.
    pub fn register(
        &self,
        email: &str,
        name: &str,
        phone_number: &str,
        password: &str,
    ) -> Result<UserRecord, RegistrationError> {
        if let Some(rule) = policy_violation(password) {
            return Err(RegistrationError::WeakCredential(rule));
        }

        // Hash outside the lock; the duplicate check happens under it.
        let password_hash =
            hash_password(password).map_err(|e| RegistrationError::StoreFault(e.to_string()))?;

        let key = email.to_lowercase();
        let record = UserRecord {
            id: UserId::new(),
            email: email.to_string(),
            name: name.to_string(),
            phone_number: phone_number.to_string(),
            password_hash,
            role: None,
        };

        let mut inner = self
            .store
            .inner
            .write()
            .map_err(|_| RegistrationError::StoreFault("store lock poisoned".to_string()))?;
        if inner.users.contains_key(&key) {
            return Err(RegistrationError::DuplicateIdentity);
        }
        inner.users.insert(key, record.clone());
        Ok(record)
    }

    /// Check a password against the stored hash. No side effects.
    pub fn verify(&self, identity: &str, password: &str) -> Result<UserRecord, AuthError> {
        let inner = match self.store.inner.read() {
            Ok(g) => g,
            Err(_) => {
                tracing::error!("identity store lock poisoned during verify");
                return Err(AuthError::NotFound);
            }
        };

        let record = inner
            .users
            .get(&identity.to_lowercase())
            .ok_or(AuthError::NotFound)?;

        if verify_password(&record.password_hash, password) {
            Ok(record.clone())
        } else {
            Err(AuthError::InvalidCredential)
        }
    }

    /// Case-insensitive lookup by identity.
    pub fn find(&self, identity: &str) -> Option<UserRecord> {
        let inner = self.store.inner.read().ok()?;
        inner.users.get(&identity.to_lowercase()).cloned()
    }
}

/// Grants a named role to a user; a user holds at most one role at a time.
#[derive(Debug, Clone)]
pub struct RoleAssigner {
    store: IdentityStore,
}

impl RoleAssigner {
    /// Assign a role, creating the role on first use.
    ///
    /// Replaces any previously held role rather than stacking; idempotent
    /// when reassigning the same role.
    pub fn assign(&self, identity: &str, role: Role) -> Result<(), AssignmentError> {
        let mut inner = self
            .store
            .inner
            .write()
            .map_err(|_| AssignmentError::StoreFault("store lock poisoned".to_string()))?;

        inner.roles.insert(role.as_str().to_string());

        let record = inner
            .users
            .get_mut(&identity.to_lowercase())
            .ok_or(AssignmentError::UnknownUser)?;
        record.role = Some(role);
        Ok(())
    }

    /// Whether a role has been created (assigned at least once).
    pub fn role_exists(&self, name: &str) -> bool {
        self.store
            .inner
            .read()
            .map(|inner| inner.roles.contains(name))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PASSWORD: &str = "P@ssw0rd1";

    fn store_with_user(email: &str) -> IdentityStore {
        let store = IdentityStore::new();
        store
            .credentials()
            .register(email, "Alice", "555-0100", PASSWORD)
            .unwrap();
        store
    }

    #[test]
    fn register_then_verify_succeeds() {
        let store = store_with_user("a@x.com");
        let user = store.credentials().verify("a@x.com", PASSWORD).unwrap();
        assert_eq!(user.email, "a@x.com");
        assert_eq!(user.name, "Alice");
    }

    #[test]
    fn identity_match_is_case_insensitive() {
        let store = store_with_user("Alice@X.com");
        assert!(store.credentials().verify("alice@x.com", PASSWORD).is_ok());
    }

    #[test]
    fn duplicate_registration_fails_without_corrupting_state() {
        let store = store_with_user("a@x.com");
        let err = store
            .credentials()
            .register("A@X.COM", "Mallory", "555-0199", PASSWORD)
            .unwrap_err();
        assert_eq!(err, RegistrationError::DuplicateIdentity);

        // The original record is untouched.
        let user = store.credentials().find("a@x.com").unwrap();
        assert_eq!(user.name, "Alice");
    }

    #[test]
    fn weak_password_is_rejected_before_any_write() {
        let store = IdentityStore::new();
        let err = store
            .credentials()
            .register("b@x.com", "Bob", "", "short")
            .unwrap_err();
        assert!(matches!(err, RegistrationError::WeakCredential(_)));
        assert!(store.credentials().find("b@x.com").is_none());
    }

    #[test]
    fn wrong_password_and_unknown_identity_are_distinct_at_store_level() {
        let store = store_with_user("a@x.com");
        assert_eq!(
            store.credentials().verify("a@x.com", "Wr0ng!pass"),
            Err(AuthError::InvalidCredential)
        );
        assert_eq!(
            store.credentials().verify("ghost@x.com", PASSWORD),
            Err(AuthError::NotFound)
        );
    }

    #[test]
    fn unassigned_role_defaults_to_customer() {
        let store = store_with_user("a@x.com");
        let user = store.credentials().find("a@x.com").unwrap();
        assert_eq!(user.role, None);
        assert_eq!(user.effective_role(), Role::CUSTOMER);
    }

    #[test]
    fn assign_is_idempotent_and_creates_the_role_lazily() {
        let store = store_with_user("a@x.com");
        let assigner = store.role_assigner();
        assert!(!assigner.role_exists("ADMIN"));

        assigner.assign("a@x.com", Role::ADMIN).unwrap();
        assigner.assign("a@x.com", Role::ADMIN).unwrap();

        assert!(assigner.role_exists("ADMIN"));
        let user = store.credentials().find("a@x.com").unwrap();
        assert_eq!(user.role, Some(Role::ADMIN));
        assert_eq!(user.effective_role(), Role::ADMIN);
    }

    #[test]
    fn reassignment_replaces_rather_than_stacks() {
        let store = store_with_user("a@x.com");
        let assigner = store.role_assigner();

        assigner.assign("a@x.com", Role::ADMIN).unwrap();
        assigner.assign("a@x.com", Role::CUSTOMER).unwrap();

        let user = store.credentials().find("a@x.com").unwrap();
        assert_eq!(user.role, Some(Role::CUSTOMER));
    }

    #[test]
    fn assigning_to_unknown_user_fails() {
        let store = IdentityStore::new();
        assert_eq!(
            store.role_assigner().assign("ghost@x.com", Role::ADMIN),
            Err(AssignmentError::UnknownUser)
        );
    }
}
