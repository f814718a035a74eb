//! `bazaar-auth` — pure authentication/authorization boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage: the issuer
//! service and every resource service share the token contract defined here.

pub mod claims;
pub mod password;
pub mod roles;
pub mod token;

pub use claims::{AccessClaims, ValidationError, validate_window};
pub use password::{PasswordError, hash_password, policy_violation, verify_password};
pub use roles::Role;
pub use token::{IssueError, TokenIssuer, TokenValidator};
