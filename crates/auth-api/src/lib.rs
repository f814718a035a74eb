//! Issuer service: credential verification, role assignment, token minting.

pub mod app;
pub mod dto;
pub mod store;
