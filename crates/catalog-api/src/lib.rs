//! Catalog resource service: a capability consumer.
//!
//! Accepts bearer tokens minted by the issuer, validates them locally
//! against the shared signing contract, and gates its product/coupon
//! endpoints on the extracted role claim. Performs no credential
//! verification of its own.

pub mod app;
pub mod context;
pub mod dto;
pub mod errors;
pub mod middleware;
pub mod routes;
pub mod store;
