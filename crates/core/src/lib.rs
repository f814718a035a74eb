//! `bazaar-core` — primitives shared by every service and the front-end.

pub mod envelope;
pub mod id;

pub use envelope::Envelope;
pub use id::UserId;
