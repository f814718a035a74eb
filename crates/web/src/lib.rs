//! `bazaar-web` — front-end tier glue (no views).
//!
//! The web tier is a token consumer: it signs users in against the issuer,
//! bridges the issued token into a locally recognized browser identity, and
//! reattaches the raw token to every outbound resource-service call.

pub mod auth_client;
pub mod cookie;
pub mod dispatch;
pub mod session;

pub use auth_client::{AuthClient, RegisterForm, SignInError};
pub use cookie::{CookieCodec, CookieError, CookieIdentity};
pub use dispatch::{ApiMethod, ApiRequest, OutboundDispatcher, TokenStore};
pub use session::{LocalSession, SessionBridge, SessionError};
