//! Client side of the identity service, as called by the web tier.

use serde_json::json;
use thiserror::Error;

use bazaar_core::Envelope;

use crate::dispatch::{ApiRequest, OutboundDispatcher};
use crate::session::{LocalSession, SessionBridge, SessionError};

#[derive(Debug, Clone)]
pub struct RegisterForm {
    pub email: String,
    pub name: String,
    pub phone_number: String,
    pub password: String,
    /// Role to grant after the account exists; empty means the default.
    pub role: String,
}

#[derive(Debug, Error)]
pub enum SignInError {
    /// The issuer answered with a failure envelope; its message is shown
    /// to the user verbatim.
    #[error("{0}")]
    Rejected(String),

    /// Success envelope without a token payload.
    #[error("login succeeded but no token was returned")]
    MissingToken,

    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Talks to the identity service. Registration and login are anonymous
/// calls, so nothing here attaches a bearer token.
#[derive(Debug, Clone)]
pub struct AuthClient {
    base_url: String,
    dispatcher: OutboundDispatcher,
}

impl AuthClient {
    pub fn new(base_url: impl Into<String>, dispatcher: OutboundDispatcher) -> Self {
        Self {
            base_url: base_url.into(),
            dispatcher,
        }
    }

    pub async fn register(&self, form: &RegisterForm) -> Envelope {
        let request = ApiRequest::post(
            format!("{}/register", self.base_url),
            json!({
                "email": form.email,
                "name": form.name,
                "phoneNumber": form.phone_number,
                "password": form.password,
            }),
        );
        self.dispatcher.send(request, false).await
    }

    pub async fn assign_role(&self, email: &str, role: &str) -> Envelope {
        let request = ApiRequest::post(
            format!("{}/assignRole", self.base_url),
            json!({ "email": email, "role": role }),
        );
        self.dispatcher.send(request, false).await
    }

    /// Register, then grant the requested role. A blank role on the form
    /// falls back to the default customer role.
    pub async fn register_with_role(&self, form: &RegisterForm) -> Envelope {
        let registered = self.register(form).await;
        if registered.is_failure() {
            return registered;
        }

        let role = if form.role.is_empty() {
            bazaar_auth::Role::CUSTOMER.as_str().to_string()
        } else {
            form.role.clone()
        };
        self.assign_role(&form.email, &role).await
    }

    pub async fn login(&self, username: &str, password: &str) -> Envelope {
        let request = ApiRequest::post(
            format!("{}/login", self.base_url),
            json!({ "username": username, "password": password }),
        );
        self.dispatcher.send(request, false).await
    }

    /// Full sign-in: authenticate, then bridge the issued token into a
    /// browser session.
    pub async fn sign_in(
        &self,
        bridge: &SessionBridge,
        username: &str,
        password: &str,
    ) -> Result<LocalSession, SignInError> {
        let envelope = self.login(username, password).await;
        if envelope.is_failure() {
            return Err(SignInError::Rejected(envelope.message));
        }

        let token = envelope
            .result
            .as_ref()
            .and_then(|r| r["token"].as_str())
            .ok_or(SignInError::MissingToken)?;

        Ok(bridge.establish(token)?)
    }
}
