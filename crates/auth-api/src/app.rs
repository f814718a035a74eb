use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use chrono::Utc;
use serde_json::json;

use bazaar_auth::{Role, TokenIssuer};
use bazaar_core::Envelope;

use crate::dto::{AssignRoleRequest, LoginRequest, RegisterRequest, UserDto};
use crate::store::{AssignmentError, CredentialStore, IdentityStore, RegistrationError, RoleAssigner};

#[derive(Clone)]
pub struct AppState {
    pub credentials: CredentialStore,
    pub roles: RoleAssigner,
    pub issuer: Arc<TokenIssuer>,
}

pub fn build_app(jwt_secret: String) -> Router {
    let store = IdentityStore::new();
    let state = AppState {
        credentials: store.credentials(),
        roles: store.role_assigner(),
        issuer: Arc::new(TokenIssuer::new(jwt_secret.as_bytes())),
    };

    Router::new()
        .route("/health", get(health))
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/assignRole", post(assign_role))
        .with_state(state)
}

async fn health() -> StatusCode {
    StatusCode::OK
}

async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> (StatusCode, Json<Envelope>) {
    match state
        .credentials
        .register(&body.email, &body.name, &body.phone_number, &body.password)
    {
        Ok(user) => {
            tracing::info!(user = %user.id, "user registered");
            (StatusCode::OK, Json(Envelope::ok_empty()))
        }
        Err(RegistrationError::StoreFault(msg)) => {
            tracing::error!(error = %msg, "registration store fault");
            (StatusCode::INTERNAL_SERVER_ERROR, Json(Envelope::fail(msg)))
        }
        Err(e) => (StatusCode::BAD_REQUEST, Json(Envelope::fail(e.to_string()))),
    }
}

async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> (StatusCode, Json<Envelope>) {
    let user = match state.credentials.verify(&body.username, &body.password) {
        Ok(user) => user,
        Err(_) => {
            // Deliberately one message for both NotFound and InvalidCredential,
            // so a caller cannot probe which identities exist.
            return (
                StatusCode::BAD_REQUEST,
                Json(Envelope::fail("user or password is incorrect")),
            );
        }
    };

    let role = user.effective_role();
    match state
        .issuer
        .issue(user.id, &user.email, &user.name, &role, Utc::now())
    {
        Ok(token) => {
            tracing::info!(user = %user.id, role = %role, "login succeeded");
            (
                StatusCode::OK,
                Json(Envelope::ok(json!({
                    "user": UserDto::from(&user),
                    "token": token,
                }))),
            )
        }
        Err(e) => {
            tracing::error!(error = %e, "token issuance failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(Envelope::fail(e.to_string())),
            )
        }
    }
}

async fn assign_role(
    State(state): State<AppState>,
    Json(body): Json<AssignRoleRequest>,
) -> (StatusCode, Json<Envelope>) {
    match state.roles.assign(&body.email, Role::new(body.role)) {
        Ok(()) => (StatusCode::OK, Json(Envelope::ok_empty())),
        Err(AssignmentError::StoreFault(msg)) => {
            tracing::error!(error = %msg, "role assignment store fault");
            (StatusCode::INTERNAL_SERVER_ERROR, Json(Envelope::fail(msg)))
        }
        Err(e) => (StatusCode::BAD_REQUEST, Json(Envelope::fail(e.to_string()))),
    }
}
