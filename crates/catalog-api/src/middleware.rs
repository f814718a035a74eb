use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use bazaar_auth::TokenValidator;

use crate::context::CallerContext;

#[derive(Clone)]
pub struct AuthState {
    pub validator: Arc<TokenValidator>,
}

/// Request gate: every protected route requires a verifiable bearer token.
///
/// Validation is purely computational (shared key loaded at startup, no
/// I/O), so it runs on every request.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let token = extract_bearer(req.headers())?;

    let claims = state.validator.validate(token, Utc::now()).map_err(|e| {
        tracing::debug!(error = %e, "token rejected");
        StatusCode::UNAUTHORIZED
    })?;

    req.extensions_mut().insert(CallerContext::new(claims));

    Ok(next.run(req).await)
}

fn extract_bearer(headers: &HeaderMap) -> Result<&str, StatusCode> {
    let header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let header = header.to_str().map_err(|_| StatusCode::UNAUTHORIZED)?;

    let header = header
        .strip_prefix("Bearer ")
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let token = header.trim();
    if token.is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    Ok(token)
}
