use axum::{Json, http::StatusCode, response::IntoResponse};

use bazaar_auth::Role;
use bazaar_core::Envelope;

use crate::context::CallerContext;
use crate::store::CatalogError;

pub fn envelope_error(status: StatusCode, message: impl Into<String>) -> axum::response::Response {
    (status, Json(Envelope::fail(message))).into_response()
}

/// Gate a mutating operation on the administrative role.
pub fn require_admin(caller: &CallerContext) -> Result<(), axum::response::Response> {
    caller
        .claims()
        .require_role(&[Role::ADMIN])
        .map_err(|e| envelope_error(StatusCode::FORBIDDEN, e.to_string()))
}

pub fn catalog_error_to_response(err: CatalogError) -> axum::response::Response {
    match err {
        CatalogError::NotFound => envelope_error(StatusCode::NOT_FOUND, err.to_string()),
        CatalogError::DuplicateCode => envelope_error(StatusCode::BAD_REQUEST, err.to_string()),
        CatalogError::StoreFault(msg) => {
            tracing::error!(error = %msg, "catalog store fault");
            envelope_error(StatusCode::INTERNAL_SERVER_ERROR, msg)
        }
    }
}
