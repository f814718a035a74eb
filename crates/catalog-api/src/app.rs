use std::sync::Arc;

use axum::{Router, extract::Extension, http::StatusCode, routing::get};

use bazaar_auth::TokenValidator;

use crate::middleware::AuthState;
use crate::routes;
use crate::store::CatalogStore;

pub fn build_app(jwt_secret: String) -> Router {
    let auth_state = AuthState {
        validator: Arc::new(TokenValidator::new(jwt_secret.as_bytes())),
    };
    let store = CatalogStore::new();

    // Every catalog route requires a verified token; role checks happen
    // per-operation in the handlers.
    let protected = Router::new()
        .nest("/api/product", routes::products::router())
        .nest("/api/coupon", routes::coupons::router())
        .layer(Extension(store))
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            crate::middleware::auth_middleware,
        ));

    Router::new().route("/health", get(health)).merge(protected)
}

async fn health() -> StatusCode {
    StatusCode::OK
}
