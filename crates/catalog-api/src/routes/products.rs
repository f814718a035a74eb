use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde_json::json;

use bazaar_core::Envelope;

use crate::context::CallerContext;
use crate::dto::ProductRequest;
use crate::errors::{catalog_error_to_response, require_admin};
use crate::store::{CatalogStore, Product};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
}

/// Read-only: any valid token may list.
async fn list_products(Extension(store): Extension<CatalogStore>) -> axum::response::Response {
    match store.list_products() {
        Ok(products) => (StatusCode::OK, Json(Envelope::ok(json!(products)))).into_response(),
        Err(e) => catalog_error_to_response(e),
    }
}

async fn get_product(
    Extension(store): Extension<CatalogStore>,
    Path(id): Path<u32>,
) -> axum::response::Response {
    match store.get_product(id) {
        Ok(product) => (StatusCode::OK, Json(Envelope::ok(json!(product)))).into_response(),
        Err(e) => catalog_error_to_response(e),
    }
}

async fn create_product(
    Extension(store): Extension<CatalogStore>,
    Extension(caller): Extension<CallerContext>,
    Json(body): Json<ProductRequest>,
) -> axum::response::Response {
    if let Err(resp) = require_admin(&caller) {
        return resp;
    }

    match store.create_product(body.name, body.price, body.description, body.category_name) {
        Ok(product) => {
            tracing::info!(product = product.id, caller = %caller.claims().sub, "product created");
            (StatusCode::OK, Json(Envelope::ok(json!(product)))).into_response()
        }
        Err(e) => catalog_error_to_response(e),
    }
}

async fn update_product(
    Extension(store): Extension<CatalogStore>,
    Extension(caller): Extension<CallerContext>,
    Path(id): Path<u32>,
    Json(body): Json<ProductRequest>,
) -> axum::response::Response {
    if let Err(resp) = require_admin(&caller) {
        return resp;
    }

    let product = Product {
        id,
        name: body.name,
        price: body.price,
        description: body.description,
        category_name: body.category_name,
    };
    match store.update_product(product) {
        Ok(product) => (StatusCode::OK, Json(Envelope::ok(json!(product)))).into_response(),
        Err(e) => catalog_error_to_response(e),
    }
}

async fn delete_product(
    Extension(store): Extension<CatalogStore>,
    Extension(caller): Extension<CallerContext>,
    Path(id): Path<u32>,
) -> axum::response::Response {
    if let Err(resp) = require_admin(&caller) {
        return resp;
    }

    match store.delete_product(id) {
        Ok(()) => (StatusCode::OK, Json(Envelope::ok_empty())).into_response(),
        Err(e) => catalog_error_to_response(e),
    }
}
