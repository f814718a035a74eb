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
use crate::dto::CouponRequest;
use crate::errors::{catalog_error_to_response, require_admin};
use crate::store::{CatalogStore, Coupon};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_coupons).post(create_coupon))
        .route(
            "/:id",
            get(get_coupon).put(update_coupon).delete(delete_coupon),
        )
        .route("/by-code/:code", get(get_coupon_by_code))
}

async fn list_coupons(Extension(store): Extension<CatalogStore>) -> axum::response::Response {
    match store.list_coupons() {
        Ok(coupons) => (StatusCode::OK, Json(Envelope::ok(json!(coupons)))).into_response(),
        Err(e) => catalog_error_to_response(e),
    }
}

async fn get_coupon(
    Extension(store): Extension<CatalogStore>,
    Path(id): Path<u32>,
) -> axum::response::Response {
    match store.get_coupon(id) {
        Ok(coupon) => (StatusCode::OK, Json(Envelope::ok(json!(coupon)))).into_response(),
        Err(e) => catalog_error_to_response(e),
    }
}

async fn get_coupon_by_code(
    Extension(store): Extension<CatalogStore>,
    Path(code): Path<String>,
) -> axum::response::Response {
    match store.coupon_by_code(&code) {
        Ok(coupon) => (StatusCode::OK, Json(Envelope::ok(json!(coupon)))).into_response(),
        Err(e) => catalog_error_to_response(e),
    }
}

async fn create_coupon(
    Extension(store): Extension<CatalogStore>,
    Extension(caller): Extension<CallerContext>,
    Json(body): Json<CouponRequest>,
) -> axum::response::Response {
    if let Err(resp) = require_admin(&caller) {
        return resp;
    }

    match store.create_coupon(body.coupon_code, body.discount_amount, body.min_amount) {
        Ok(coupon) => {
            tracing::info!(coupon = coupon.id, caller = %caller.claims().sub, "coupon created");
            (StatusCode::OK, Json(Envelope::ok(json!(coupon)))).into_response()
        }
        Err(e) => catalog_error_to_response(e),
    }
}

async fn update_coupon(
    Extension(store): Extension<CatalogStore>,
    Extension(caller): Extension<CallerContext>,
    Path(id): Path<u32>,
    Json(body): Json<CouponRequest>,
) -> axum::response::Response {
    if let Err(resp) = require_admin(&caller) {
        return resp;
    }

    let coupon = Coupon {
        id,
        coupon_code: body.coupon_code,
        discount_amount: body.discount_amount,
        min_amount: body.min_amount,
    };
    match store.update_coupon(coupon) {
        Ok(coupon) => (StatusCode::OK, Json(Envelope::ok(json!(coupon)))).into_response(),
        Err(e) => catalog_error_to_response(e),
    }
}

async fn delete_coupon(
    Extension(store): Extension<CatalogStore>,
    Extension(caller): Extension<CallerContext>,
    Path(id): Path<u32>,
) -> axum::response::Response {
    if let Err(resp) = require_admin(&caller) {
        return resp;
    }

    match store.delete_coupon(id) {
        Ok(()) => (StatusCode::OK, Json(Envelope::ok_empty())).into_response(),
        Err(e) => catalog_error_to_response(e),
    }
}
