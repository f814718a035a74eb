use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::StatusCode;
use serde_json::json;

use bazaar_auth::{AccessClaims, Role, TokenIssuer};
use bazaar_core::UserId;

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn(jwt_secret: &str) -> Self {
        let app = bazaar_catalog_api::app::build_app(jwt_secret.to_string());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn mint(jwt_secret: &str, role: Role) -> String {
    TokenIssuer::new(jwt_secret.as_bytes())
        .issue(UserId::new(), "a@x.com", "Alice", &role, Utc::now())
        .expect("failed to mint token")
}

fn mint_expired(jwt_secret: &str) -> String {
    let now = Utc::now();
    let claims = AccessClaims {
        sub: UserId::new(),
        email: "a@x.com".to_string(),
        name: "Alice".to_string(),
        role: Role::ADMIN,
        iat: (now - Duration::hours(2)).timestamp(),
        exp: (now - Duration::hours(1)).timestamp(),
    };
    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_bytes()),
    )
    .expect("failed to encode jwt")
}

#[tokio::test]
async fn requests_without_a_token_are_unauthorized() {
    let srv = TestServer::spawn("test-secret").await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/api/product", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn bad_tokens_are_unauthorized() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;
    let client = reqwest::Client::new();

    let valid = mint(jwt_secret, Role::CUSTOMER);
    let mut tampered_bytes = valid.clone().into_bytes();
    let mid = tampered_bytes.len() / 2;
    tampered_bytes[mid] = if tampered_bytes[mid] == b'A' { b'B' } else { b'A' };
    let tampered = String::from_utf8(tampered_bytes).unwrap();

    for token in ["garbage", &tampered, &mint_expired(jwt_secret)] {
        let res = client
            .get(format!("{}/api/product", srv.base_url))
            .bearer_auth(token)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "token: {token}");
    }
}

#[tokio::test]
async fn any_valid_token_may_read() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;
    let client = reqwest::Client::new();

    let token = mint(jwt_secret, Role::CUSTOMER);
    let res = client
        .get(format!("{}/api/product", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["isSuccess"], true);
    assert_eq!(body["result"], json!([]));
}

#[tokio::test]
async fn mutations_require_the_admin_role() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;
    let client = reqwest::Client::new();

    let customer = mint(jwt_secret, Role::CUSTOMER);
    let res = client
        .post(format!("{}/api/product", srv.base_url))
        .bearer_auth(&customer)
        .json(&json!({ "name": "Mango", "price": 5.0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["isSuccess"], false);
    assert!(body["message"].as_str().unwrap().contains("CUSTOMER"));
}

#[tokio::test]
async fn admin_product_lifecycle() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;
    let client = reqwest::Client::new();
    let admin = mint(jwt_secret, Role::ADMIN);

    // Create
    let res = client
        .post(format!("{}/api/product", srv.base_url))
        .bearer_auth(&admin)
        .json(&json!({
            "name": "Mango",
            "price": 5.0,
            "description": "ripe",
            "categoryName": "Fruit",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    let id = body["result"]["id"].as_u64().unwrap();

    // Update
    let res = client
        .put(format!("{}/api/product/{}", srv.base_url, id))
        .bearer_auth(&admin)
        .json(&json!({ "name": "Mango", "price": 6.5 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["result"]["price"], 6.5);

    // A customer can read it back.
    let customer = mint(jwt_secret, Role::CUSTOMER);
    let res = client
        .get(format!("{}/api/product/{}", srv.base_url, id))
        .bearer_auth(&customer)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    // Delete, then the record is gone.
    let res = client
        .delete(format!("{}/api/product/{}", srv.base_url, id))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .get(format!("{}/api/product/{}", srv.base_url, id))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["isSuccess"], false);
}

#[tokio::test]
async fn coupon_lookup_by_code_is_case_insensitive() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;
    let client = reqwest::Client::new();
    let admin = mint(jwt_secret, Role::ADMIN);

    let res = client
        .post(format!("{}/api/coupon", srv.base_url))
        .bearer_auth(&admin)
        .json(&json!({ "couponCode": "10OFF", "discountAmount": 10.0, "minAmount": 20.0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .get(format!("{}/api/coupon/by-code/10off", srv.base_url))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["result"]["couponCode"], "10OFF");

    // Duplicate codes are rejected through the envelope.
    let res = client
        .post(format!("{}/api/coupon", srv.base_url))
        .bearer_auth(&admin)
        .json(&json!({ "couponCode": "10off", "discountAmount": 5.0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["isSuccess"], false);
}
