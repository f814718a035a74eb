#[tokio::main]
async fn main() {
    bazaar_observability::init();

    let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
        tracing::warn!("JWT_SECRET not set; using insecure dev default");
        "dev-secret".to_string()
    });

    let bind = std::env::var("AUTH_BIND").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    let app = bazaar_auth_api::app::build_app(jwt_secret);

    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {bind}: {e}"));

    tracing::info!("auth api listening on {}", listener.local_addr().unwrap());

    axum::serve(listener, app).await.unwrap();
}
