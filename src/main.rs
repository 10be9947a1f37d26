#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    // Initialize configuration (this loads the config singleton)
    let config = campdir_api::config::config();
    tracing::info!("Starting Campdir API in {:?} mode", config.environment);

    tracing_subscriber::fmt::init();

    let app = campdir_api::routes::app();

    // Allow tests or deployments to override port via env
    let port = std::env::var("CAMPDIR_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(5000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    println!("🚀 Campdir API server listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}
