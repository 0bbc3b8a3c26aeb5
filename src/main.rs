use chess_llm_server::api::router::create_router;
use chess_llm_server::api::state::AppState;
use chess_llm_server::config::AppConfig;

#[tokio::main]
async fn main() {
    // `--health-check` probes a running instance and exits; container
    // healthchecks invoke the binary this way instead of needing curl.
    if std::env::args().any(|a| a == "--health-check") {
        match probe_health().await {
            Ok(()) => std::process::exit(0),
            Err(e) => {
                eprintln!("Health check failed: {e}");
                std::process::exit(1);
            }
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chess_llm_server=info,tower_http=info".into()),
        )
        .init();

    let config = AppConfig::from_env();
    let bind_addr = config.bind_addr();
    let state = AppState::new(config);

    let app = create_router(state);

    tracing::info!(
        "chess-llm-server v{} listening on {bind_addr}",
        env!("CARGO_PKG_VERSION")
    );

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app).await.expect("Server error");
}

/// Hit the local /health endpoint and report success or failure.
async fn probe_health() -> Result<(), Box<dyn std::error::Error>> {
    let port = std::env::var("PORT").unwrap_or_else(|_| "8082".to_string());
    let resp = reqwest::get(format!("http://127.0.0.1:{port}/health")).await?;
    if resp.status().is_success() {
        Ok(())
    } else {
        Err(format!("health endpoint returned {}", resp.status()).into())
    }
}
