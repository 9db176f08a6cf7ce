//! dwellings-server binary

use dwellings_server::{AppState, Config, router};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dwellings_server=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env()?;
    tracing::info!("Starting dwellings-server (env: {})", config.environment);
    if config.anon_key.is_none() {
        tracing::warn!("ANON_KEY not set, API routes accept anonymous requests");
    }

    let addr = format!("0.0.0.0:{}", config.http_port);
    let app = router(AppState::new(config));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("dwellings-server listening on {addr}");
    axum::serve(listener, app).await?;

    Ok(())
}
