//! PDF Knowledge Connect web front-end
//!
//! Run with: cargo run -p pdfconnect-web

use std::net::SocketAddr;
use pdfconnect_config::Config;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialise structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("pdfconnect=debug,info")),
        )
        .init();

    info!("Starting PDF Knowledge Connect v{}", env!("CARGO_PKG_VERSION"));

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            warn!("Could not load configuration: {e}");
            warn!("Falling back to defaults");
            Config::default()
        }
    };
    info!("Analysis backend: {}", config.backend_base_url());
    info!(
        "Browser sessions expire after {}s idle (max {})",
        config.server.session_idle_secs, config.server.max_sessions
    );

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;

    let state = pdfconnect_web::state::AppState::from_config(config)?;
    let app = pdfconnect_web::router::build_router(state);

    info!("Server listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
