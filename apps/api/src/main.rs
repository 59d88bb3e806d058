mod chat;
mod config;
mod convex;
mod errors;
mod http;
mod llm_client;
mod models;
mod reports;
mod routes;
mod state;
mod wanted_persons;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Informa API v{}", env!("CARGO_PKG_VERSION"));

    for (name, present) in [
        ("FIRECRAWL_API_KEY", config.firecrawl_api_key.is_some()),
        ("OPENROUTER_API_KEY", config.openrouter_api_key.is_some()),
        ("CONVEX_DEPLOYMENT_URL", config.convex_deployment_url.is_some()),
        ("RESEND_API_KEY", config.resend_api_key.is_some()),
        ("RECIPIENTS", config.recipients.is_some()),
    ] {
        if !present {
            warn!("{name} is not set; dependent endpoints will return configuration errors");
        }
    }

    let port = config.port;
    let state = AppState::from_config(config);
    info!(
        "Wanted persons dataset: {} (model: {})",
        state.store.path().display(),
        llm_client::MODEL
    );

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{port}").parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
