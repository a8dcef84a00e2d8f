use anyhow::{Context, Result};
use tokio::signal::unix::{signal, Signal, SignalKind};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use terabox_link::config::{Config, CONFIG_FILE};
use terabox_link::{create_router, AppState, TeraboxResolver};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match Config::get_config() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("Error reading {}: {}", CONFIG_FILE, e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(config).await {
        tracing::error!("{e:#}");
        std::process::exit(1);
    }
}

async fn run(config: Config) -> Result<()> {
    let addr = config.bind_addr()?;
    let state = AppState::new(
        TeraboxResolver::new(config.client_options()),
        &config.cookies_file,
    );

    // Register signal handlers
    let terminate = signal(SignalKind::terminate()).context("Error creating SIGTERM handler")?;
    let interrupt = signal(SignalKind::interrupt()).context("Error creating SIGINT handler")?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(
        cookies_file = %config.cookies_file.display(),
        "terabox-link v{} listening on {addr}",
        env!("CARGO_PKG_VERSION")
    );

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown(terminate, interrupt))
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown(mut terminate: Signal, mut interrupt: Signal) {
    tokio::select! {
        _ = terminate.recv() => tracing::info!("Received SIGTERM, exiting"),
        _ = interrupt.recv() => tracing::info!("Received SIGINT, exiting"),
    }
}
