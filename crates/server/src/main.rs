//! Service broker daemon.

use anyhow::{Context, Result};
use clap::Parser;
use objbroker_server::bootstrap::initialize;
use objbroker_server::{AppState, create_router};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// objbrokerd - object storage service broker
#[derive(Parser, Debug)]
#[command(name = "objbrokerd")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(
        short,
        long,
        env = "OBJBROKER_CONFIG",
        default_value = "config/server.toml"
    )]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("objbrokerd v{}", env!("CARGO_PKG_VERSION"));

    let config = objbroker_server::config::load(Path::new(&args.config))?;
    let catalog = Arc::new(config.validate().context("invalid configuration")?);
    tracing::info!(services = catalog.len(), "Service catalog loaded");

    let management = objbroker_management::from_config(&config.management)
        .await
        .context("failed to initialize management client")?;
    tracing::info!(
        backend = management.backend_name(),
        "Management client initialized"
    );

    // Fail before bootstrapping if the management API is unreachable or the
    // credentials are rejected.
    management
        .health_check()
        .await
        .context("management API health check failed")?;
    tracing::info!("Management API connectivity verified");

    let (provisioner, repository) = initialize(management.clone(), catalog, &config.broker)
        .await
        .context("repository bootstrap failed")?;
    tracing::info!(
        endpoint = %repository.endpoint,
        bucket = %repository.bucket,
        user = %repository.user,
        "Repository ready"
    );

    let addr: SocketAddr = config.server.bind.parse().context("invalid bind address")?;
    let state = AppState::new(config, management.clone(), provisioner, repository);
    let app = create_router(state);

    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {}", addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Err(e) = management.close().await {
        tracing::warn!(error = %e, "Failed to close management session");
    }
    tracing::info!("Shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
