//! taskdash - HTTP Server Entry Point
//!
//! Starts the HTTP server that serves the dashboard and its live refresh
//! stream.

use taskdash::{api, config::Config};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskdash=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    info!(
        "Loaded configuration: roadmap={} activity_log={} projects_root={}",
        config.roadmap_path.display(),
        config.activity_log_path.display(),
        config.projects_root.display()
    );

    api::serve(config).await?;

    Ok(())
}
