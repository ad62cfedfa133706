use anyhow::Context;
use clap::Parser;

use care_alerts_core::{AdvisoryOrchestrator, SqliteStore};
use care_alerts_server::{create_router, logging, AppState, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_tracing();
    let config = ServerConfig::parse();

    let store = SqliteStore::open(&config.database)
        .with_context(|| format!("opening database {}", config.database.display()))?;
    tracing::info!(path = %config.database.display(), "database ready");

    let pipeline = config.pipeline_config();
    let generator = config.advisory_generator();
    tracing::info!(
        scoring = pipeline.scoring_enabled,
        advisory = pipeline.advisory_enabled,
        generator = ?generator.as_ref().map(|g| g.name()),
        "pipeline configured"
    );

    let orchestrator = AdvisoryOrchestrator::new(std::sync::Arc::new(store), generator, pipeline);
    let app = create_router(AppState::new(orchestrator));

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("binding {}", config.bind))?;
    tracing::info!(addr = %config.bind, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}
