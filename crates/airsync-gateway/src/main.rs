use std::net::SocketAddr;
use std::sync::Arc;

use airsync_core::{AirsyncConfig, LatestReading};
use airsync_scheduler::{PeriodicEngine, ReplicationJob, WriterJob};
use airsync_store::{db, MySqlStore, PgMirrorStore, PrimaryStore, SecondaryStore};
use clap::Parser;
use tracing::{info, warn};

mod app;
mod http;

/// Air-quality sensor generator with MySQL to PostgreSQL replication.
#[derive(Parser, Debug)]
#[command(name = "airsync-gateway", version)]
struct Cli {
    /// TOML config file (overrides $AIRSYNC_CONFIG and ./airsync.toml)
    #[arg(long)]
    config: Option<String>,

    /// Run the periodic tasks without opening the HTTP listener
    #[arg(long)]
    no_http: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "airsync_gateway=info,airsync_scheduler=info,airsync_store=info,tower_http=info"
                    .into()
            }),
        )
        .init();

    let cli = Cli::parse();
    let config = AirsyncConfig::load(cli.config.as_deref())?;
    info!(
        primary = %config.primary.summary(),
        secondary = %config.secondary.summary(),
        "configuration loaded"
    );

    // schema bootstrap is the only fatal step
    db::ensure_primary(&config.primary).await?;
    db::ensure_secondary(&config.secondary).await?;

    let primary: Arc<dyn PrimaryStore> = Arc::new(MySqlStore::connect(&config.primary).await?);
    let mirror: Arc<dyn SecondaryStore> =
        Arc::new(PgMirrorStore::connect(&config.secondary).await?);
    let latest = LatestReading::new();

    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);

    let writer = PeriodicEngine::new(
        WriterJob::new(Arc::clone(&primary), latest.clone()),
        config.writer.interval(),
    );
    let writer_task = tokio::spawn(writer.run(shutdown_rx.clone()));

    let replication = PeriodicEngine::new(
        ReplicationJob::new(primary, mirror, config.replication.batch_size),
        config.replication.interval(),
    );
    let replication_task = tokio::spawn(replication.run(shutdown_rx));

    if config.http.enabled && !cli.no_http {
        let state = Arc::new(app::AppState::new(latest));
        let router = app::build_router(state);

        let addr: SocketAddr = format!("{}:{}", config.http.bind, config.http.port).parse()?;
        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!("status endpoint listening on {}", addr);
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
    } else {
        info!("HTTP listener disabled");
        shutdown_signal().await;
    }

    // signal both engines to stop after their current tick
    let _ = shutdown_tx.send(true);
    let writes = writer_task.await?;
    let syncs = replication_task.await?;
    info!(writer_ticks = writes, replication_ticks = syncs, "shut down");
    Ok(())
}

/// Resolves on Ctrl-C. If the handler cannot be installed it never resolves,
/// so the service keeps running.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}
