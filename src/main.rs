use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{error, info};
use voice_handoff::{
    create_router, AppState, Config, FileStore, HandoffStore, MemoryStore, StoreBackend, Sweeper,
};

/// Relay between a browser voice-capture page and a design-tool plugin
#[derive(Debug, Parser)]
#[command(name = "voice-handoff")]
struct Args {
    /// Config file path, without extension
    #[arg(short, long, default_value = "config/voice-handoff")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let cfg = Config::load(&args.config)?;

    info!("{} v{}", cfg.service.name, env!("CARGO_PKG_VERSION"));

    let ttl = Duration::from_secs(cfg.store.ttl_secs);
    let store: Arc<dyn HandoffStore> = match cfg.store.backend {
        StoreBackend::Memory => {
            info!("Using in-memory store (TTL: {}s)", cfg.store.ttl_secs);
            Arc::new(MemoryStore::new(ttl))
        }
        StoreBackend::File => {
            info!(
                "Using file store at {} (TTL: {}s)",
                cfg.store.data_dir, cfg.store.ttl_secs
            );
            Arc::new(FileStore::new(&cfg.store.data_dir, ttl).await?)
        }
    };

    let sweeper = Sweeper::start(
        Arc::clone(&store),
        Duration::from_secs(cfg.store.sweep_interval_secs),
    );

    let state = AppState::new(store, cfg.service.name.clone());
    let app = create_router(state);

    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    sweeper.shutdown();
    info!("Shut down cleanly");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => error!("Failed to listen for shutdown signal: {}", e),
    }
}
