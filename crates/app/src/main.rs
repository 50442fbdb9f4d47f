use std::sync::Arc;
use std::time::Duration;

use app::config::{Config, prepare_sqlite_file, print_usage};
use app::{AppState, create_router, spawn_session_purge};
use services::{AppServices, Clock};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const PURGE_INTERVAL: Duration = Duration::from_secs(60);

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(%err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = match Config::parse(std::env::args().skip(1), |key| std::env::var(key).ok()) {
        Ok(Some(config)) => config,
        Ok(None) => {
            print_usage();
            return Ok(());
        }
        Err(err) => {
            print_usage();
            return Err(err.into());
        }
    };

    init_tracing();

    // Open + migrate SQLite at startup. Keep this in the binary glue so services stay pure.
    prepare_sqlite_file(&config.db_url)?;
    let session_ttl = chrono::Duration::try_seconds(config.session_ttl_secs)
        .ok_or("session ttl is out of range")?;
    let services = AppServices::new_sqlite(
        &config.data_dir,
        &config.db_url,
        Clock::default_clock(),
        session_ttl,
    )
    .await?;

    let _purge = spawn_session_purge(services.sessions(), PURGE_INTERVAL);
    let state = Arc::new(AppState::new(services, config.secure_cookies));
    let app = create_router(state);

    let addr = config.listen_addr()?;
    let listener = TcpListener::bind(addr).await?;
    info!(
        %addr,
        data_dir = %config.data_dir.display(),
        db = %config.db_url,
        "rccm quiz server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("rccm quiz server stopped");
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
