//! # ROSE POS Server
//!
//! ## Usage
//! ```bash
//! # Counter phone API (point of sale + reporting)
//! cargo run -p rose-server
//!
//! # Back office API (admin + reporting), explicit config file
//! ROSE_SURFACE=browser cargo run -p rose-server -- --config ./rose.toml
//! ```

use std::path::PathBuf;

use rose_db::{Database, DbConfig};
use rose_server::{build_router, init_tracing, AppState, ServerConfig};
use tokio::net::TcpListener;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config_path = config_path_arg();
    let config = ServerConfig::load(config_path)?;

    let db_path = config.database_path();
    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    info!(
        surface = %config.server.surface,
        db = %db_path.display(),
        store = %config.store.name,
        "Starting ROSE POS server..."
    );

    let db = Database::new(DbConfig::new(&db_path)).await?;
    let bind_addr = config.server.bind_address();
    let state = AppState::new(db.clone(), config);
    let app = build_router(state);

    let listener = TcpListener::bind(&bind_addr).await?;
    info!(addr = %bind_addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// `--config <path>` / `-c <path>`.
fn config_path_arg() -> Option<PathBuf> {
    let args: Vec<String> = std::env::args().collect();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => return args.get(i + 1).map(PathBuf::from),
            other => warn!(arg = %other, "Ignoring unknown argument"),
        }
        i += 1;
    }
    None
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
