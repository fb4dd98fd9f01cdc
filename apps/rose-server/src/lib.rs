//! # rose-server
//!
//! HTTP API for ROSE POS. One binary serves both clients; the configured
//! surface decides which route groups exist.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         rose-server Modules                             │
//! │                                                                         │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────────┐ │
//! │  │  routes        │  │  auth          │  │  state                     │ │
//! │  │                │  │                │  │                            │ │
//! │  │ • health       │  │ • JwtManager   │  │ • Database                 │ │
//! │  │ • auth         │  │ • RequireAdmin │  │ • ServerConfig             │ │
//! │  │ • admin        │  │ • AuthEvent    │  │ • AuthEvent broadcast      │ │
//! │  │ • pos          │  │                │  │                            │ │
//! │  │ • report       │  │                │  │                            │ │
//! │  └────────────────┘  └────────────────┘  └────────────────────────────┘ │
//! │                                                                         │
//! │  config: defaults ◄── rose.toml ◄── ROSE_* env                          │
//! │  error:  ApiError { code, message } ──► (status, JSON)                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! Environment variables:
//! - `ROSE_SURFACE` - `mobile` (default) or `browser`
//! - `ROSE_DB_PATH` - SQLite file
//! - `ROSE_BIND_ADDR` / `ROSE_PORT` - listen address (default `0.0.0.0:8080`)
//! - `ROSE_UTC_OFFSET_MINUTES` - shop clock offset (default -300)
//! - `ROSE_JWT_SECRET` - admin token signing secret

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;

pub use config::ServerConfig;
pub use error::{ApiError, ErrorCode};
pub use routes::build_router;
pub use state::AppState;

use tracing_subscriber::EnvFilter;

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=rose_db=trace` - Show trace for one crate only
/// - Default: INFO, DEBUG for the rose crates
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,rose=debug,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).with_target(true).init();
}
