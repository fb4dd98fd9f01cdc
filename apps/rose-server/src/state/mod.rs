//! # State Module
//!
//! Shared state handed to every handler through axum's `State` extractor.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────┐  ┌────────────┐  │
//! │  │   Database   │  │ ServerConfig │  │  JwtManager  │  │ AuthEvent  │  │
//! │  │  (SQLite     │  │  Arc, read   │  │  Arc, read   │  │ broadcast  │  │
//! │  │   pool)      │  │  only        │  │  only        │  │ Sender     │  │
//! │  └──────────────┘  └──────────────┘  └──────────────┘  └────────────┘  │
//! │                                                                         │
//! │  THREAD SAFETY:                                                         │
//! │  • Database: internal connection pool (thread-safe)                     │
//! │  • Config / JWT: read-only after startup                                │
//! │  • Events: broadcast sender is Clone + Send                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use chrono::{FixedOffset, NaiveDate, Utc};
use rose_core::checkout::DiscountPolicy;
use rose_core::pagination::PageRequest;
use rose_core::report::local_date;
use rose_core::surface::Capabilities;
use rose_db::Database;
use tokio::sync::broadcast;
use tracing::trace;

use crate::auth::{AuthEvent, JwtManager};
use crate::config::ServerConfig;
use crate::error::{ApiError, ApiResult};

/// Auth event channel capacity.
const EVENT_CHANNEL_CAPACITY: usize = 256;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Arc<ServerConfig>,
    pub jwt: Arc<JwtManager>,
    pub events: broadcast::Sender<AuthEvent>,
}

impl AppState {
    pub fn new(db: Database, config: ServerConfig) -> Self {
        let jwt = JwtManager::new(config.auth.jwt_secret.clone(), config.auth.token_lifetime_secs);
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        AppState {
            db,
            config: Arc::new(config),
            jwt: Arc::new(jwt),
            events,
        }
    }

    pub fn capabilities(&self) -> Capabilities {
        self.config.capabilities()
    }

    pub fn policy(&self) -> &DiscountPolicy {
        &self.config.checkout
    }

    /// The shop's wall-clock offset. Validated at config load.
    pub fn offset(&self) -> ApiResult<FixedOffset> {
        self.config
            .store_offset()
            .ok_or_else(|| ApiError::internal("Store UTC offset out of range"))
    }

    /// Today on the shop's wall clock.
    pub fn today(&self) -> ApiResult<NaiveDate> {
        Ok(local_date(Utc::now(), self.offset()?))
    }

    /// Admin table page, 1-based. Missing means the first page.
    pub fn page_request(&self, page: Option<u32>) -> ApiResult<PageRequest> {
        Ok(PageRequest::new(page.unwrap_or(1), self.config.catalog.page_size)?)
    }

    /// Publishes an auth event. Having no subscribers is fine.
    pub fn publish(&self, event: AuthEvent) {
        if self.events.send(event).is_err() {
            trace!("No auth event subscribers");
        }
    }
}
