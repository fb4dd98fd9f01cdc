//! # rose-db: Database Layer for ROSE POS
//!
//! SQLite storage for the catalog, sales and admin accounts, via sqlx.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        ROSE POS Data Flow                               │
//! │                                                                         │
//! │  HTTP handler (POST /api/pos/sales)                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐    │
//! │  │                     rose-db (THIS CRATE)                        │    │
//! │  │                                                                 │    │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐    │    │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │    │    │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │    │    │
//! │  │   │               │    │ ProductRepo   │    │              │    │    │
//! │  │   │ SqlitePool    │◄───│ ToppingRepo   │    │ 001_init.sql │    │    │
//! │  │   │               │    │ CatalogRepo   │    │              │    │    │
//! │  │   │               │    │ SaleRepo      │    │              │    │    │
//! │  │   │               │    │ AdminRepo     │    │              │    │    │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘    │    │
//! │  └─────────────────────────────────────────────────────────────────┘    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite file (rose.db)                                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use rose_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("rose.db")).await?;
//! let menu = db.products().list_active().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::admin::{hash_password, verify_password, AdminRepository, AdminSession, AdminUser};
pub use repository::catalog::CatalogRepository;
pub use repository::product::{NewProduct, ProductFlags, ProductRepository};
pub use repository::sale::SaleRepository;
pub use repository::topping::{NewTopping, ToppingRepository};
