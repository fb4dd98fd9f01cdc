//! # rose-core: Pure Business Logic for ROSE POS
//!
//! Every rule the shop runs on lives here as a pure function: the checkout
//! discount, the admin cell-edit decision, the daily report and the text
//! that gets shared from it. Nothing in this crate touches a database, the
//! network or the clock.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         ROSE POS Architecture                           │
//! │                                                                         │
//! │  ┌──────────────────────┐            ┌──────────────────────┐          │
//! │  │   Mobile surface     │            │   Browser surface    │          │
//! │  │  POS ── Reporting    │            │ Admin ── Reporting   │          │
//! │  └──────────┬───────────┘            └──────────┬───────────┘          │
//! │             │            HTTP / JSON            │                       │
//! │  ┌──────────▼───────────────────────────────────▼───────────────────┐  │
//! │  │                    rose-server (axum routes)                      │  │
//! │  └─────────────────────────────┬─────────────────────────────────────┘  │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ rose-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │  ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌───────┐ │   │
//! │  │  │ checkout │ │   edit   │ │  report  │ │  share   │ │surface│ │   │
//! │  │  │ discount │ │  cells   │ │ topping  │ │ whatsapp │ │ caps  │ │   │
//! │  │  │  quote   │ │  toggle  │ │  usage   │ │   link   │ │       │ │   │
//! │  │  └──────────┘ └──────────┘ └──────────┘ └──────────┘ └───────┘ │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    rose-db (Database Layer)                     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Topping, Sale, flags)
//! - [`money`] - Whole-peso money type with es-CO display
//! - [`checkout`] - Topping selection and the "first topping free" rule
//! - [`edit`] - Admin cell edits and the active toggle
//! - [`pagination`] - Offset windows for the admin tables
//! - [`report`] - Daily windows and topping usage aggregation
//! - [`share`] - The WhatsApp report message and link
//! - [`surface`] - Which screens each operating surface exposes
//! - [`validation`] - Input rules for admin forms
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use rose_core::checkout::{quote, DiscountPolicy};
//! use rose_core::{ActiveFlag, Money, Product, Topping};
//!
//! let product = Product {
//!     id: 1,
//!     name: "Fresas con crema".to_string(),
//!     price: 5000,
//!     stock: 100,
//!     has_toppings: true,
//!     first_topping_discounted: true,
//!     active: ActiveFlag::Si,
//! };
//! let toppings = vec![
//!     Topping { id: 1, name: "Fresas".to_string(), price: 1000, active: ActiveFlag::Si },
//!     Topping { id: 2, name: "Helado".to_string(), price: 800, active: ActiveFlag::Si },
//! ];
//!
//! let q = quote(&product, &toppings, &DiscountPolicy::default());
//! assert_eq!(q.discount, Money::from_units(1000));
//! assert_eq!(q.total, Money::from_units(5800));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod checkout;
pub mod edit;
pub mod error;
pub mod money;
pub mod pagination;
pub mod report;
pub mod share;
pub mod surface;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Rows per page in the admin catalog tables.
pub const ITEMS_PER_PAGE: u32 = 10;

/// Stock assigned to a product created from the admin panel.
///
/// ## Business Reason
/// Sales never decrement stock; the value is informational only and the
/// shop starts every new menu item at the same level.
pub const DEFAULT_PRODUCT_STOCK: i64 = 100;

/// Product name shown when a sale's product can no longer be resolved.
pub const MISSING_PRODUCT_NAME: &str = "Producto no encontrado";
