//! # Error Types
//!
//! Domain-specific error types for rose-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  rose-core errors (this file)                                          │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  rose-db errors (separate crate)                                       │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  rose-server errors                                                    │
//! │  └── ApiError         - What the mobile / browser client sees          │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → alert on the client    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Messages the staff actually read on screen ("Faltan datos", "No hay
//! ventas para reportar.") are in Spanish; diagnostic messages are not.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product id does not exist.
    #[error("Product not found: {0}")]
    ProductNotFound(i64),

    /// Topping id does not exist.
    #[error("Topping not found: {0}")]
    ToppingNotFound(i64),

    /// Sale id does not exist (already voided or never recorded).
    #[error("Sale not found: {0}")]
    SaleNotFound(i64),

    /// Product exists but is deactivated.
    ///
    /// ## When This Occurs
    /// - The menu on a device is stale and still shows a product an admin
    ///   deactivated in the meantime
    #[error("Product '{name}' is not active")]
    ProductInactive { name: String },

    /// Topping exists but is deactivated.
    #[error("Topping '{name}' is not active")]
    ToppingInactive { name: String },

    /// The product does not take toppings at all.
    #[error("Product '{product}' does not take toppings")]
    ToppingsNotAllowed { product: String },

    /// The topping is hidden for this product (e.g. "Helado" on "Malteadas").
    #[error("Topping '{topping}' is not offered for '{product}'")]
    ToppingNotOffered { product: String, topping: String },

    /// A destructive or state-flipping action was sent without the user
    /// having confirmed the prompt.
    ///
    /// ## User Workflow
    /// ```text
    /// Tap ✓ on "Fresas"
    ///      │
    ///      ▼
    /// POST toggle-active { confirmed: false }
    ///      │
    ///      ▼
    /// ConfirmationRequired { prompt: "¿Estás seguro de que deseas desactivar \"Fresas\"?" }
    ///      │
    ///      ▼
    /// Client shows prompt ──► user accepts ──► POST { confirmed: true }
    /// ```
    #[error("{prompt}")]
    ConfirmationRequired { prompt: String },

    /// Required creation fields were left empty.
    #[error("Faltan datos")]
    MissingData,

    /// Share was requested for a day without sales.
    #[error("No hay ventas para reportar.")]
    NothingToReport,

    /// The requested report day cannot be turned into a UTC window.
    #[error("Fecha fuera de rango: {0}")]
    DateOutOfRange(chrono::NaiveDate),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Invalid format (e.g. a price that isn't a number, a bad date).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;
