//! # Domain Types
//!
//! Core domain types shared by the database layer and the HTTP API.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────────┐        ┌─────────────────────┐                │
//! │  │      Product        │        │      Topping        │                │
//! │  │  ─────────────────  │        │  ─────────────────  │                │
//! │  │  id                 │        │  id                 │                │
//! │  │  name, price        │        │  name, price        │                │
//! │  │  stock              │        │  active (si / no)   │                │
//! │  │  has_toppings       │        └──────────┬──────────┘                │
//! │  │  first_topping_...  │                   │                            │
//! │  │  active (si / no)   │                   │ price snapshot             │
//! │  └──────────┬──────────┘                   │                            │
//! │             │ product_id                   │                            │
//! │  ┌──────────▼──────────┐        ┌──────────▼──────────┐                │
//! │  │        Sale         │ 1 ── * │   SaleToppingLine   │                │
//! │  │  total              │        │  topping_id         │                │
//! │  │  payment_method     │        │  price_at_sale      │                │
//! │  │  created_at (UTC)   │        └─────────────────────┘                │
//! │  └─────────────────────┘                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## The "si" / "no" flag
//! Catalog rows are never deleted, because sales keep pointing at them.
//! The active marker is stored as the text `si` / `no` rather than a
//! boolean; [`ActiveFlag`] keeps that encoding at the boundary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Active Flag
// =============================================================================

/// Soft-delete marker for catalog rows, stored as `"si"` / `"no"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum ActiveFlag {
    /// Shown on the point-of-sale menu.
    Si,
    /// Hidden from sale, kept for history.
    No,
}

impl ActiveFlag {
    #[inline]
    pub fn is_active(&self) -> bool {
        matches!(self, ActiveFlag::Si)
    }

    /// The value a toggle writes: `si` → `no`, anything else → `si`.
    pub fn toggled(&self) -> Self {
        match self {
            ActiveFlag::Si => ActiveFlag::No,
            ActiveFlag::No => ActiveFlag::Si,
        }
    }

    /// Verb used in the confirmation prompt for toggling this state.
    pub fn toggle_verb(&self) -> &'static str {
        match self {
            ActiveFlag::Si => "desactivar",
            ActiveFlag::No => "activar",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActiveFlag::Si => "si",
            ActiveFlag::No => "no",
        }
    }
}

impl Default for ActiveFlag {
    fn default() -> Self {
        ActiveFlag::Si
    }
}

impl From<bool> for ActiveFlag {
    fn from(active: bool) -> Self {
        if active {
            ActiveFlag::Si
        } else {
            ActiveFlag::No
        }
    }
}

impl fmt::Display for ActiveFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Payment Method
// =============================================================================

/// How the customer paid. Stored as the literal tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[ts(export)]
pub enum PaymentMethod {
    /// Cash at the counter. Also what a missing value means.
    Efectivo,
    /// Bank / wallet transfer.
    Transferencia,
}

impl Default for PaymentMethod {
    fn default() -> Self {
        PaymentMethod::Efectivo
    }
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Efectivo => "Efectivo",
            PaymentMethod::Transferencia => "Transferencia",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Catalog Table
// =============================================================================

/// The two tables the admin panel manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum CatalogTable {
    Products,
    Toppings,
}

impl CatalogTable {
    /// SQL table backing this catalog.
    pub fn table_name(&self) -> &'static str {
        match self {
            CatalogTable::Products => "products",
            CatalogTable::Toppings => "toppings",
        }
    }

    /// Entity name used in error messages.
    pub fn entity(&self) -> &'static str {
        match self {
            CatalogTable::Products => "Product",
            CatalogTable::Toppings => "Topping",
        }
    }
}

impl FromStr for CatalogTable {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "products" | "productos" => Ok(CatalogTable::Products),
            "toppings" => Ok(CatalogTable::Toppings),
            _ => Err(ValidationError::NotAllowed {
                field: "table".to_string(),
                allowed: vec!["products".to_string(), "toppings".to_string()],
            }),
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// A menu item (malteada, fresas con crema, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    pub id: i64,

    /// Display name on the menu button.
    pub name: String,

    /// Unit price in whole currency units.
    pub price: i64,

    /// Informational stock level (not decremented by sales).
    pub stock: i64,

    /// Whether the topping picker applies to this product.
    pub has_toppings: bool,

    /// "First topping free": the most expensive eligible topping is waived.
    pub first_topping_discounted: bool,

    pub active: ActiveFlag,
}

impl Product {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_units(self.price)
    }
}

// =============================================================================
// Topping
// =============================================================================

/// An add-on that can be attached to a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Topping {
    pub id: i64,
    pub name: String,
    pub price: i64,
    pub active: ActiveFlag,
}

impl Topping {
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_units(self.price)
    }
}

/// A row from either catalog table, as listed in the admin panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(untagged)]
#[ts(export)]
pub enum CatalogItem {
    Product(Product),
    Topping(Topping),
}

impl CatalogItem {
    pub fn id(&self) -> i64 {
        match self {
            CatalogItem::Product(p) => p.id,
            CatalogItem::Topping(t) => t.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            CatalogItem::Product(p) => &p.name,
            CatalogItem::Topping(t) => &t.name,
        }
    }

    pub fn active(&self) -> ActiveFlag {
        match self {
            CatalogItem::Product(p) => p.active,
            CatalogItem::Topping(t) => t.active,
        }
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A recorded sale: one product plus its toppings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Sale {
    pub id: i64,
    pub product_id: i64,

    /// price + Σ topping prices − discount, computed at insert time.
    pub total: i64,

    pub payment_method: PaymentMethod,

    /// Server-assigned creation time.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Sale {
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_units(self.total)
    }
}

/// A topping attached to a sale, with the price it had when sold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SaleToppingLine {
    pub id: i64,
    pub sale_id: i64,
    pub topping_id: i64,

    /// Snapshot; later catalog price edits never touch it.
    pub price_at_sale: i64,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_flag_toggle_round_trips() {
        assert_eq!(ActiveFlag::Si.toggled(), ActiveFlag::No);
        assert_eq!(ActiveFlag::No.toggled(), ActiveFlag::Si);
        assert_eq!(ActiveFlag::Si.toggled().toggled(), ActiveFlag::Si);
    }

    #[test]
    fn test_active_flag_wire_format() {
        assert_eq!(serde_json::to_string(&ActiveFlag::Si).unwrap(), "\"si\"");
        let parsed: ActiveFlag = serde_json::from_str("\"no\"").unwrap();
        assert_eq!(parsed, ActiveFlag::No);
        assert_eq!(ActiveFlag::Si.toggle_verb(), "desactivar");
        assert_eq!(ActiveFlag::No.toggle_verb(), "activar");
    }

    #[test]
    fn test_payment_method_tags() {
        assert_eq!(
            serde_json::to_string(&PaymentMethod::Transferencia).unwrap(),
            "\"Transferencia\""
        );
        assert_eq!(PaymentMethod::default(), PaymentMethod::Efectivo);
    }

    #[test]
    fn test_catalog_table_parsing() {
        assert_eq!("products".parse::<CatalogTable>().unwrap(), CatalogTable::Products);
        assert_eq!("productos".parse::<CatalogTable>().unwrap(), CatalogTable::Products);
        assert_eq!("Toppings".parse::<CatalogTable>().unwrap(), CatalogTable::Toppings);
        assert!("ventas".parse::<CatalogTable>().is_err());
        assert_eq!(CatalogTable::Toppings.table_name(), "toppings");
    }

    #[test]
    fn test_catalog_item_serializes_flat() {
        let item = CatalogItem::Topping(Topping {
            id: 3,
            name: "Fresas".to_string(),
            price: 1000,
            active: ActiveFlag::Si,
        });
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["name"], "Fresas");
        assert_eq!(json["active"], "si");
        assert_eq!(item.id(), 3);
    }
}
