//! # Catalog Edits
//!
//! Decisions behind the admin table: when an inline cell edit turns into a
//! write, which column it writes, and the confirmed active toggle.
//!
//! ## Cell Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   seed(id, source) ──► text = source                                    │
//! │         │                                                               │
//! │         ▼                                                               │
//! │   operator types ──► text = "12500"                                     │
//! │         │                                                               │
//! │         ├── row refreshed (id or source changed) ──► reconcile: re-seed │
//! │         │                                                               │
//! │         ▼                                                               │
//! │   focus lost ──► commit()                                               │
//! │                    ├── unchanged / unparsable ──► None (no write)       │
//! │                    └── changed ──────────────────► Some(FieldUpdate)    │
//! │                                                                         │
//! │   Writes are last-write-wins, one column per update.                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::types::{ActiveFlag, CatalogTable};
use crate::validation::parse_leading_int;

// =============================================================================
// Fields
// =============================================================================

/// Text cells editable inline in either catalog table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum EditableField {
    Name,
    Price,
}

/// A single-column write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldUpdate {
    Name(String),
    Price(i64),
    HasToppings(bool),
    FirstToppingDiscounted(bool),
    Active(ActiveFlag),
}

impl FieldUpdate {
    /// Column written by this update.
    pub fn column(&self) -> &'static str {
        match self {
            FieldUpdate::Name(_) => "name",
            FieldUpdate::Price(_) => "price",
            FieldUpdate::HasToppings(_) => "has_toppings",
            FieldUpdate::FirstToppingDiscounted(_) => "first_topping_discounted",
            FieldUpdate::Active(_) => "active",
        }
    }

    /// Toppings have no topping-related flags.
    pub fn applies_to(&self, table: CatalogTable) -> bool {
        match self {
            FieldUpdate::HasToppings(_) | FieldUpdate::FirstToppingDiscounted(_) => {
                table == CatalogTable::Products
            }
            _ => true,
        }
    }
}

// =============================================================================
// Editable Cell
// =============================================================================

/// Local text state of one inline cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditableCell {
    id: i64,
    field: EditableField,
    source: String,
    text: String,
}

impl EditableCell {
    /// Seeds the cell from the authoritative value.
    pub fn new(id: i64, field: EditableField, source: impl Into<String>) -> Self {
        let source = source.into();
        EditableCell {
            id,
            field,
            text: source.clone(),
            source,
        }
    }

    /// Replaces the local text (operator typing).
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Points the cell at a possibly refreshed row.
    ///
    /// When the id or the authoritative value changed, the local text is
    /// discarded and re-seeded. Returns whether a re-seed happened.
    pub fn reconcile(&mut self, id: i64, source: &str) -> bool {
        if self.id == id && self.source == source {
            return false;
        }
        self.id = id;
        self.source = source.to_string();
        self.text = self.source.clone();
        true
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Decides what to write when the cell loses focus.
    ///
    /// - price: leading-integer parse; unparsable, negative or equal to the
    ///   source value means no write
    /// - name: written as typed when non-blank and different from the source
    pub fn commit(&self) -> Option<FieldUpdate> {
        match self.field {
            EditableField::Price => {
                let new_price = parse_leading_int(&self.text).filter(|p| *p >= 0)?;
                if parse_leading_int(&self.source) == Some(new_price) {
                    return None;
                }
                Some(FieldUpdate::Price(new_price))
            }
            EditableField::Name => {
                if self.text.trim().is_empty() || self.text == self.source {
                    return None;
                }
                Some(FieldUpdate::Name(self.text.clone()))
            }
        }
    }
}

// =============================================================================
// Active Toggle
// =============================================================================

/// The prompt shown before flipping an item's active flag.
///
/// ```rust
/// use rose_core::edit::toggle_prompt;
/// use rose_core::ActiveFlag;
/// assert_eq!(
///     toggle_prompt("Fresas", ActiveFlag::Si),
///     "¿Estás seguro de que deseas desactivar \"Fresas\"?"
/// );
/// ```
pub fn toggle_prompt(name: &str, current: ActiveFlag) -> String {
    format!(
        "¿Estás seguro de que deseas {} \"{}\"?",
        current.toggle_verb(),
        name
    )
}

/// Resolves a toggle request into the flag to write.
///
/// `current` is the state the operator saw, so replaying the same request
/// writes the same value.
pub fn confirm_toggle(name: &str, current: ActiveFlag, confirmed: bool) -> CoreResult<FieldUpdate> {
    if !confirmed {
        return Err(CoreError::ConfirmationRequired {
            prompt: toggle_prompt(name, current),
        });
    }
    Ok(FieldUpdate::Active(current.toggled()))
}

// =============================================================================
// Unit Tests
// =============================================================================
