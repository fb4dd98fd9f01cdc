//! # Repository Module
//!
//! Database repository implementations for ROSE POS.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repositories                                         │
//! │                                                                         │
//! │  HTTP handler                                                           │
//! │       │                                                                 │
//! │       │  db.catalog().list_page(CatalogTable::Toppings, page)           │
//! │       ▼                                                                 │
//! │  CatalogRepository ──┬──► ProductRepository                             │
//! │                      └──► ToppingRepository                             │
//! │                                                                         │
//! │  SaleRepository    ← sale + topping lines, day listing, void            │
//! │  AdminRepository   ← admin accounts, sessions, password hashes          │
//! │       │                                                                 │
//! │       │  SQL                                                            │
//! │       ▼                                                                 │
//! │  SQLite Database                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ProductRepository`](product::ProductRepository) - Products, menu listing
//! - [`ToppingRepository`](topping::ToppingRepository) - Toppings, selection lookup
//! - [`CatalogRepository`](catalog::CatalogRepository) - Either table by name (admin panel)
//! - [`SaleRepository`](sale::SaleRepository) - Sales and topping lines
//! - [`AdminRepository`](admin::AdminRepository) - Admin accounts and sessions

pub mod admin;
pub mod catalog;
pub mod product;
pub mod sale;
pub mod topping;

use chrono::{DateTime, Utc};
use rose_core::edit::FieldUpdate;
use rose_core::CatalogTable;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};

/// Text form of a timestamp as stored in SQLite.
///
/// Matches `strftime('%Y-%m-%dT%H:%M:%fZ')`, so stored and bound values
/// compare correctly as text.
pub(crate) fn to_db_timestamp(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

/// Writes one column of one catalog row.
///
/// The column name comes from [`FieldUpdate::column`], never from input.
pub(crate) async fn apply_field_update(
    pool: &SqlitePool,
    table: CatalogTable,
    id: i64,
    update: &FieldUpdate,
) -> DbResult<()> {
    if !update.applies_to(table) {
        return Err(DbError::QueryFailed(format!(
            "column {} does not exist on {}",
            update.column(),
            table.table_name()
        )));
    }

    debug!(table = table.table_name(), id, column = update.column(), "Updating catalog cell");

    let sql = format!(
        "UPDATE {} SET {} = ?1 WHERE id = ?2",
        table.table_name(),
        update.column()
    );
    let query = sqlx::query(&sql);
    let query = match update {
        FieldUpdate::Name(name) => query.bind(name.as_str()),
        FieldUpdate::Price(price) => query.bind(*price),
        FieldUpdate::HasToppings(flag) | FieldUpdate::FirstToppingDiscounted(flag) => {
            query.bind(*flag)
        }
        FieldUpdate::Active(active) => query.bind(*active),
    };

    let result = query.bind(id).execute(pool).await?;
    if result.rows_affected() == 0 {
        return Err(DbError::not_found(table.entity(), id));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_timestamp_text_is_fixed_width() {
        let at = Utc.with_ymd_and_hms(2026, 10, 19, 5, 0, 0).unwrap();
        assert_eq!(to_db_timestamp(&at), "2026-10-19T05:00:00.000Z");
    }
}
