//! # Catalog Repository
//!
//! The admin panel addresses both catalog tables the same way: list a
//! page, edit a cell, flip the active flag, add a row. This repository
//! takes the table as a value and dispatches to the typed repositories.
//!
//! ```text
//! /api/admin/{table}/...  ──► CatalogTable ──┬──► ProductRepository
//!                                            └──► ToppingRepository
//! ```

use rose_core::edit::FieldUpdate;
use rose_core::pagination::{Page, PageRequest};
use rose_core::{CatalogItem, CatalogTable};
use sqlx::SqlitePool;

use crate::error::{DbError, DbResult};
use crate::repository::product::{NewProduct, ProductFlags, ProductRepository};
use crate::repository::topping::{NewTopping, ToppingRepository};

#[derive(Debug, Clone)]
pub struct CatalogRepository {
    products: ProductRepository,
    toppings: ToppingRepository,
}

impl CatalogRepository {
    pub fn new(pool: SqlitePool) -> Self {
        CatalogRepository {
            products: ProductRepository::new(pool.clone()),
            toppings: ToppingRepository::new(pool),
        }
    }

    /// One page of rows, active and inactive, ordered by name.
    pub async fn list_page(&self, table: CatalogTable, request: PageRequest) -> DbResult<Page<CatalogItem>> {
        Ok(match table {
            CatalogTable::Products => self.products.list_page(request).await?.map(CatalogItem::Product),
            CatalogTable::Toppings => self.toppings.list_page(request).await?.map(CatalogItem::Topping),
        })
    }

    /// Fetches one row.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - no row with that id in `table`
    pub async fn get(&self, table: CatalogTable, id: i64) -> DbResult<CatalogItem> {
        let item = match table {
            CatalogTable::Products => self.products.get_by_id(id).await?.map(CatalogItem::Product),
            CatalogTable::Toppings => self.toppings.get_by_id(id).await?.map(CatalogItem::Topping),
        };
        item.ok_or_else(|| DbError::not_found(table.entity(), id))
    }

    /// Writes one cell and returns the row as stored afterwards.
    pub async fn apply_update(&self, table: CatalogTable, id: i64, update: &FieldUpdate) -> DbResult<CatalogItem> {
        match table {
            CatalogTable::Products => self.products.apply_update(id, update).await?,
            CatalogTable::Toppings => self.toppings.apply_update(id, update).await?,
        }
        self.get(table, id).await
    }

    /// Adds an active row with the given name and price.
    ///
    /// `flags` only apply to products; toppings have no such columns.
    pub async fn create(
        &self,
        table: CatalogTable,
        name: &str,
        price: i64,
        flags: ProductFlags,
    ) -> DbResult<CatalogItem> {
        Ok(match table {
            CatalogTable::Products => {
                let product = NewProduct::new(name, price).with_flags(flags);
                CatalogItem::Product(self.products.insert(&product).await?)
            }
            CatalogTable::Toppings => {
                CatalogItem::Topping(self.toppings.insert(&NewTopping::new(name, price)).await?)
            }
        })
    }
}
