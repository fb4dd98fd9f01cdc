//! # Topping Repository
//!
//! Database operations for toppings.

use rose_core::edit::FieldUpdate;
use rose_core::pagination::{Page, PageRequest};
use rose_core::{ActiveFlag, CatalogTable, Topping};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use std::collections::HashMap;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::apply_field_update;

const TOPPING_COLUMNS: &str = "id, name, price, active";

/// Fields supplied when creating a topping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTopping {
    pub name: String,
    pub price: i64,
}

impl NewTopping {
    pub fn new(name: impl Into<String>, price: i64) -> Self {
        NewTopping {
            name: name.into(),
            price,
        }
    }
}

/// Repository for topping database operations.
#[derive(Debug, Clone)]
pub struct ToppingRepository {
    pool: SqlitePool,
}

impl ToppingRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ToppingRepository { pool }
    }

    /// Toppings on sale, ordered by name.
    pub async fn list_active(&self) -> DbResult<Vec<Topping>> {
        let sql = format!(
            "SELECT {TOPPING_COLUMNS} FROM toppings WHERE active = ?1 ORDER BY name, id"
        );
        let toppings = sqlx::query_as::<_, Topping>(&sql)
            .bind(ActiveFlag::Si)
            .fetch_all(&self.pool)
            .await?;

        Ok(toppings)
    }

    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Topping>> {
        let sql = format!("SELECT {TOPPING_COLUMNS} FROM toppings WHERE id = ?1");
        let topping = sqlx::query_as::<_, Topping>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(topping)
    }

    /// Resolves a selection, keeping the order of `ids`.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - first id that does not exist
    pub async fn get_many(&self, ids: &[i64]) -> DbResult<Vec<Topping>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {TOPPING_COLUMNS} FROM toppings WHERE id IN ("));
        let mut separated = builder.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");

        let rows = builder
            .build_query_as::<Topping>()
            .fetch_all(&self.pool)
            .await?;

        let by_id: HashMap<i64, Topping> = rows.into_iter().map(|t| (t.id, t)).collect();
        ids.iter()
            .map(|id| {
                by_id
                    .get(id)
                    .cloned()
                    .ok_or_else(|| DbError::not_found("Topping", id))
            })
            .collect()
    }

    /// One page of all toppings, ordered by name.
    pub async fn list_page(&self, request: PageRequest) -> DbResult<Page<Topping>> {
        let total = self.count().await?;

        let sql = format!(
            "SELECT {TOPPING_COLUMNS} FROM toppings ORDER BY name, id LIMIT ?1 OFFSET ?2"
        );
        let items = sqlx::query_as::<_, Topping>(&sql)
            .bind(request.limit() as i64)
            .bind(request.offset() as i64)
            .fetch_all(&self.pool)
            .await?;

        debug!(page = request.page(), rows = items.len(), total, "Listed topping page");
        Ok(Page::new(items, request, total as u64))
    }

    /// Inserts an active topping.
    pub async fn insert(&self, topping: &NewTopping) -> DbResult<Topping> {
        debug!(name = %topping.name, price = topping.price, "Inserting topping");

        let sql = format!(
            "INSERT INTO toppings (name, price, active) VALUES (?1, ?2, ?3) \
             RETURNING {TOPPING_COLUMNS}"
        );
        let inserted = sqlx::query_as::<_, Topping>(&sql)
            .bind(&topping.name)
            .bind(topping.price)
            .bind(ActiveFlag::Si)
            .fetch_one(&self.pool)
            .await?;

        Ok(inserted)
    }

    pub async fn apply_update(&self, id: i64, update: &FieldUpdate) -> DbResult<()> {
        apply_field_update(&self.pool, CatalogTable::Toppings, id, update).await
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM toppings")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn seeded() -> (Database, Vec<Topping>) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mut toppings = Vec::new();
        for (name, price) in [("Helado", 2000), ("Fresas", 1500), ("Oreo", 800)] {
            toppings.push(db.toppings().insert(&NewTopping::new(name, price)).await.unwrap());
        }
        (db, toppings)
    }

    #[tokio::test]
    async fn test_get_many_keeps_selection_order() {
        let (db, t) = seeded().await;
        let ids = vec![t[2].id, t[0].id];
        let resolved = db.toppings().get_many(&ids).await.unwrap();
        let names: Vec<&str> = resolved.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Oreo", "Helado"]);

        assert!(db.toppings().get_many(&[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_many_reports_missing_id() {
        let (db, t) = seeded().await;
        let err = db.toppings().get_many(&[t[0].id, 777]).await.unwrap_err();
        assert_eq!(err.to_string(), "Topping not found: 777");
    }

    #[tokio::test]
    async fn test_list_active_and_toggle() {
        let (db, t) = seeded().await;
        db.toppings()
            .apply_update(t[1].id, &FieldUpdate::Active(ActiveFlag::No))
            .await
            .unwrap();

        let active: Vec<String> = db
            .toppings()
            .list_active()
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(active, vec!["Helado", "Oreo"]);

        let page = db.toppings().list_page(PageRequest::first()).await.unwrap();
        assert_eq!(page.total, 3);
        assert_eq!(page.items.len(), 3);
    }

    #[tokio::test]
    async fn test_topping_rejects_product_flags() {
        let (db, t) = seeded().await;
        let err = db
            .toppings()
            .apply_update(t[0].id, &FieldUpdate::HasToppings(false))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::QueryFailed(_)));
    }
}
