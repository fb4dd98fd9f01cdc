//! # Product Repository
//!
//! Database operations for products.
//!
//! ## Key Operations
//! - Active menu for the point of sale (ordered by name)
//! - Paged listing for the admin panel
//! - Create, single-cell updates
//!
//! Products are never deleted; `active = 'no'` hides them from the menu
//! while old sales keep resolving their name.

use rose_core::edit::FieldUpdate;
use rose_core::pagination::{Page, PageRequest};
use rose_core::{ActiveFlag, CatalogTable, Product, DEFAULT_PRODUCT_STOCK};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::apply_field_update;

const PRODUCT_COLUMNS: &str =
    "id, name, price, stock, has_toppings, first_topping_discounted, active";

/// Fields supplied when creating a product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub name: String,
    pub price: i64,
    pub has_toppings: bool,
    pub first_topping_discounted: bool,
}

impl NewProduct {
    /// A product as created from the admin panel: toppings allowed, no offer.
    pub fn new(name: impl Into<String>, price: i64) -> Self {
        NewProduct {
            name: name.into(),
            price,
            has_toppings: true,
            first_topping_discounted: false,
        }
    }

    pub fn without_toppings(mut self) -> Self {
        self.has_toppings = false;
        self
    }

    pub fn with_first_topping_discounted(mut self) -> Self {
        self.first_topping_discounted = true;
        self
    }

    pub fn with_flags(mut self, flags: ProductFlags) -> Self {
        self.has_toppings = flags.has_toppings;
        self.first_topping_discounted = flags.first_topping_discounted;
        self
    }
}

/// The two topping switches an operator picks when adding a product.
///
/// Defaults to toppings allowed and no first-topping offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductFlags {
    pub has_toppings: bool,
    pub first_topping_discounted: bool,
}

impl Default for ProductFlags {
    fn default() -> Self {
        ProductFlags {
            has_toppings: true,
            first_topping_discounted: false,
        }
    }
}

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
/// let menu = repo.list_active().await?;
/// let product = repo.get_by_id(3).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Products on sale, ordered by name.
    pub async fn list_active(&self) -> DbResult<Vec<Product>> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE active = ?1 ORDER BY name, id"
        );
        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(ActiveFlag::Si)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = products.len(), "Listed active products");
        Ok(products)
    }

    /// Gets a product by its ID, active or not.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1");
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// One page of all products (active and inactive), ordered by name.
    pub async fn list_page(&self, request: PageRequest) -> DbResult<Page<Product>> {
        let total = self.count().await?;

        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY name, id LIMIT ?1 OFFSET ?2"
        );
        let items = sqlx::query_as::<_, Product>(&sql)
            .bind(request.limit() as i64)
            .bind(request.offset() as i64)
            .fetch_all(&self.pool)
            .await?;

        debug!(page = request.page(), rows = items.len(), total, "Listed product page");
        Ok(Page::new(items, request, total as u64))
    }

    /// Inserts a product with the default stock, active.
    pub async fn insert(&self, product: &NewProduct) -> DbResult<Product> {
        debug!(name = %product.name, price = product.price, "Inserting product");

        let sql = format!(
            "INSERT INTO products (name, price, stock, has_toppings, first_topping_discounted, active) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6) \
             RETURNING {PRODUCT_COLUMNS}"
        );
        let inserted = sqlx::query_as::<_, Product>(&sql)
            .bind(&product.name)
            .bind(product.price)
            .bind(DEFAULT_PRODUCT_STOCK)
            .bind(product.has_toppings)
            .bind(product.first_topping_discounted)
            .bind(ActiveFlag::Si)
            .fetch_one(&self.pool)
            .await?;

        Ok(inserted)
    }

    /// Writes a single column.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - no product with that id
    pub async fn apply_update(&self, id: i64, update: &FieldUpdate) -> DbResult<()> {
        apply_field_update(&self.pool, CatalogTable::Products, id, update).await
    }

    /// Sets both topping flags at once.
    pub async fn set_topping_flags(
        &self,
        id: i64,
        has_toppings: bool,
        first_topping_discounted: bool,
    ) -> DbResult<()> {
        debug!(id, has_toppings, first_topping_discounted, "Updating topping flags");

        let result = sqlx::query(
            "UPDATE products SET has_toppings = ?2, first_topping_discounted = ?3 WHERE id = ?1",
        )
        .bind(id)
        .bind(has_toppings)
        .bind(first_topping_discounted)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }
        Ok(())
    }

    /// Counts all products, active or not.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
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

    async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_insert_uses_defaults() {
        let db = db().await;
        let product = db
            .products()
            .insert(&NewProduct::new("Fresas con crema", 5000))
            .await
            .unwrap();

        assert!(product.id > 0);
        assert_eq!(product.stock, DEFAULT_PRODUCT_STOCK);
        assert_eq!(product.active, ActiveFlag::Si);
        assert!(product.has_toppings);
        assert!(!product.first_topping_discounted);

        let fetched = db.products().get_by_id(product.id).await.unwrap().unwrap();
        assert_eq!(fetched, product);
        assert!(db.products().get_by_id(9999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_active_hides_inactive_and_sorts_by_name() {
        let db = db().await;
        let repo = db.products();
        repo.insert(&NewProduct::new("Waffles", 9000)).await.unwrap();
        let hidden = repo.insert(&NewProduct::new("Brownie", 6000)).await.unwrap();
        repo.insert(&NewProduct::new("Malteadas", 12000)).await.unwrap();

        repo.apply_update(hidden.id, &FieldUpdate::Active(ActiveFlag::No))
            .await
            .unwrap();

        let names: Vec<String> = repo
            .list_active()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["Malteadas", "Waffles"]);
    }

    #[tokio::test]
    async fn test_second_page_of_fifteen() {
        let db = db().await;
        let repo = db.products();
        for i in 0..15 {
            repo.insert(&NewProduct::new(format!("Producto {:02}", i), 1000 + i))
                .await
                .unwrap();
        }

        let page = repo.list_page(PageRequest::new(2, 10).unwrap()).await.unwrap();
        assert_eq!(page.items.len(), 5);
        assert_eq!(page.total, 15);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.items[0].name, "Producto 10");
        assert!(!page.has_next());
    }

    #[tokio::test]
    async fn test_cell_updates() {
        let db = db().await;
        let repo = db.products();
        let p = repo.insert(&NewProduct::new("Fresas", 5000)).await.unwrap();

        repo.apply_update(p.id, &FieldUpdate::Price(5500)).await.unwrap();
        repo.apply_update(p.id, &FieldUpdate::Name("Fresas con crema".into()))
            .await
            .unwrap();
        repo.apply_update(p.id, &FieldUpdate::FirstToppingDiscounted(true))
            .await
            .unwrap();

        let p = repo.get_by_id(p.id).await.unwrap().unwrap();
        assert_eq!(p.price, 5500);
        assert_eq!(p.name, "Fresas con crema");
        assert!(p.first_topping_discounted);

        let err = repo.apply_update(404, &FieldUpdate::Price(1)).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_negative_price_rejected_by_schema() {
        let db = db().await;
        let repo = db.products();
        let p = repo.insert(&NewProduct::new("Fresas", 5000)).await.unwrap();

        let err = repo.apply_update(p.id, &FieldUpdate::Price(-1)).await.unwrap_err();
        assert!(matches!(err, DbError::CheckViolation { .. }));
    }

    #[tokio::test]
    async fn test_set_topping_flags() {
        let db = db().await;
        let repo = db.products();
        let p = repo
            .insert(&NewProduct::new("Malteadas", 12000).with_first_topping_discounted())
            .await
            .unwrap();
        assert!(p.first_topping_discounted);

        repo.set_topping_flags(p.id, false, false).await.unwrap();
        let p = repo.get_by_id(p.id).await.unwrap().unwrap();
        assert!(!p.has_toppings);
        assert!(!p.first_topping_discounted);
    }
}
