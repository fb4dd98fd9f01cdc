//! # Sale Repository
//!
//! Database operations for sales and their topping lines.
//!
//! ## Sale Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Sale Lifecycle                                    │
//! │                                                                         │
//! │  1. RECORD (one transaction)                                            │
//! │     └── INSERT sales ... RETURNING id                                   │
//! │     └── INSERT sale_toppings (one row per topping, price snapshot)      │
//! │     └── COMMIT  (a failed line rolls the sale back)                     │
//! │                                                                         │
//! │  2. LIST                                                                │
//! │     └── sales in a day window, newest first                             │
//! │     └── product name via LEFT JOIN (missing → fallback name)            │
//! │     └── topping names grouped per sale                                  │
//! │                                                                         │
//! │  3. (OPTIONAL) VOID                                                     │
//! │     └── DELETE sales; lines go with it (ON DELETE CASCADE)              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use rose_core::checkout::SaleDraft;
use rose_core::report::{DayWindow, SaleSummary};
use rose_core::{Sale, SaleToppingLine};
use sqlx::SqlitePool;
use std::collections::HashMap;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::repository::to_db_timestamp;

const SALE_COLUMNS: &str = "id, product_id, total, payment_method, created_at";

/// A sale row joined with its product's name.
#[derive(Debug, sqlx::FromRow)]
struct SaleWithProductRow {
    #[sqlx(flatten)]
    sale: Sale,
    product_name: Option<String>,
}

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Records a sale and its topping lines, stamped by the database clock.
    pub async fn insert(&self, draft: &SaleDraft) -> DbResult<Sale> {
        self.insert_with_time(draft, None).await
    }

    /// Records a sale with an explicit creation time (imports, seeding).
    pub async fn insert_at(&self, draft: &SaleDraft, created_at: DateTime<Utc>) -> DbResult<Sale> {
        self.insert_with_time(draft, Some(created_at)).await
    }

    async fn insert_with_time(&self, draft: &SaleDraft, created_at: Option<DateTime<Utc>>) -> DbResult<Sale> {
        debug!(
            product_id = draft.product_id,
            total = draft.quote.total.units(),
            lines = draft.lines.len(),
            "Recording sale"
        );

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let sql = format!(
            "INSERT INTO sales (product_id, total, payment_method, created_at) \
             VALUES (?1, ?2, ?3, COALESCE(?4, strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))) \
             RETURNING {SALE_COLUMNS}"
        );
        let sale = sqlx::query_as::<_, Sale>(&sql)
            .bind(draft.product_id)
            .bind(draft.quote.total.units())
            .bind(draft.payment_method)
            .bind(created_at.as_ref().map(to_db_timestamp))
            .fetch_one(&mut *tx)
            .await?;

        for line in &draft.lines {
            sqlx::query(
                "INSERT INTO sale_toppings (sale_id, topping_id, price_at_sale) VALUES (?1, ?2, ?3)",
            )
            .bind(sale.id)
            .bind(line.topping_id)
            .bind(line.price_at_sale)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(sale_id = sale.id, total = sale.total, "Sale recorded");
        Ok(sale)
    }

    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Sale>> {
        let sql = format!("SELECT {SALE_COLUMNS} FROM sales WHERE id = ?1");
        let sale = sqlx::query_as::<_, Sale>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(sale)
    }

    /// Topping lines of a sale, in insertion order.
    pub async fn lines(&self, sale_id: i64) -> DbResult<Vec<SaleToppingLine>> {
        let lines = sqlx::query_as::<_, SaleToppingLine>(
            "SELECT id, sale_id, topping_id, price_at_sale FROM sale_toppings \
             WHERE sale_id = ?1 ORDER BY id",
        )
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }

    /// Sales created inside `window` (both ends inclusive), newest first.
    pub async fn list_between(&self, window: DayWindow) -> DbResult<Vec<SaleSummary>> {
        let start = to_db_timestamp(&window.start);
        let end = to_db_timestamp(&window.end);

        let rows = sqlx::query_as::<_, SaleWithProductRow>(
            "SELECT s.id, s.product_id, s.total, s.payment_method, s.created_at, \
                    p.name AS product_name \
             FROM sales s \
             LEFT JOIN products p ON p.id = s.product_id \
             WHERE s.created_at >= ?1 AND s.created_at <= ?2 \
             ORDER BY s.created_at DESC, s.id DESC",
        )
        .bind(&start)
        .bind(&end)
        .fetch_all(&self.pool)
        .await?;

        let topping_rows = sqlx::query_as::<_, (i64, Option<String>)>(
            "SELECT st.sale_id, t.name \
             FROM sale_toppings st \
             JOIN sales s ON s.id = st.sale_id \
             LEFT JOIN toppings t ON t.id = st.topping_id \
             WHERE s.created_at >= ?1 AND s.created_at <= ?2 \
             ORDER BY st.id",
        )
        .bind(&start)
        .bind(&end)
        .fetch_all(&self.pool)
        .await?;

        // unresolvable topping ids are left out of the list
        let mut toppings: HashMap<i64, Vec<String>> = HashMap::new();
        for (sale_id, name) in topping_rows {
            if let Some(name) = name.filter(|n| !n.is_empty()) {
                toppings.entry(sale_id).or_default().push(name);
            }
        }

        let summaries: Vec<SaleSummary> = rows
            .into_iter()
            .map(|row| {
                let names = toppings.remove(&row.sale.id).unwrap_or_default();
                SaleSummary::from_parts(&row.sale, row.product_name, names)
            })
            .collect();

        debug!(
            start = %start,
            end = %end,
            count = summaries.len(),
            "Listed sales in window"
        );
        Ok(summaries)
    }

    /// Voids a sale. Its topping lines are removed with it.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - no sale with that id
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM sales WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Sale", id));
        }

        info!(sale_id = id, "Sale voided");
        Ok(())
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
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
    use crate::repository::product::NewProduct;
    use crate::repository::topping::NewTopping;
    use chrono::{Duration, FixedOffset, NaiveDate, TimeZone};
    use rose_core::checkout::{prepare_sale, DiscountPolicy};
    use rose_core::{Money, PaymentMethod, Product, Topping, MISSING_PRODUCT_NAME};

    struct Fixture {
        db: Database,
        fresas_con_crema: Product,
        helado: Topping,
        fresas: Topping,
    }

    async fn fixture() -> Fixture {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let fresas_con_crema = db
            .products()
            .insert(&NewProduct::new("Fresas con crema", 5000).with_first_topping_discounted())
            .await
            .unwrap();
        let helado = db.toppings().insert(&NewTopping::new("Helado", 800)).await.unwrap();
        let fresas = db.toppings().insert(&NewTopping::new("Fresas", 1000)).await.unwrap();
        Fixture {
            db,
            fresas_con_crema,
            helado,
            fresas,
        }
    }

    fn bogota() -> FixedOffset {
        FixedOffset::west_opt(5 * 3600).unwrap()
    }

    fn draft(f: &Fixture, toppings: &[Topping], method: PaymentMethod) -> SaleDraft {
        prepare_sale(&f.fresas_con_crema, toppings, Some(method), &DiscountPolicy::default()).unwrap()
    }

    #[tokio::test]
    async fn test_insert_writes_sale_and_lines() {
        let f = fixture().await;
        let d = draft(&f, &[f.helado.clone(), f.fresas.clone()], PaymentMethod::Transferencia);
        assert_eq!(d.quote.total, Money::from_units(5800));

        let sale = f.db.sales().insert(&d).await.unwrap();
        assert_eq!(sale.total, 5800);
        assert_eq!(sale.payment_method, PaymentMethod::Transferencia);

        let lines = f.db.sales().lines(sale.id).await.unwrap();
        let snapshot: Vec<(i64, i64)> = lines.iter().map(|l| (l.topping_id, l.price_at_sale)).collect();
        assert_eq!(snapshot, vec![(f.helado.id, 800), (f.fresas.id, 1000)]);
    }

    #[tokio::test]
    async fn test_failed_line_rolls_back_sale() {
        let f = fixture().await;
        let mut d = draft(&f, &[f.helado.clone()], PaymentMethod::Efectivo);
        d.lines[0].topping_id = 9999;

        let err = f.db.sales().insert(&d).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
        assert_eq!(f.db.sales().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_day_listing_respects_window() {
        let f = fixture().await;
        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let window = DayWindow::for_date(date, bogota()).unwrap();

        let before = window.start - Duration::milliseconds(1);
        let morning = window.start;
        let evening = Utc.with_ymd_and_hms(2026, 10, 20, 3, 30, 0).unwrap();
        let after = window.end + Duration::milliseconds(1);

        let plain = draft(&f, &[], PaymentMethod::Efectivo);
        let topped = draft(&f, &[f.fresas.clone(), f.helado.clone()], PaymentMethod::Efectivo);

        f.db.sales().insert_at(&plain, before).await.unwrap();
        let first = f.db.sales().insert_at(&plain, morning).await.unwrap();
        let second = f.db.sales().insert_at(&topped, evening).await.unwrap();
        f.db.sales().insert_at(&plain, after).await.unwrap();

        let listed = f.db.sales().list_between(window).await.unwrap();
        let ids: Vec<i64> = listed.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);

        assert_eq!(listed[0].product_name, "Fresas con crema");
        assert_eq!(listed[0].toppings, vec!["Fresas", "Helado"]);
        assert_eq!(listed[0].created_at, evening);
        assert!(listed[1].toppings.is_empty());
    }

    #[tokio::test]
    async fn test_unresolved_product_uses_fallback_name() {
        let f = fixture().await;
        sqlx::query("PRAGMA foreign_keys = OFF")
            .execute(f.db.pool())
            .await
            .unwrap();
        let mut d = draft(&f, &[], PaymentMethod::Efectivo);
        d.product_id = 4242;
        let at = Utc::now();
        f.db.sales().insert_at(&d, at).await.unwrap();

        let window = DayWindow {
            start: at - Duration::seconds(1),
            end: at + Duration::seconds(1),
        };
        let listed = f.db.sales().list_between(window).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].product_name, MISSING_PRODUCT_NAME);
    }

    #[tokio::test]
    async fn test_void_removes_sale_and_lines() {
        let f = fixture().await;
        let sale = f
            .db
            .sales()
            .insert(&draft(&f, &[f.helado.clone()], PaymentMethod::Efectivo))
            .await
            .unwrap();

        f.db.sales().delete(sale.id).await.unwrap();

        assert!(f.db.sales().get_by_id(sale.id).await.unwrap().is_none());
        assert!(f.db.sales().lines(sale.id).await.unwrap().is_empty());

        let err = f.db.sales().delete(sale.id).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_void_leaves_other_sales_alone() {
        let f = fixture().await;
        let sales = f.db.sales();
        let voided = sales
            .insert(&draft(&f, &[f.helado.clone(), f.fresas.clone()], PaymentMethod::Efectivo))
            .await
            .unwrap();
        let kept = sales
            .insert(&draft(&f, &[f.fresas.clone()], PaymentMethod::Transferencia))
            .await
            .unwrap();

        let kept_before = sales.get_by_id(kept.id).await.unwrap().unwrap();
        let kept_lines_before = sales.lines(kept.id).await.unwrap();
        assert_eq!(kept_before.total, 5000);
        assert_eq!(kept_lines_before.len(), 1);

        sales.delete(voided.id).await.unwrap();

        assert_eq!(sales.get_by_id(kept.id).await.unwrap(), Some(kept_before));
        assert_eq!(sales.lines(kept.id).await.unwrap(), kept_lines_before);
        assert!(sales.lines(voided.id).await.unwrap().is_empty());
        assert_eq!(sales.count().await.unwrap(), 1);
    }
}
