//! # Catalog Admin Routes
//!
//! Back-office CRUD over the two catalog tables. Every route requires an
//! admin session.
//!
//! ```text
//! GET   /api/admin/{table}?page=N              Page<CatalogItem> (active + inactive)
//! POST  /api/admin/{table}                     { name, price, flags? } ──► 201 item
//! PATCH /api/admin/{table}/{id}                { field, text, source } ──► { updated, item }
//! PUT   /api/admin/{table}/{id}/flags          { hasToppings?, firstToppingDiscounted? }
//! POST  /api/admin/{table}/{id}/toggle-active  { current?, confirmed }
//! ```
//!
//! `{table}` is `products` or `toppings`; flags only exist on products.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, patch, post, put};
use axum::{Json, Router};
use rose_core::edit::{confirm_toggle, EditableCell, EditableField};
use rose_core::pagination::Page;
use rose_core::validation::validate_new_item;
use rose_core::{ActiveFlag, CatalogItem, CatalogTable, ValidationError};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use rose_db::ProductFlags;

use crate::auth::RequireAdmin;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{table}", get(list).post(create))
        .route("/{table}/{id}", patch(edit_cell))
        .route("/{table}/{id}/flags", put(set_flags))
        .route("/{table}/{id}/toggle-active", post(toggle_active))
}

fn parse_table(raw: &str) -> Result<CatalogTable, ValidationError> {
    raw.parse()
}

// =============================================================================
// Listing
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
}

async fn list(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(table): Path<String>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<Page<CatalogItem>>> {
    let table = parse_table(&table)?;
    let request = state.page_request(query.page)?;
    let page = state.db.catalog().list_page(table, request).await?;
    Ok(Json(page))
}

// =============================================================================
// Create
// =============================================================================

/// The dialog sends the price as typed; numbers are accepted too.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PriceInput {
    Number(i64),
    Text(String),
}

impl PriceInput {
    fn into_text(self) -> String {
        match self {
            PriceInput::Number(n) => n.to_string(),
            PriceInput::Text(t) => t,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequest {
    pub name: Option<String>,
    pub price: Option<PriceInput>,
    /// Products only; defaults to `true`.
    pub has_toppings: Option<bool>,
    /// Products only; defaults to `false`.
    pub first_topping_discounted: Option<bool>,
}

impl CreateRequest {
    fn product_flags(&self, table: CatalogTable) -> ApiResult<ProductFlags> {
        let defaults = ProductFlags::default();
        let sent = self.has_toppings.is_some() || self.first_topping_discounted.is_some();
        if sent && table != CatalogTable::Products {
            return Err(ApiError::validation("Only products have topping flags"));
        }
        Ok(ProductFlags {
            has_toppings: self.has_toppings.unwrap_or(defaults.has_toppings),
            first_topping_discounted: self
                .first_topping_discounted
                .unwrap_or(defaults.first_topping_discounted),
        })
    }
}

async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(table): Path<String>,
    Json(req): Json<CreateRequest>,
) -> ApiResult<(StatusCode, Json<CatalogItem>)> {
    let table = parse_table(&table)?;
    let flags = req.product_flags(table)?;
    let price_text = req.price.map(PriceInput::into_text);
    let (name, price) = validate_new_item(req.name.as_deref(), price_text.as_deref())?;

    let item = state.db.catalog().create(table, &name, price, flags).await?;
    info!(admin_id = admin.admin_id, table = table.table_name(), id = item.id(), "Catalog item created");
    Ok((StatusCode::CREATED, Json(item)))
}

// =============================================================================
// Cell Edit
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct CellEditRequest {
    pub field: EditableField,
    pub text: String,
    /// Value the operator started editing from. Defaults to the stored one.
    pub source: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EditResponse {
    pub updated: bool,
    pub item: CatalogItem,
}

fn cell_source(item: &CatalogItem, field: EditableField) -> String {
    match (field, item) {
        (EditableField::Name, _) => item.name().to_string(),
        (EditableField::Price, CatalogItem::Product(p)) => p.price.to_string(),
        (EditableField::Price, CatalogItem::Topping(t)) => t.price.to_string(),
    }
}

/// Evaluates the edited cell against the stored row and writes at most
/// one column. An edit started from a value that has since changed is
/// dropped, as the cell re-seeds from the new value.
async fn edit_cell(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path((table, id)): Path<(String, i64)>,
    Json(req): Json<CellEditRequest>,
) -> ApiResult<Json<EditResponse>> {
    let table = parse_table(&table)?;
    let catalog = state.db.catalog();
    let item = catalog.get(table, id).await?;
    let stored = cell_source(&item, req.field);

    let mut cell = EditableCell::new(id, req.field, req.source.unwrap_or_else(|| stored.clone()));
    cell.set_text(req.text);
    if cell.reconcile(id, &stored) {
        debug!(id, "Cell edit started from a stale value, dropped");
    }

    let Some(update) = cell.commit() else {
        return Ok(Json(EditResponse { updated: false, item }));
    };

    let item = catalog.apply_update(table, id, &update).await?;
    Ok(Json(EditResponse { updated: true, item }))
}

// =============================================================================
// Product Flags
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlagsRequest {
    pub has_toppings: Option<bool>,
    pub first_topping_discounted: Option<bool>,
}

async fn set_flags(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path((table, id)): Path<(String, i64)>,
    Json(req): Json<FlagsRequest>,
) -> ApiResult<Json<CatalogItem>> {
    if parse_table(&table)? != CatalogTable::Products {
        return Err(ApiError::validation("Only products have topping flags"));
    }

    let products = state.db.products();
    let product = products
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product", id))?;

    products
        .set_topping_flags(
            id,
            req.has_toppings.unwrap_or(product.has_toppings),
            req.first_topping_discounted
                .unwrap_or(product.first_topping_discounted),
        )
        .await?;

    let item = state.db.catalog().get(CatalogTable::Products, id).await?;
    Ok(Json(item))
}

// =============================================================================
// Active Toggle
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct ToggleRequest {
    /// State the operator saw; defaults to the stored state.
    pub current: Option<ActiveFlag>,
    #[serde(default)]
    pub confirmed: bool,
}

async fn toggle_active(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path((table, id)): Path<(String, i64)>,
    Json(req): Json<ToggleRequest>,
) -> ApiResult<Json<CatalogItem>> {
    let table = parse_table(&table)?;
    let catalog = state.db.catalog();
    let item = catalog.get(table, id).await?;

    let current = req.current.unwrap_or_else(|| item.active());
    let update = confirm_toggle(item.name(), current, req.confirmed)?;

    let item = catalog.apply_update(table, id, &update).await?;
    info!(
        admin_id = admin.admin_id,
        table = table.table_name(),
        id,
        active = %item.active(),
        "Catalog item toggled"
    );
    Ok(Json(item))
}
