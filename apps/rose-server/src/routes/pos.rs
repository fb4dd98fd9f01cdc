//! # Point of Sale Routes
//!
//! The counter flow on the phone.
//!
//! ```text
//! GET  /products ──► tap product ──► GET /toppings?product_id=N
//!                                        │
//!                        toggle toppings ▼
//!                                   POST /quote    (live total)
//!                                        │
//!                        pick payment    ▼
//!                                   POST /sales    ──► 201
//!                                        │
//!                                        ▼
//!                                   GET /sales/today
//!                                        │
//!                        long-press     ▼
//!                                   DELETE /sales/{id}?confirm=true
//! ```
//!
//! Prices always come from the stored catalog; the client only sends ids.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use rose_core::checkout::{confirm_void, offered_toppings, prepare_sale, CheckoutQuote, SaleDraft, ToppingSelection};
use rose_core::report::{DailyReport, DayWindow};
use rose_core::{CoreError, PaymentMethod, Product, Sale, Topping};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ApiResult;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/products", get(products))
        .route("/toppings", get(toppings))
        .route("/quote", post(quote))
        .route("/sales", post(record_sale))
        .route("/sales/today", get(today))
        .route("/sales/{id}", delete(void_sale))
}

/// Active products, by name.
async fn products(State(state): State<AppState>) -> ApiResult<Json<Vec<Product>>> {
    Ok(Json(state.db.products().list_active().await?))
}

#[derive(Debug, Deserialize)]
pub struct ToppingQuery {
    pub product_id: Option<i64>,
}

/// Active toppings; with `product_id`, only those offered for it.
async fn toppings(State(state): State<AppState>, Query(query): Query<ToppingQuery>) -> ApiResult<Json<Vec<Topping>>> {
    let active = state.db.toppings().list_active().await?;
    let Some(product_id) = query.product_id else {
        return Ok(Json(active));
    };

    let product = state
        .db
        .products()
        .get_by_id(product_id)
        .await?
        .ok_or(CoreError::ProductNotFound(product_id))?;
    if !product.has_toppings {
        return Ok(Json(Vec::new()));
    }

    let offered = offered_toppings(&product, &active, state.policy())
        .into_iter()
        .cloned()
        .collect();
    Ok(Json(offered))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub product_id: i64,
    #[serde(default)]
    pub topping_ids: Vec<i64>,
    pub payment_method: Option<PaymentMethod>,
}

/// Loads the product and selection and validates them into a priced draft.
async fn draft_sale(state: &AppState, req: &CheckoutRequest) -> ApiResult<SaleDraft> {
    let product = state
        .db
        .products()
        .get_by_id(req.product_id)
        .await?
        .ok_or(CoreError::ProductNotFound(req.product_id))?;

    let selection = ToppingSelection::from_ids(req.topping_ids.iter().copied());
    let toppings = state.db.toppings().get_many(selection.ids()).await?;

    Ok(prepare_sale(&product, &toppings, req.payment_method, state.policy())?)
}

async fn quote(State(state): State<AppState>, Json(req): Json<CheckoutRequest>) -> ApiResult<Json<CheckoutQuote>> {
    let draft = draft_sale(&state, &req).await?;
    Ok(Json(draft.quote))
}

#[derive(Debug, Serialize)]
pub struct SaleRecorded {
    pub sale: Sale,
    pub quote: CheckoutQuote,
}

async fn record_sale(
    State(state): State<AppState>,
    Json(req): Json<CheckoutRequest>,
) -> ApiResult<(StatusCode, Json<SaleRecorded>)> {
    let draft = draft_sale(&state, &req).await?;
    let sale = state.db.sales().insert(&draft).await?;

    info!(
        sale_id = sale.id,
        product_id = sale.product_id,
        total = sale.total,
        toppings = draft.lines.len(),
        payment = %sale.payment_method,
        "Sale recorded"
    );
    Ok((
        StatusCode::CREATED,
        Json(SaleRecorded {
            sale,
            quote: draft.quote,
        }),
    ))
}

/// Today's sales, newest first, with the running total.
async fn today(State(state): State<AppState>) -> ApiResult<Json<DailyReport>> {
    let date = state.today()?;
    let window = DayWindow::try_for_date(date, state.offset()?)?;
    let sales = state.db.sales().list_between(window).await?;
    Ok(Json(DailyReport::build(date, sales)))
}

#[derive(Debug, Deserialize)]
pub struct VoidQuery {
    #[serde(default)]
    pub confirm: bool,
}

/// Deletes the sale and its topping lines.
async fn void_sale(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<VoidQuery>,
) -> ApiResult<StatusCode> {
    confirm_void(query.confirm)?;
    state.db.sales().delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
