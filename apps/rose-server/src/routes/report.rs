//! # Reporting Routes
//!
//! ```text
//! GET /api/reports/daily?date=2026-10-19        DailyReport (today when omitted)
//! GET /api/reports/daily/share?date=2026-10-19  { message, url } for WhatsApp
//! ```

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use chrono::NaiveDate;
use rose_core::report::{DailyReport, DayWindow};
use rose_core::share::{share_link, ShareLink};
use serde::Deserialize;
use tracing::debug;

use crate::error::ApiResult;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/daily", get(daily))
        .route("/daily/share", get(daily_share))
}

#[derive(Debug, Deserialize)]
pub struct DateQuery {
    /// `YYYY-MM-DD` on the shop's wall clock.
    pub date: Option<NaiveDate>,
}

async fn load_report(state: &AppState, date: Option<NaiveDate>) -> ApiResult<DailyReport> {
    let date = match date {
        Some(date) => date,
        None => state.today()?,
    };
    let window = DayWindow::try_for_date(date, state.offset()?)?;
    let sales = state.db.sales().list_between(window).await?;
    debug!(%date, sales = sales.len(), "Daily report loaded");
    Ok(DailyReport::build(date, sales))
}

async fn daily(State(state): State<AppState>, Query(query): Query<DateQuery>) -> ApiResult<Json<DailyReport>> {
    Ok(Json(load_report(&state, query.date).await?))
}

async fn daily_share(State(state): State<AppState>, Query(query): Query<DateQuery>) -> ApiResult<Json<ShareLink>> {
    let report = load_report(&state, query.date).await?;
    let link = share_link(&report, &state.config.share.base_url)?;
    Ok(Json(link))
}
