//! # Report Sharing
//!
//! Builds the WhatsApp message for a daily report and the deep link that
//! opens it. The client hands the link to the platform URL opener; nothing
//! is awaited or parsed afterwards.
//!
//! ## Message Layout
//! ```text
//! *📊 REPORTE DE VENTAS - 19 de octubre de 2026*
//!
//! *💰 Total Recaudado:* $45.600
//! *🍦 Ventas realizadas:* 7
//!
//! *📦 RESUMEN DE INSUMOS:*
//! - Helado: x4
//! - Fresas: x3
//!
//! _Generado por ROSE POS_
//! ```

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::report::DailyReport;

/// Default deep-link base.
pub const WHATSAPP_BASE_URL: &str = "https://wa.me/";

const MONTHS_ES: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

/// Long Spanish date: `19 de octubre de 2026`.
pub fn format_long_date_es(date: NaiveDate) -> String {
    let month = MONTHS_ES[date.month0() as usize];
    format!("{} de {} de {}", date.day(), month, date.year())
}

/// Renders the report as the shareable text.
pub fn share_message(report: &DailyReport) -> String {
    let mut lines = vec![
        format!("*📊 REPORTE DE VENTAS - {}*", format_long_date_es(report.date)),
        String::new(),
        format!("*💰 Total Recaudado:* {}", report.total),
        format!("*🍦 Ventas realizadas:* {}", report.sale_count),
        String::new(),
        "*📦 RESUMEN DE INSUMOS:*".to_string(),
    ];
    lines.extend(
        report
            .topping_usage
            .iter()
            .map(|u| format!("- {}: x{}", u.name, u.count)),
    );
    lines.push(String::new());
    lines.push("_Generado por ROSE POS_".to_string());
    lines.join("\n")
}

/// Message plus the link that opens it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ShareLink {
    pub message: String,
    pub url: String,
}

/// Builds the share link for a report.
///
/// ## Errors
/// [`CoreError::NothingToReport`] when the day has no sales.
pub fn share_link(report: &DailyReport, base_url: &str) -> CoreResult<ShareLink> {
    if report.is_empty() {
        return Err(CoreError::NothingToReport);
    }
    let message = share_message(report);
    let url = format!("{}?text={}", base_url, urlencoding::encode(&message));
    Ok(ShareLink { message, url })
}

// =============================================================================
// Unit Tests
// =============================================================================
