// Report generation for orders: CSV for the table, PDF for a single order

pub mod csv;
pub mod pdf;

pub use self::csv::{export_orders_csv, filter_orders, is_empty_selection, OrderFilter};
pub use self::pdf::{export_order_pdf, PdfDocumentLayout};

use chrono::{DateTime, FixedOffset, Offset, Utc};
use thiserror::Error;

/// Placeholder printed for absent values
pub const NOT_INFORMED: &str = "Não informado";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("image request failed: {0}")]
    ImageFetch(#[from] reqwest::Error),

    #[error("image request timed out after {0} ms")]
    ImageTimeout(u64),

    #[error("image request returned status {0}")]
    ImageStatus(u16),

    #[error("image could not be decoded: {0}")]
    ImageDecode(String),

    #[error("PDF rendering failed: {0}")]
    Render(String),
}

/// A generated file ready to be sent as a download
#[derive(Debug, Clone, PartialEq)]
pub struct ExportFile {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

// ============================================================================
// Formatting helpers
// ============================================================================

fn offset(utc_offset_minutes: i32) -> FixedOffset {
    FixedOffset::east_opt(utc_offset_minutes * 60).unwrap_or_else(|| Utc.fix())
}

/// `13/11/2025, às 17:04` in the configured offset
pub fn format_timestamp(timestamp: &DateTime<Utc>, utc_offset_minutes: i32) -> String {
    timestamp
        .with_timezone(&offset(utc_offset_minutes))
        .format("%d/%m/%Y, às %H:%M")
        .to_string()
}

/// `13/11/2025 - 17:04`, used for the PDF "generated at" line
pub fn format_generated_at(now: &DateTime<Utc>, utc_offset_minutes: i32) -> String {
    now.with_timezone(&offset(utc_offset_minutes))
        .format("%d/%m/%Y - %H:%M")
        .to_string()
}

/// UTC calendar date used in file names
pub fn file_date(now: &DateTime<Utc>) -> String {
    now.format("%Y-%m-%d").to_string()
}

/// Integer cents as a decimal amount with two places
pub fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{}{}.{:02}", sign, abs / 100, abs % 100)
}

pub fn yes_no(value: bool) -> &'static str {
    if value {
        "Sim"
    } else {
        "Não"
    }
}

/// Who approved the order; absent means no approval was needed
pub fn approval_label(approved_by: Option<&str>) -> String {
    match approved_by.map(str::trim).filter(|s| !s.is_empty()) {
        None => "Não requerido".to_string(),
        Some(who) if who.eq_ignore_ascii_case("lumus") => "LUMUS".to_string(),
        Some(who) if who.eq_ignore_ascii_case("merchant") => "MERCHANT".to_string(),
        Some(who) => who.to_string(),
    }
}
