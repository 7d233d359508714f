// Report downloads.
//
// Each request fetches fresh data with the caller's own cookies, so the
// backend sees the same bearer token the browser would send.

use crate::api::routes::AppState;
use crate::client::StaticCookies;
use crate::domain::DecisionFilter;
use crate::errors::{AppError, Result};
use crate::export::{self, ExportFile, OrderFilter};
use crate::observability::MetricsRecorder;
use crate::state::{Dashboard, FetchOutcome};
use axum::{
    extract::{Path, Query, State},
    http::{
        header::{CONTENT_DISPOSITION, CONTENT_TYPE, COOKIE},
        HeaderMap, HeaderValue,
    },
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug, Default, Deserialize)]
pub struct OrdersCsvQuery {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub decision: String,
}

/// State containers bound to the cookies of the incoming request
fn request_dashboard(state: &AppState, headers: &HeaderMap) -> Dashboard {
    let raw = headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .collect::<Vec<_>>()
        .join("; ");
    Dashboard::new(state.api_client.with_cookies(Arc::new(StaticCookies::new(raw))))
}

fn upstream(outcome: FetchOutcome) -> Result<()> {
    match outcome {
        FetchOutcome::Failed(message) => Err(AppError::Upstream(message)),
        FetchOutcome::Applied | FetchOutcome::Superseded => Ok(()),
    }
}

fn download(file: ExportFile) -> Result<Response> {
    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{}\"", file.file_name))
        .map_err(|e| AppError::Internal(format!("Invalid file name: {}", e)))?;

    Ok((
        [
            (CONTENT_TYPE, HeaderValue::from_static(file.content_type)),
            (CONTENT_DISPOSITION, disposition),
        ],
        file.bytes,
    )
        .into_response())
}

/// GET /exports/orders.csv?search=&decision=
pub async fn orders_csv(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<OrdersCsvQuery>,
) -> Result<Response> {
    let dashboard = request_dashboard(&state, &headers);
    upstream(dashboard.orders.fetch_orders().await)?;

    let started = Instant::now();
    let orders = dashboard.orders.items().await;
    let filter = OrderFilter::new(query.search, DecisionFilter::parse(&query.decision));
    if export::is_empty_selection(&orders, &filter) {
        tracing::info!(total = orders.len(), "No orders match the export filter");
    }

    let file = export::export_orders_csv(
        &orders,
        &filter,
        state.config.export.utc_offset_minutes,
        Utc::now(),
    );
    MetricsRecorder::record_export("csv", "success");
    MetricsRecorder::record_export_duration("csv", started.elapsed().as_secs_f64());

    download(file)
}

/// GET /exports/orders/:order_id/pdf
pub async fn order_pdf(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(order_id): Path<String>,
) -> Result<Response> {
    let dashboard = request_dashboard(&state, &headers);
    upstream(dashboard.order.fetch_order(&order_id).await)?;
    let order = dashboard
        .order
        .value()
        .await
        .ok_or_else(|| AppError::NotFound("Order".to_string()))?;

    let started = Instant::now();
    let file = export::export_order_pdf(
        state.api_client.http(),
        &order,
        &state.config.export,
        Utc::now(),
    )
    .await
    .map_err(|e| {
        MetricsRecorder::record_export("pdf", "error");
        AppError::from(e)
    })?;
    MetricsRecorder::record_export("pdf", "success");
    MetricsRecorder::record_export_duration("pdf", started.elapsed().as_secs_f64());

    download(file)
}
