// Aggregates computed by the backend; read-only here

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// `GET /orders/metrics`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrdersMetrics {
    pub approval_rate: f64,
    pub disapproval_rate: f64,
    pub total_approved_amount_current: f64,
    pub approval_rate_percentage_change: f64,
    pub disapproval_rate_percentage_change: f64,
    pub total_approved_amount_percentage_change: f64,
}

/// `GET /shops/metrics`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopsMetrics {
    #[serde(default)]
    pub penalties_rank: Vec<PenaltyCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PenaltyCount {
    pub penalty: String,
    pub count: u64,
}

/// `GET /shop/metrics/:shopId`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopMetrics {
    pub shop_id: String,
    pub name: String,
    pub shop_domain: String,
    pub total_orders: u64,
    pub number_of_current_orders: u64,
    pub number_of_current_approved_orders: u64,
    pub number_of_current_manual_review_orders: u64,
    pub number_of_current_pending_orders: u64,
    pub total_price_of_approved_orders: f64,
    pub orders_percentage_change: f64,
    pub approved_orders_percentage_change: f64,
    pub manual_review_percentage_change: f64,
    pub total_price_approved_percentage_change: f64,
    #[serde(default)]
    pub score_penalties: Vec<String>,
    pub created_at: DateTime<Utc>,
}
