// Aggregate metrics endpoints

use super::{execute, path_segment, ApiEnvelope, ServiceResponse};
use crate::client::ApiClient;
use crate::domain::{OrdersMetrics, ShopMetrics, ShopsMetrics};

/// GET /orders/metrics
pub async fn get_orders_metrics(client: &ApiClient) -> ServiceResponse<ApiEnvelope<OrdersMetrics>> {
    execute("get_orders_metrics", client.get("/orders/metrics")).await
}

/// GET /shops/metrics
pub async fn get_shops_metrics(client: &ApiClient) -> ServiceResponse<ApiEnvelope<ShopsMetrics>> {
    execute("get_shops_metrics", client.get("/shops/metrics")).await
}

/// GET /shop/metrics/:shopId
pub async fn get_shop_metrics(
    client: &ApiClient,
    shop_id: &str,
) -> ServiceResponse<ApiEnvelope<ShopMetrics>> {
    let path = format!("/shop/metrics/{}", path_segment(shop_id));
    execute("get_shop_metrics", client.get(&path)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::NoCookies;
    use crate::test_support::FakeBackend;
    use axum::{extract::Path, routing::get, Json, Router};
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_metrics_endpoints() {
        let backend = FakeBackend::spawn(
            Router::new()
                .route(
                    "/orders/metrics",
                    get(|| async {
                        Json(json!({ "data": {
                            "approvalRate": 91.5,
                            "disapprovalRate": 8.5,
                            "totalApprovedAmountCurrent": 125000.0,
                            "approvalRatePercentageChange": 2.0,
                            "disapprovalRatePercentageChange": -2.0,
                            "totalApprovedAmountPercentageChange": 12.5
                        }}))
                    }),
                )
                .route(
                    "/shops/metrics",
                    get(|| async {
                        Json(json!({ "data": { "penaltiesRank": [
                            { "penalty": "vpn_detected", "count": 12 },
                            { "penalty": "new_device", "count": 4 }
                        ]}}))
                    }),
                )
                .route(
                    "/shop/metrics/:shop_id",
                    get(|Path(shop_id): Path<String>| async move {
                        Json(json!({ "data": {
                            "shopId": shop_id,
                            "name": "Acme",
                            "shopDomain": "acme.myshopify.com",
                            "totalOrders": 40,
                            "numberOfCurrentOrders": 10,
                            "numberOfCurrentApprovedOrders": 7,
                            "numberOfCurrentManualReviewOrders": 2,
                            "numberOfCurrentPendingOrders": 1,
                            "totalPriceOfApprovedOrders": 3500.0,
                            "ordersPercentageChange": 5.0,
                            "approvedOrdersPercentageChange": 3.0,
                            "manualReviewPercentageChange": 0.0,
                            "totalPriceApprovedPercentageChange": 8.0,
                            "scorePenalties": ["vpn_detected"],
                            "createdAt": "2025-10-01T12:00:00Z"
                        }}))
                    }),
                ),
        )
        .await;
        let client = backend.client(Arc::new(NoCookies));

        let orders = get_orders_metrics(&client).await.into_result().unwrap();
        assert_eq!(orders.data.approval_rate, 91.5);

        let shops = get_shops_metrics(&client).await.into_result().unwrap();
        assert_eq!(shops.data.penalties_rank[0].penalty, "vpn_detected");

        let shop = get_shop_metrics(&client, "shop-9").await.into_result().unwrap();
        assert_eq!(shop.data.shop_id, "shop-9");
        assert_eq!(shop.data.number_of_current_approved_orders, 7);
    }
}
