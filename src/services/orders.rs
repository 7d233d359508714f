// Order endpoints

use super::{execute, path_segment, ApiEnvelope, ServiceResponse};
use crate::client::ApiClient;
use crate::domain::Order;

/// GET /orders
pub async fn get_orders(client: &ApiClient) -> ServiceResponse<ApiEnvelope<Vec<Order>>> {
    execute("get_orders", client.get("/orders")).await
}

/// GET /order/:id
pub async fn get_order(client: &ApiClient, order_id: &str) -> ServiceResponse<ApiEnvelope<Order>> {
    let path = format!("/order/{}", path_segment(order_id));
    execute("get_order", client.get(&path)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::StaticCookies;
    use crate::domain::order::sample_order;
    use crate::test_support::FakeBackend;
    use axum::{extract::Path, http::HeaderMap, http::StatusCode, routing::get, Json, Router};
    use serde_json::json;
    use std::sync::Arc;

    fn authorized(headers: &HeaderMap) -> bool {
        headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(|v| v == "Bearer good-token")
            .unwrap_or(false)
    }

    fn backend() -> Router {
        Router::new()
            .route(
                "/orders",
                get(|headers: HeaderMap| async move {
                    if !authorized(&headers) {
                        return (
                            StatusCode::UNAUTHORIZED,
                            Json(json!({ "error_message": "Token inválido" })),
                        );
                    }
                    (
                        StatusCode::OK,
                        Json(json!({ "data": [sample_order("1001", "Acme", "APPROVED")] })),
                    )
                }),
            )
            .route(
                "/order/:id",
                get(|Path(id): Path<String>| async move {
                    Json(json!({ "data": sample_order(&id, "Acme", "PENDING") }))
                }),
            )
    }

    #[tokio::test]
    async fn test_get_orders_with_token() {
        let backend = FakeBackend::spawn(backend()).await;
        let client = backend.client(Arc::new(StaticCookies::new("apiToken=good-token")));

        let orders = get_orders(&client).await.into_result().unwrap();
        assert_eq!(orders.data.len(), 1);
        assert_eq!(orders.data[0].platform_order_id, "1001");
    }

    #[tokio::test]
    async fn test_expired_token_surfaces_as_failure() {
        let backend = FakeBackend::spawn(backend()).await;
        let client = backend.client(Arc::new(StaticCookies::new("apiToken=stale")));

        assert_eq!(
            get_orders(&client).await,
            ServiceResponse::Failure("Token inválido".to_string())
        );
    }

    #[tokio::test]
    async fn test_get_order_by_id() {
        let backend = FakeBackend::spawn(backend()).await;
        let client = backend.client(Arc::new(StaticCookies::new("apiToken=good-token")));

        let order = get_order(&client, "2002").await.into_result().unwrap();
        assert_eq!(order.data.platform_order_id, "2002");
    }
}
