// Order list and order detail

use super::remote::{FetchOutcome, RemoteCollection, RemoteEntity};
use crate::client::ApiClient;
use crate::domain::Order;
use crate::services::orders;
use std::ops::Deref;

const LIST_ERROR: &str = "Erro ao carregar pedidos";
const DETAIL_ERROR: &str = "Erro ao carregar pedido";

#[derive(Clone)]
pub struct OrdersState {
    client: ApiClient,
    orders: RemoteCollection<Order>,
}

impl OrdersState {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            orders: RemoteCollection::new("orders"),
        }
    }

    pub async fn fetch_orders(&self) -> FetchOutcome {
        let client = &self.client;
        self.orders
            .load(
                async { orders::get_orders(client).await.map(|envelope| envelope.data) },
                LIST_ERROR,
            )
            .await
    }
}

impl Deref for OrdersState {
    type Target = RemoteCollection<Order>;

    fn deref(&self) -> &Self::Target {
        &self.orders
    }
}

#[derive(Clone)]
pub struct OrderState {
    client: ApiClient,
    order: RemoteEntity<Order>,
}

impl OrderState {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            order: RemoteEntity::new("order"),
        }
    }

    pub async fn fetch_order(&self, order_id: &str) -> FetchOutcome {
        let client = &self.client;
        self.order
            .load(
                async { orders::get_order(client, order_id).await.map(|envelope| envelope.data) },
                DETAIL_ERROR,
            )
            .await
    }
}

impl Deref for OrderState {
    type Target = RemoteEntity<Order>;

    fn deref(&self) -> &Self::Target {
        &self.order
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::NoCookies;
    use crate::domain::order::sample_order;
    use crate::test_support::FakeBackend;
    use axum::{extract::Path, http::StatusCode, routing::get, Json, Router};
    use serde_json::json;
    use std::sync::Arc;

    fn backend() -> Router {
        Router::new()
            .route(
                "/orders",
                get(|| async {
                    Json(json!({ "data": [
                        sample_order("1001", "Acme", "APPROVED"),
                        sample_order("1002", "Acme", "PENDING")
                    ]}))
                }),
            )
            .route(
                "/order/:id",
                get(|Path(id): Path<String>| async move {
                    if id == "gone" {
                        return (StatusCode::NOT_FOUND, Json(json!({})));
                    }
                    (StatusCode::OK, Json(json!({ "data": sample_order(&id, "Acme", "PENDING") })))
                }),
            )
    }

    #[tokio::test]
    async fn test_fetch_orders() {
        let fake = FakeBackend::spawn(backend()).await;
        let state = OrdersState::new(fake.client(Arc::new(NoCookies)));

        assert!(state.fetch_orders().await.is_applied());
        let orders = state.items().await;
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[1].platform_order_id, "1002");
    }

    #[tokio::test]
    async fn test_pending_order_with_null_ip_loads() {
        let mut pending = serde_json::to_value(sample_order("1003", "Acme", "PENDING")).unwrap();
        pending["riskResults"]["ip"] = json!(null);
        pending["riskResults"]["proxyType"] = json!(null);
        let body = json!({ "data": [sample_order("1001", "Acme", "APPROVED"), pending] });

        let fake = FakeBackend::spawn(Router::new().route(
            "/orders",
            get(move || {
                let body = body.clone();
                async move { Json(body) }
            }),
        ))
        .await;
        let state = OrdersState::new(fake.client(Arc::new(NoCookies)));

        assert!(state.fetch_orders().await.is_applied());
        let orders = state.items().await;
        assert_eq!(orders.len(), 2);
        assert!(orders[0].is_risk_analyzed());
        assert!(!orders[1].is_risk_analyzed());
    }

    #[tokio::test]
    async fn test_detail_failure_keeps_previous_order() {
        let fake = FakeBackend::spawn(backend()).await;
        let state = OrderState::new(fake.client(Arc::new(NoCookies)));

        state.fetch_order("1001").await;
        let outcome = state.fetch_order("gone").await;

        assert!(matches!(outcome, FetchOutcome::Failed(message) if message.contains("404")));
        assert_eq!(state.value().await.unwrap().platform_order_id, "1001");
    }
}
