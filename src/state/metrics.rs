// Dashboard aggregates

use super::remote::{FetchOutcome, RemoteEntity};
use crate::client::ApiClient;
use crate::domain::{OrdersMetrics, ShopMetrics, ShopsMetrics};
use crate::services::metrics;
use std::ops::Deref;

#[derive(Clone)]
pub struct OrdersMetricsState {
    client: ApiClient,
    metrics: RemoteEntity<OrdersMetrics>,
}

impl OrdersMetricsState {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            metrics: RemoteEntity::new("orders_metrics"),
        }
    }

    pub async fn fetch_metrics(&self) -> FetchOutcome {
        let client = &self.client;
        self.metrics
            .load(
                async { metrics::get_orders_metrics(client).await.map(|envelope| envelope.data) },
                "Erro ao carregar métricas",
            )
            .await
    }
}

impl Deref for OrdersMetricsState {
    type Target = RemoteEntity<OrdersMetrics>;

    fn deref(&self) -> &Self::Target {
        &self.metrics
    }
}

#[derive(Clone)]
pub struct ShopsMetricsState {
    client: ApiClient,
    metrics: RemoteEntity<ShopsMetrics>,
}

impl ShopsMetricsState {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            metrics: RemoteEntity::new("shops_metrics"),
        }
    }

    pub async fn fetch_metrics(&self) -> FetchOutcome {
        let client = &self.client;
        self.metrics
            .load(
                async { metrics::get_shops_metrics(client).await.map(|envelope| envelope.data) },
                "Erro ao carregar métricas",
            )
            .await
    }
}

impl Deref for ShopsMetricsState {
    type Target = RemoteEntity<ShopsMetrics>;

    fn deref(&self) -> &Self::Target {
        &self.metrics
    }
}

/// Metrics of a single shop, keyed by the shop id passed to each fetch
#[derive(Clone)]
pub struct ShopMetricsState {
    client: ApiClient,
    metrics: RemoteEntity<ShopMetrics>,
}

impl ShopMetricsState {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            metrics: RemoteEntity::new("shop_metrics"),
        }
    }

    pub async fn fetch_metrics(&self, shop_id: &str) -> FetchOutcome {
        let client = &self.client;
        self.metrics
            .load(
                async {
                    metrics::get_shop_metrics(client, shop_id)
                        .await
                        .map(|envelope| envelope.data)
                },
                "Erro ao carregar métricas da loja",
            )
            .await
    }
}

impl Deref for ShopMetricsState {
    type Target = RemoteEntity<ShopMetrics>;

    fn deref(&self) -> &Self::Target {
        &self.metrics
    }
}
