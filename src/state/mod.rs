// Cached remote state for the dashboard screens.
//
// Containers are cheap `Clone` handles; clones share the same cache.

pub mod metrics;
pub mod orders;
pub mod remote;
pub mod stores;
pub mod tickets;

pub use metrics::{OrdersMetricsState, ShopMetricsState, ShopsMetricsState};
pub use orders::{OrderState, OrdersState};
pub use remote::{FetchOutcome, RemoteCollection, RemoteEntity, Snapshot};
pub use stores::{StoreState, StoresState};
pub use tickets::{TicketState, TicketsState};

use crate::client::ApiClient;

/// Result of a user action, shown as a toast by the UI
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
}

impl Notice {
    /// Error notice with `fallback` standing in for a blank message
    pub(crate) fn error_or(message: String, fallback: &str) -> Self {
        if message.trim().is_empty() {
            Notice::Error(fallback.to_string())
        } else {
            Notice::Error(message)
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Notice::Success(_))
    }

    pub fn message(&self) -> &str {
        match self {
            Notice::Success(message) | Notice::Error(message) => message,
        }
    }
}

/// Every container of one session, sharing a single API client
#[derive(Clone)]
pub struct Dashboard {
    pub stores: StoresState,
    pub store: StoreState,
    pub orders: OrdersState,
    pub order: OrderState,
    pub tickets: TicketsState,
    pub ticket: TicketState,
    pub orders_metrics: OrdersMetricsState,
    pub shops_metrics: ShopsMetricsState,
    pub shop_metrics: ShopMetricsState,
}

impl Dashboard {
    pub fn new(client: ApiClient) -> Self {
        Self {
            stores: StoresState::new(client.clone()),
            store: StoreState::new(client.clone()),
            orders: OrdersState::new(client.clone()),
            order: OrderState::new(client.clone()),
            tickets: TicketsState::new(client.clone()),
            ticket: TicketState::new(client.clone()),
            orders_metrics: OrdersMetricsState::new(client.clone()),
            shops_metrics: ShopsMetricsState::new(client.clone()),
            shop_metrics: ShopMetricsState::new(client),
        }
    }

    /// Load the landing page data: orders, stores and both aggregates, in
    /// parallel. Each container records its own outcome.
    pub async fn refresh_overview(&self) -> [FetchOutcome; 4] {
        let (orders, stores, orders_metrics, shops_metrics) = futures::join!(
            self.orders.fetch_orders(),
            self.stores.fetch_stores(),
            self.orders_metrics.fetch_metrics(),
            self.shops_metrics.fetch_metrics(),
        );
        [orders, stores, orders_metrics, shops_metrics]
    }
}
