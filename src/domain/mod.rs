// Records mirrored from the risk API. The dashboard caches these; the backend
// owns them.

pub mod badge;
pub mod metrics;
pub mod order;
pub mod store;
pub mod ticket;

pub use badge::BadgeVariant;
pub use metrics::{OrdersMetrics, PenaltyCount, ShopMetrics, ShopsMetrics};
pub use order::{Customer, Decision, DecisionFilter, Order, OrderShop, OrderTag, RiskResults};
pub use store::{MerchantStore, Platform, ShopPolicy, StoreStatus, UpdateStorePolicyRequest};
pub use ticket::{CreateTicketRequest, SlaStatus, Ticket, TicketStatus, UpdateTicketRequest};

use serde::{Deserialize, Deserializer};

/// Treat an explicit `null` like a missing key
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accept identifiers the backend sends either as strings or as numbers
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}
