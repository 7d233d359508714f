// Orders and the decision vocabulary built on their tags

use super::{null_as_default, string_or_number, BadgeVariant};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Order
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub shop_id: String,
    #[serde(default)]
    pub customer_id: Option<String>,
    pub platform: String,
    pub platform_order_id: String,
    #[serde(default)]
    pub customer_score_grade: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<String>,
    pub total_price_cents: i64,
    #[serde(default)]
    pub currency: Option<String>,
    /// Backend tag, kept verbatim for display and export
    pub tag: String,
    pub status: String,
    #[serde(default)]
    pub approved_by: Option<String>,
    #[serde(default)]
    pub country_dest_code: Option<String>,
    pub customer: Customer,
    #[serde(default)]
    pub risk_results: Option<RiskResults>,
    #[serde(default)]
    pub shop: Option<OrderShop>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    pub fn order_tag(&self) -> OrderTag {
        OrderTag::parse(&self.tag)
    }

    /// Decision badge derived from the backend tag
    pub fn decision(&self) -> Decision {
        Decision::from(&self.order_tag())
    }

    /// Store name when the backend embedded it, otherwise the shop id
    pub fn store_display_name(&self) -> &str {
        self.shop
            .as_ref()
            .map(|shop| shop.name.as_str())
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.shop_id)
    }

    /// Risk analysis has finished once the backend filled in the client IP.
    /// Until then `riskResults.ip` is blank.
    pub fn is_risk_analyzed(&self) -> bool {
        self.risk_results
            .as_ref()
            .map(|risk| !risk.ip.trim().is_empty())
            .unwrap_or(false)
    }

    /// Score grade of the order, falling back to the customer's grade
    pub fn score_grade(&self) -> Option<&str> {
        self.customer_score_grade
            .as_deref()
            .filter(|grade| !grade.is_empty())
            .or_else(|| self.customer.score_grade.as_deref().filter(|g| !g.is_empty()))
    }

    /// Biometry capture URL, wherever the backend put it
    pub fn biometry_image_url(&self) -> Option<&str> {
        self.customer
            .biometry_image_url
            .as_deref()
            .or_else(|| {
                self.risk_results
                    .as_ref()
                    .and_then(|risk| risk.biometry_image_url.as_deref())
            })
            .filter(|url| !url.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub platform_customer_id: Option<String>,
    #[serde(default)]
    pub country_last: Option<String>,
    #[serde(default)]
    pub score_grade: Option<String>,
    #[serde(default)]
    pub chargeback_count: Option<u32>,
    #[serde(default)]
    pub refund_count: Option<u32>,
    #[serde(default)]
    pub orders_count: Option<u32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub has_biometry: bool,
    #[serde(default)]
    pub biometry_image_url: Option<String>,
}

/// Fields arrive as `null` while the analysis is still pending
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RiskResults {
    #[serde(deserialize_with = "null_as_default")]
    pub ip: String,
    #[serde(deserialize_with = "null_as_default")]
    pub ip_continent: String,
    #[serde(deserialize_with = "null_as_default")]
    pub ip_country_code: String,
    #[serde(deserialize_with = "null_as_default")]
    pub ip_city: String,
    #[serde(deserialize_with = "string_or_number")]
    pub ip_asn: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub vpn_detected: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub proxy_detected: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub proxy_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub tor_detected: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub bot_detected: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub score_penalties: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub score_bonuses: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub biometry_needed: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub decision: String,
    pub biometry_image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderShop {
    pub name: String,
}

// ============================================================================
// Order Tag
// ============================================================================

/// Lifecycle label the backend assigns to an order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OrderTag {
    Pending,
    Approved,
    WaitingBiometry,
    ManualReview,
    /// A tag this dashboard does not know yet, kept verbatim
    Other(String),
}

impl OrderTag {
    pub fn as_str(&self) -> &str {
        match self {
            OrderTag::Pending => "PENDING",
            OrderTag::Approved => "APPROVED",
            OrderTag::WaitingBiometry => "WAITING_BIOMETRY",
            OrderTag::ManualReview => "MANUAL_REVIEW",
            OrderTag::Other(raw) => raw,
        }
    }

    /// Case-insensitive parse; unknown tags are preserved as `Other`
    pub fn parse(raw: &str) -> Self {
        match raw.to_ascii_uppercase().as_str() {
            "PENDING" => OrderTag::Pending,
            "APPROVED" => OrderTag::Approved,
            "WAITING_BIOMETRY" => OrderTag::WaitingBiometry,
            "MANUAL_REVIEW" => OrderTag::ManualReview,
            _ => OrderTag::Other(raw.to_string()),
        }
    }
}

impl From<String> for OrderTag {
    fn from(raw: String) -> Self {
        OrderTag::parse(&raw)
    }
}

impl From<OrderTag> for String {
    fn from(tag: OrderTag) -> Self {
        tag.as_str().to_string()
    }
}

impl fmt::Display for OrderTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Decision
// ============================================================================

/// Decision shown to the merchant for an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Decision {
    #[serde(rename = "aprovado")]
    Approved,
    #[serde(rename = "analise")]
    Analysis,
    #[serde(rename = "aguardando_biometria")]
    WaitingBiometry,
    #[serde(rename = "revisao_manual")]
    ManualReview,
}

impl Decision {
    pub const ALL: [Decision; 4] = [
        Decision::Approved,
        Decision::Analysis,
        Decision::WaitingBiometry,
        Decision::ManualReview,
    ];

    /// Key used in filter query strings
    pub fn key(&self) -> &'static str {
        match self {
            Decision::Approved => "aprovado",
            Decision::Analysis => "analise",
            Decision::WaitingBiometry => "aguardando_biometria",
            Decision::ManualReview => "revisao_manual",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Decision::ALL.into_iter().find(|d| d.key() == key)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Decision::Approved => "Aprovado",
            Decision::Analysis => "Em análise",
            Decision::WaitingBiometry => "Aguardando biometria",
            Decision::ManualReview => "Revisão Manual",
        }
    }

    pub fn badge(&self) -> BadgeVariant {
        match self {
            Decision::Approved => BadgeVariant::Success,
            Decision::Analysis => BadgeVariant::Info,
            Decision::WaitingBiometry => BadgeVariant::Warning,
            Decision::ManualReview => BadgeVariant::Danger,
        }
    }
}

impl From<&OrderTag> for Decision {
    fn from(tag: &OrderTag) -> Self {
        match tag {
            OrderTag::Approved => Decision::Approved,
            OrderTag::Pending => Decision::Analysis,
            OrderTag::WaitingBiometry => Decision::WaitingBiometry,
            // Anything unrecognised needs a human
            OrderTag::ManualReview | OrderTag::Other(_) => Decision::ManualReview,
        }
    }
}

// ============================================================================
// Decision Filter
// ============================================================================

/// The decision dropdown of the orders table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecisionFilter {
    #[default]
    All,
    Only(Decision),
}

impl DecisionFilter {
    /// Parse a query-string value; `all`, blank and unknown keys mean no filter
    pub fn parse(raw: &str) -> Self {
        match Decision::from_key(raw.trim()) {
            Some(decision) => DecisionFilter::Only(decision),
            None => DecisionFilter::All,
        }
    }

    pub fn matches(&self, decision: Decision) -> bool {
        match self {
            DecisionFilter::All => true,
            DecisionFilter::Only(wanted) => *wanted == decision,
        }
    }
}

#[cfg(test)]
pub(crate) fn sample_order(platform_order_id: &str, store_name: &str, tag: &str) -> Order {
    serde_json::from_value(serde_json::json!({
        "id": format!("ord-{}", platform_order_id),
        "shopId": "shop-1",
        "customerId": "cus-1",
        "platform": "shopify",
        "platformOrderId": platform_order_id,
        "customerScoreGrade": null,
        "items": ["Camiseta", "Boné"],
        "totalPriceCents": 15990,
        "currency": "BRL",
        "tag": tag,
        "status": "paid",
        "approvedBy": "LUMUS",
        "countryDestCode": "BR",
        "customer": {
            "name": "Maria Silva",
            "email": "maria@example.com",
            "phone": null,
            "platformCustomerId": 98765,
            "countryLast": "BR",
            "scoreGrade": "A",
            "chargebackCount": 0,
            "refundCount": 1,
            "ordersCount": 4,
            "hasBiometry": false
        },
        "riskResults": {
            "ip": "177.10.10.10",
            "ipContinent": "SA",
            "ipCountryCode": "BR",
            "ipCity": "São Paulo",
            "ipAsn": 28573,
            "vpnDetected": false,
            "proxyDetected": false,
            "proxyType": "none",
            "torDetected": false,
            "botDetected": false,
            "scorePenalties": ["new_device"],
            "scoreBonuses": ["returning_customer"],
            "biometryNeeded": false,
            "decision": "APPROVE"
        },
        "shop": { "name": store_name },
        "createdAt": "2025-11-13T20:04:41.009Z",
        "updatedAt": "2025-11-14T08:30:00.000Z"
    }))
    .expect("sample order is valid")
}
