// Merchant stores and their fraud policy

use super::BadgeVariant;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Merchant Store
// ============================================================================

/// A shop connected to the merchant account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MerchantStore {
    pub id: String,
    pub shop_id: String,
    pub name: String,
    pub shop_domain: String,
    pub platform: Platform,
    pub status: StoreStatus,
    pub currency: String,
    #[serde(default)]
    pub shop_contact_email: Option<String>,
    #[serde(default)]
    pub shop_policy: Option<ShopPolicy>,
    pub created_at: DateTime<Utc>,
}

/// Fraud-prevention thresholds attached one-to-one to a store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopPolicy {
    #[serde(default)]
    pub id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub blocked_countries_origin: Vec<String>,
    #[serde(default)]
    pub blocked_countries_destination: Vec<String>,
    pub max_chargebacks_per_customer: u32,
    pub max_refunds_per_customer: u32,
    pub biometric_min_order_amount: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ============================================================================
// Policy update
// ============================================================================

/// Body of `PUT /shop-policy`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStorePolicyRequest {
    pub shop_id: String,
    pub title: String,
    pub blocked_countries_destination: Vec<String>,
    pub blocked_countries_origin: Vec<String>,
    pub max_chargebacks_per_customer: i64,
    pub max_refunds_per_customer: i64,
    pub biometric_min_order_amount: f64,
}

impl UpdateStorePolicyRequest {
    /// Start an edit from the policy currently attached to a store
    pub fn from_policy(shop_id: &str, policy: &ShopPolicy) -> Self {
        Self {
            shop_id: shop_id.to_string(),
            title: policy.title.clone(),
            blocked_countries_destination: policy.blocked_countries_destination.clone(),
            blocked_countries_origin: policy.blocked_countries_origin.clone(),
            max_chargebacks_per_customer: i64::from(policy.max_chargebacks_per_customer),
            max_refunds_per_customer: i64::from(policy.max_refunds_per_customer),
            biometric_min_order_amount: policy.biometric_min_order_amount,
        }
    }

    /// Form rules: a shop and a title are required, thresholds are non-negative
    pub fn validate(&self) -> Result<(), String> {
        if self.shop_id.trim().is_empty() {
            return Err("ID da loja é obrigatório".to_string());
        }
        if self.title.trim().is_empty() {
            return Err("O título da política é obrigatório".to_string());
        }
        if self.max_chargebacks_per_customer < 0 {
            return Err("O limite de chargebacks não pode ser negativo".to_string());
        }
        if self.max_refunds_per_customer < 0 {
            return Err("O limite de reembolsos não pode ser negativo".to_string());
        }
        if !self.biometric_min_order_amount.is_finite() || self.biometric_min_order_amount < 0.0 {
            return Err("O valor mínimo para biometria não pode ser negativo".to_string());
        }
        Ok(())
    }
}

// ============================================================================
// Store Status
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StoreStatus {
    Active,
    Paused,
    Failed,
    Other(String),
}

impl StoreStatus {
    pub fn as_str(&self) -> &str {
        match self {
            StoreStatus::Active => "active",
            StoreStatus::Paused => "paused",
            StoreStatus::Failed => "failed",
            StoreStatus::Other(raw) => raw,
        }
    }

    pub fn badge(&self) -> BadgeVariant {
        match self {
            StoreStatus::Active => BadgeVariant::Success,
            StoreStatus::Paused => BadgeVariant::Warning,
            StoreStatus::Failed => BadgeVariant::Danger,
            StoreStatus::Other(_) => BadgeVariant::Neutral,
        }
    }
}

impl From<String> for StoreStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "active" => StoreStatus::Active,
            "paused" => StoreStatus::Paused,
            "failed" => StoreStatus::Failed,
            _ => StoreStatus::Other(raw),
        }
    }
}

impl From<StoreStatus> for String {
    fn from(status: StoreStatus) -> Self {
        status.as_str().to_string()
    }
}

// ============================================================================
// Platform
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Platform {
    Shopify,
    Nuvemshop,
    Magento,
    Wix,
    WooCommerce,
    Other(String),
}

impl Platform {
    pub fn as_str(&self) -> &str {
        match self {
            Platform::Shopify => "shopify",
            Platform::Nuvemshop => "nuvemshop",
            Platform::Magento => "magento",
            Platform::Wix => "wix",
            Platform::WooCommerce => "woocommerce",
            Platform::Other(raw) => raw,
        }
    }

    /// Accent colour used for the platform chip
    pub fn accent(&self) -> &'static str {
        match self {
            Platform::Shopify => "rose",
            Platform::Nuvemshop => "blue",
            Platform::Magento => "purple",
            Platform::Wix => "orange",
            Platform::WooCommerce => "purple",
            Platform::Other(_) => "default",
        }
    }
}

impl From<String> for Platform {
    fn from(raw: String) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "shopify" => Platform::Shopify,
            "nuvemshop" => Platform::Nuvemshop,
            "magento" => Platform::Magento,
            "wix" => Platform::Wix,
            "woocommerce" => Platform::WooCommerce,
            _ => Platform::Other(raw),
        }
    }
}

impl From<Platform> for String {
    fn from(platform: Platform) -> Self {
        platform.as_str().to_string()
    }
}

#[cfg(test)]
pub(crate) fn sample_store(id: &str, name: &str) -> MerchantStore {
    serde_json::from_value(serde_json::json!({
        "id": id,
        "shopId": format!("shop-{}", id),
        "name": name,
        "shopDomain": format!("{}.myshopify.com", id),
        "platform": "Shopify",
        "status": "active",
        "currency": "BRL",
        "shopPolicy": {
            "id": format!("pol-{}", id),
            "title": "Padrão",
            "blockedCountriesOrigin": ["RU"],
            "blockedCountriesDestination": [],
            "maxChargebacksPerCustomer": 2,
            "maxRefundsPerCustomer": 3,
            "biometricMinOrderAmount": 500.0,
            "createdAt": "2025-10-01T12:00:00Z",
            "updatedAt": "2025-10-02T12:00:00Z"
        },
        "createdAt": "2025-10-01T12:00:00Z"
    }))
    .expect("sample store is valid")
}
