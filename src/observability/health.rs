use crate::config::Config;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub checks: HealthChecks,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthChecks {
    pub sso: ComponentStatus,
    pub risk_api: ComponentStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentStatus {
    pub status: String,
    pub message: Option<String>,
}

impl ComponentStatus {
    fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            message: None,
        }
    }

    fn unknown() -> Self {
        Self {
            status: "unknown".to_string(),
            message: None,
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: Some(message.into()),
        }
    }
}

/// Health probes. The dashboard holds no connections of its own, so
/// readiness only reflects configuration.
pub struct HealthChecker {
    config: Arc<Config>,
}

impl HealthChecker {
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }

    /// Liveness check - is the service running?
    pub async fn liveness(&self) -> HealthStatus {
        HealthStatus {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            checks: HealthChecks {
                sso: ComponentStatus::unknown(),
                risk_api: ComponentStatus::unknown(),
            },
        }
    }

    /// Readiness check - can the service handle requests?
    pub async fn readiness(&self) -> HealthStatus {
        let sso = self.check_sso();
        let risk_api = self.check_risk_api();

        let overall_status = if sso.status == "ok" && risk_api.status == "ok" {
            "ok"
        } else {
            "degraded"
        };

        HealthStatus {
            status: overall_status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            checks: HealthChecks { sso, risk_api },
        }
    }

    fn check_sso(&self) -> ComponentStatus {
        match self.config.jwt_secret() {
            Some(_) => ComponentStatus::ok(),
            None => ComponentStatus::error("SSO not configured"),
        }
    }

    fn check_risk_api(&self) -> ComponentStatus {
        match reqwest::Url::parse(&self.config.api.base_url) {
            Ok(_) => ComponentStatus::ok(),
            Err(e) => ComponentStatus::error(format!("Invalid API base URL: {}", e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_readiness_degraded_without_secret() {
        let checker = HealthChecker::new(Arc::new(Config::default()));
        let status = checker.readiness().await;
        assert_eq!(status.status, "degraded");
        assert_eq!(status.checks.sso.status, "error");
        assert_eq!(status.checks.risk_api.status, "ok");
    }

    #[tokio::test]
    async fn test_readiness_ok_with_secret() {
        let mut config = Config::default();
        config.auth.jwt_secret = Some("shared-secret".to_string());
        let checker = HealthChecker::new(Arc::new(config));
        assert_eq!(checker.readiness().await.status, "ok");
        assert_eq!(checker.liveness().await.status, "ok");
    }
}
