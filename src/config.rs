use crate::errors::{AppError, Result};
use serde::Deserialize;
use std::env;

/// Legacy variable names still honoured by deployments of the dashboard.
const LEGACY_JWT_SECRET_VAR: &str = "DASHBOARD_JWT_SECRET";
const LEGACY_API_URL_VAR: &str = "LUMUS_API_URL";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub api: ApiConfig,
    pub environment: EnvironmentConfig,
    pub export: ExportConfig,
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Clone, Deserialize)]
pub struct AuthConfig {
    /// Shared secret used to verify SSO tokens. The `/auth` endpoint refuses
    /// to work while this is unset.
    #[serde(default)]
    pub jwt_secret: Option<String>,
    pub token_max_age_days: i64,
}

// Keeps the secret out of `Configuration loaded` log lines.
impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &self.jwt_secret.as_ref().map(|_| "<redacted>"))
            .field("token_max_age_days", &self.token_max_age_days)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    /// Per-request timeout in seconds, 0 leaves reqwest's default.
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EnvironmentConfig {
    /// Production deployments mark cookies `Secure`.
    pub production: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    #[serde(default)]
    pub logo_url: Option<String>,
    pub logo_timeout_ms: u64,
    /// Offset applied when printing backend timestamps (São Paulo by default).
    pub utc_offset_minutes: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObservabilityConfig {
    pub log_level: String,
    pub log_format: String,
    pub metrics_enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
            },
            auth: AuthConfig {
                jwt_secret: None,
                token_max_age_days: 30,
            },
            api: ApiConfig {
                base_url: "http://localhost:4000".to_string(),
                timeout_seconds: 0,
            },
            environment: EnvironmentConfig { production: false },
            export: ExportConfig {
                logo_url: None,
                logo_timeout_ms: 3000,
                utc_offset_minutes: -180,
            },
            observability: ObservabilityConfig {
                log_level: "info".to_string(),
                log_format: "pretty".to_string(),
                metrics_enabled: true,
            },
        }
    }
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        let environment =
            env::var("RISK_DASHBOARD_ENV").unwrap_or_else(|_| "development".to_string());
        let defaults = Config::default();

        let config = config::Config::builder()
            .set_default("server.host", defaults.server.host)?
            .set_default("server.port", i64::from(defaults.server.port))?
            .set_default("auth.token_max_age_days", defaults.auth.token_max_age_days)?
            .set_default("api.base_url", defaults.api.base_url)?
            .set_default("api.timeout_seconds", defaults.api.timeout_seconds as i64)?
            .set_default("environment.production", environment == "production")?
            .set_default("export.logo_timeout_ms", defaults.export.logo_timeout_ms as i64)?
            .set_default(
                "export.utc_offset_minutes",
                i64::from(defaults.export.utc_offset_minutes),
            )?
            .set_default("observability.log_level", defaults.observability.log_level)?
            .set_default(
                "observability.log_format",
                defaults.observability.log_format,
            )?
            .set_default(
                "observability.metrics_enabled",
                defaults.observability.metrics_enabled,
            )?
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(
                config::File::with_name(&format!("config/{}", environment)).required(false),
            )
            // e.g., RISK_DASHBOARD__SERVER__PORT=8080
            .add_source(
                config::Environment::with_prefix("RISK_DASHBOARD")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("auth.jwt_secret", env::var(LEGACY_JWT_SECRET_VAR).ok())?
            .set_override_option("api.base_url", env::var(LEGACY_API_URL_VAR).ok())?
            .build()?;

        config.try_deserialize().map_err(AppError::from)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(AppError::Configuration("Invalid port number".to_string()));
        }

        if reqwest::Url::parse(&self.api.base_url).is_err() {
            return Err(AppError::Configuration(format!(
                "API base URL is not a valid URL: {}",
                self.api.base_url
            )));
        }

        if self.auth.token_max_age_days <= 0 {
            return Err(AppError::Configuration(
                "Token max age must be at least one day".to_string(),
            ));
        }

        if !matches!(self.observability.log_format.as_str(), "json" | "pretty") {
            return Err(AppError::Configuration(format!(
                "Unknown log format: {}",
                self.observability.log_format
            )));
        }

        if !(-14 * 60..=14 * 60).contains(&self.export.utc_offset_minutes) {
            return Err(AppError::Configuration(
                "Export UTC offset must be within +/-14 hours".to_string(),
            ));
        }

        Ok(())
    }

    /// The SSO signing secret, if one is configured and non-blank.
    pub fn jwt_secret(&self) -> Option<&str> {
        self.auth
            .jwt_secret
            .as_deref()
            .filter(|secret| !secret.trim().is_empty())
    }
}
