use crate::export::ExportError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;

/// Application-wide error type for the HTTP surface
#[derive(Debug)]
pub enum AppError {
    // SSO hand-off errors
    SsoNotConfigured,
    MissingToken,
    TokenValidation(String),
    TokenExpired,

    // Backend errors surfaced through export routes
    Upstream(String),
    NotFound(String),

    // Validation errors
    ValidationError(String),

    // Configuration errors
    Configuration(String),

    // Document generation errors
    Export(ExportError),

    // Internal errors
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::SsoNotConfigured => write!(f, "SSO not configured"),
            AppError::MissingToken => write!(f, "Missing token"),
            AppError::TokenValidation(msg) => write!(f, "Token validation failed: {}", msg),
            AppError::TokenExpired => write!(f, "Token has expired"),
            AppError::Upstream(msg) => write!(f, "Backend request failed: {}", msg),
            AppError::NotFound(what) => write!(f, "{} not found", what),
            AppError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            AppError::Configuration(msg) => write!(f, "Configuration error: {}", msg),
            AppError::Export(e) => write!(f, "Export error: {}", e),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Configuration(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;
        match err.kind() {
            ErrorKind::ExpiredSignature => AppError::TokenExpired,
            ErrorKind::InvalidToken => AppError::TokenValidation("Invalid token".to_string()),
            _ => AppError::TokenValidation(err.to_string()),
        }
    }
}

impl From<ExportError> for AppError {
    fn from(err: ExportError) -> Self {
        AppError::Export(err)
    }
}

// Implement IntoResponse for Axum
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::SsoNotConfigured => {
                tracing::error!("SSO signing secret is not configured");
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
            AppError::MissingToken => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::TokenValidation(_) | AppError::TokenExpired => (
                StatusCode::UNAUTHORIZED,
                "Invalid or expired token".to_string(),
            ),
            AppError::Upstream(msg) => {
                tracing::warn!(error = %msg, "Backend request failed");
                (StatusCode::BAD_GATEWAY, msg.clone())
            }
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Configuration(_) => {
                tracing::error!("Configuration error: {:?}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::Export(_) => {
                tracing::error!("Export error: {:?}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to generate export".to_string(),
                )
            }
            AppError::Internal(_) => {
                tracing::error!("Internal error: {:?}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Result type alias for the application
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::SsoNotConfigured.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::MissingToken.into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::TokenExpired.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::Upstream("boom".to_string()).into_response().status(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[tokio::test]
    async fn test_error_body_shape() {
        let response = AppError::MissingToken.into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, json!({ "error": "Missing token" }));
    }

    #[test]
    fn test_jwt_error_mapping() {
        use jsonwebtoken::errors::{Error, ErrorKind};

        let expired: AppError = Error::from(ErrorKind::ExpiredSignature).into();
        assert!(matches!(expired, AppError::TokenExpired));

        let bad_sig: AppError = Error::from(ErrorKind::InvalidSignature).into();
        assert!(matches!(bad_sig, AppError::TokenValidation(_)));
    }
}
