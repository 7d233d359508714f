// SSO hand-off endpoint

use crate::api::routes::AppState;
use crate::auth::{
    cookies::{api_token_cookie, merchant_id_cookie},
    Session,
};
use crate::errors::{AppError, Result};
use crate::observability::MetricsRecorder;
use axum::{
    extract::{Query, State},
    http::{header::LOCATION, StatusCode},
    response::IntoResponse,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct AuthQuery {
    #[serde(default)]
    pub token: Option<String>,
}

/// GET /auth?token=<jwt>
///
/// Exchange a platform-issued SSO token for the dashboard session cookies
/// and send the browser to `/`.
pub async fn sso_exchange(
    State(state): State<AppState>,
    Query(query): Query<AuthQuery>,
    jar: CookieJar,
) -> Result<impl IntoResponse> {
    let result = establish_session(&state, query.token.as_deref());

    let outcome = match &result {
        Ok(_) => "success",
        Err(AppError::SsoNotConfigured) => "not_configured",
        Err(AppError::MissingToken) => "missing_token",
        Err(_) => "invalid_token",
    };
    MetricsRecorder::record_sso_exchange(outcome);

    let session = result?;
    tracing::info!(merchant_id = %session.merchant_id, "SSO session established");

    let secure = state.config.environment.production;
    let jar = jar
        .add(merchant_id_cookie(&session, secure))
        .add(api_token_cookie(
            &session,
            state.config.auth.token_max_age_days,
            secure,
        ));

    Ok((StatusCode::FOUND, jar, [(LOCATION, "/")]))
}

fn establish_session(state: &AppState, token: Option<&str>) -> Result<Session> {
    let verifier = state.verifier.as_ref().ok_or(AppError::SsoNotConfigured)?;
    let token = token
        .filter(|token| !token.is_empty())
        .ok_or(AppError::MissingToken)?;

    let claims = verifier.verify(token).map_err(|e| {
        tracing::warn!(error = %e, "Rejected SSO token");
        e
    })?;

    Ok(Session::from_verified(
        &claims,
        token,
        state.config.auth.token_max_age_days,
    ))
}

#[cfg(test)]
mod tests {
    use crate::api::create_router;
    use crate::auth::sso::test_claims;
    use crate::auth::SsoVerifier;
    use crate::config::Config;
    use crate::test_support::unreachable_client;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        Router,
    };
    use std::sync::Arc;
    use tower::ServiceExt;

    const SECRET: &str = "dashboard-test-secret";

    fn router(secret: Option<&str>, production: bool) -> Router {
        let mut config = Config::default();
        config.auth.jwt_secret = secret.map(str::to_string);
        config.environment.production = production;
        create_router(Arc::new(config), unreachable_client())
    }

    async fn get(router: Router, uri: &str) -> axum::response::Response {
        router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn error_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn set_cookies(response: &axum::response::Response) -> Vec<String> {
        response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect()
    }

    #[tokio::test]
    async fn test_unconfigured_secret_is_500() {
        let response = get(router(None, false), "/auth?token=abc").await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            error_body(response).await,
            serde_json::json!({ "error": "SSO not configured" })
        );
    }

    #[tokio::test]
    async fn test_missing_token_is_400() {
        for uri in ["/auth", "/auth?token="] {
            let response = get(router(Some(SECRET), false), uri).await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            assert_eq!(
                error_body(response).await,
                serde_json::json!({ "error": "Missing token" })
            );
        }
    }

    #[tokio::test]
    async fn test_bad_or_expired_token_is_401() {
        let other = SsoVerifier::new("some-other-secret").unwrap();
        let forged = other.sign(&test_claims("merchant-1", 600));
        let ours = SsoVerifier::new(SECRET).unwrap();
        let expired = ours.sign(&test_claims("merchant-1", -60));
        let anonymous = ours.sign(&test_claims("", 600));

        for token in [forged.as_str(), expired.as_str(), anonymous.as_str(), "garbage"] {
            let response = get(router(Some(SECRET), false), &format!("/auth?token={}", token)).await;
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "token {}", token);
            assert!(set_cookies(&response).is_empty());
            assert_eq!(
                error_body(response).await,
                serde_json::json!({ "error": "Invalid or expired token" })
            );
        }
    }

    #[tokio::test]
    async fn test_valid_token_sets_cookies_and_redirects() {
        let token = SsoVerifier::new(SECRET)
            .unwrap()
            .sign(&test_claims("merchant-42", 600));

        let response = get(router(Some(SECRET), false), &format!("/auth?token={}", token)).await;
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers()[header::LOCATION], "/");

        let cookies = set_cookies(&response);
        let merchant = cookies.iter().find(|c| c.starts_with("merchantId=")).unwrap();
        assert!(merchant.starts_with("merchantId=merchant-42;"));
        assert!(merchant.contains("HttpOnly"));
        assert!(!merchant.contains("Max-Age"));

        let api_token = cookies.iter().find(|c| c.starts_with("apiToken=")).unwrap();
        assert!(api_token.starts_with(&format!("apiToken={};", token)));
        assert!(!api_token.contains("HttpOnly"));
        assert!(api_token.contains("Max-Age=2592000"));
        assert!(!api_token.contains("Secure"));
    }

    #[tokio::test]
    async fn test_production_cookies_are_secure() {
        let token = SsoVerifier::new(SECRET)
            .unwrap()
            .sign(&test_claims("merchant-42", 600));

        let response = get(router(Some(SECRET), true), &format!("/auth?token={}", token)).await;
        assert_eq!(response.status(), StatusCode::FOUND);
        assert!(set_cookies(&response).iter().all(|c| c.contains("Secure")));
    }
}
