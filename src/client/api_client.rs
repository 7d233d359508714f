// Shared HTTP client for the risk API

use crate::auth::cookies::API_TOKEN_COOKIE;
use crate::client::cookies::{extract_cookie, CookieSource};
use crate::config::ApiConfig;
use reqwest::{header::AUTHORIZATION, Method, RequestBuilder};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Errors raised while building the client. Request failures are not
/// represented here: the service layer turns them into values.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid API base URL {url}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// HTTP client bound to the risk API base URL.
///
/// Every request it creates re-reads the cookie source and, when an
/// `apiToken` cookie is present, carries `Authorization: Bearer <token>`.
/// Without the cookie the request still goes out; the backend decides.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    http: reqwest::Client,
    base_url: String,
    cookies: Arc<dyn CookieSource>,
}

impl ApiClient {
    /// Create a client from configuration
    pub fn new(config: &ApiConfig, cookies: Arc<dyn CookieSource>) -> Result<Self, ClientError> {
        let mut builder = reqwest::Client::builder();
        if config.timeout_seconds > 0 {
            builder = builder.timeout(Duration::from_secs(config.timeout_seconds));
        }

        Self::with_http(builder.build()?, &config.base_url, cookies)
    }

    /// Create a client around an existing `reqwest::Client`, sharing its
    /// connection pool.
    pub fn with_http(
        http: reqwest::Client,
        base_url: &str,
        cookies: Arc<dyn CookieSource>,
    ) -> Result<Self, ClientError> {
        reqwest::Url::parse(base_url).map_err(|e| ClientError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                http,
                base_url: base_url.trim_end_matches('/').to_string(),
                cookies,
            }),
        })
    }

    /// Same connection pool and base URL, different cookie context
    pub fn with_cookies(&self, cookies: Arc<dyn CookieSource>) -> Self {
        Self {
            inner: Arc::new(ApiClientInner {
                http: self.inner.http.clone(),
                base_url: self.inner.base_url.clone(),
                cookies,
            }),
        }
    }

    /// Underlying HTTP client, for requests outside the risk API such as
    /// report images
    pub fn http(&self) -> &reqwest::Client {
        &self.inner.http
    }

    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Bearer token currently available from the cookie source
    pub fn bearer_token(&self) -> Option<String> {
        self.inner
            .cookies
            .raw_cookies()
            .and_then(|raw| extract_cookie(&raw, API_TOKEN_COOKIE))
    }

    /// Absolute URL for an API path such as `/orders`
    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.inner.base_url, path)
        } else {
            format!("{}/{}", self.inner.base_url, path)
        }
    }

    /// Start a request, attaching the bearer token when one is available
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.inner.http.request(method.clone(), self.url(path));

        match self.bearer_token() {
            Some(token) => builder.header(AUTHORIZATION, format!("Bearer {}", token)),
            None => {
                tracing::debug!(%method, path, "No apiToken cookie, sending request unauthenticated");
                builder
            }
        }
    }

    pub fn get(&self, path: &str) -> RequestBuilder {
        self.request(Method::GET, path)
    }

    pub fn post(&self, path: &str) -> RequestBuilder {
        self.request(Method::POST, path)
    }

    pub fn put(&self, path: &str) -> RequestBuilder {
        self.request(Method::PUT, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::cookies::{NoCookies, SharedCookies, StaticCookies};
    use crate::test_support::FakeBackend;
    use axum::{http::HeaderMap, routing::get, Json, Router};
    use serde_json::json;

    fn client_with(cookies: Arc<dyn CookieSource>) -> ApiClient {
        ApiClient::with_http(reqwest::Client::new(), "http://localhost:4000/", cookies).unwrap()
    }

    #[test]
    fn test_bearer_attached_from_cookie() {
        let client = client_with(Arc::new(StaticCookies::new("theme=dark; apiToken=XYZ")));
        let request = client.get("/orders").build().unwrap();

        assert_eq!(request.url().as_str(), "http://localhost:4000/orders");
        assert_eq!(
            request.headers().get(AUTHORIZATION).unwrap(),
            "Bearer XYZ"
        );
    }

    #[test]
    fn test_no_cookie_no_header() {
        let client = client_with(Arc::new(NoCookies));
        let request = client.get("/orders").build().unwrap();
        assert!(request.headers().get(AUTHORIZATION).is_none());

        let client = client_with(Arc::new(StaticCookies::new("theme=dark")));
        let request = client.put("/tickets").build().unwrap();
        assert!(request.headers().get(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_cookie_read_per_request() {
        let jar = Arc::new(SharedCookies::new());
        let client = client_with(jar.clone());

        let before = client.get("/orders").build().unwrap();
        assert!(before.headers().get(AUTHORIZATION).is_none());

        jar.set("apiToken=late-token");
        let after = client.get("/orders").build().unwrap();
        assert_eq!(
            after.headers().get(AUTHORIZATION).unwrap(),
            "Bearer late-token"
        );
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let result = ApiClient::with_http(reqwest::Client::new(), "::nope::", Arc::new(NoCookies));
        assert!(matches!(result, Err(ClientError::InvalidBaseUrl { .. })));
    }

    #[test]
    fn test_relative_path_joined() {
        let client = client_with(Arc::new(NoCookies));
        assert_eq!(client.url("tickets/7"), "http://localhost:4000/tickets/7");
    }

    #[tokio::test]
    async fn test_header_reaches_backend() {
        let backend = FakeBackend::spawn(Router::new().route(
            "/echo",
            get(|headers: HeaderMap| async move {
                let auth = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string);
                Json(json!({ "authorization": auth }))
            }),
        ))
        .await;

        let client = backend.client(Arc::new(StaticCookies::new("apiToken=abc.def")));
        let body: serde_json::Value = client.get("/echo").send().await.unwrap().json().await.unwrap();
        assert_eq!(body["authorization"], "Bearer abc.def");

        let anonymous = client.with_cookies(Arc::new(NoCookies));
        let body: serde_json::Value = anonymous
            .get("/echo")
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert!(body["authorization"].is_null());
    }
}
