use crate::{
    api::{auth, exports, health},
    auth::SsoVerifier,
    client::ApiClient,
    config::Config,
    observability::{HealthChecker, MetricsRecorder},
};
use axum::{
    extract::{FromRef, MatchedPath, Request},
    middleware::{self, Next},
    response::Response,
    routing::get,
    Router,
};
use std::sync::Arc;
use std::time::Instant;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// `None` while no SSO secret is configured; `/auth` then answers 500
    pub verifier: Option<Arc<SsoVerifier>>,
    /// Client without cookies; per-request clients derive from it
    pub api_client: ApiClient,
    pub health_checker: Arc<HealthChecker>,
}

impl FromRef<AppState> for Arc<HealthChecker> {
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.health_checker)
    }
}

impl AppState {
    pub fn new(config: Arc<Config>, api_client: ApiClient) -> Self {
        let verifier = config
            .jwt_secret()
            .and_then(|secret| SsoVerifier::new(secret).ok())
            .map(Arc::new);
        let health_checker = Arc::new(HealthChecker::new(Arc::clone(&config)));

        Self {
            config,
            verifier,
            api_client,
            health_checker,
        }
    }
}

pub fn create_router(config: Arc<Config>, api_client: ApiClient) -> Router {
    let state = AppState::new(config, api_client);

    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health endpoints
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .route("/metrics", get(health::metrics))
        // SSO hand-off
        .route("/auth", get(auth::sso_exchange))
        // Report downloads
        .route("/exports/orders.csv", get(exports::orders_csv))
        .route("/exports/orders/:order_id/pdf", get(exports::order_pdf))
        // Add middleware
        .layer(middleware::from_fn(track_http_metrics))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Add state
        .with_state(state)
}

/// Count requests and latency per matched route
async fn track_http_metrics(request: Request, next: Next) -> Response {
    let started = Instant::now();
    let method = request.method().to_string();
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|matched| matched.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(request).await;

    MetricsRecorder::record_http_request(&method, &path, response.status().as_u16());
    MetricsRecorder::record_http_duration(&method, &path, started.elapsed().as_secs_f64());
    response
}
