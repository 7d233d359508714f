use once_cell::sync::Lazy;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, HistogramVec, IntCounterVec, TextEncoder,
};

// Metrics registry
static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "http_requests_total",
        "Total number of HTTP requests",
        &["method", "path", "status"]
    )
    .unwrap()
});

static HTTP_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "http_request_duration_seconds",
        "HTTP request latency in seconds",
        &["method", "path"],
        vec![0.001, 0.005, 0.010, 0.050, 0.100, 0.500, 1.0, 5.0]
    )
    .unwrap()
});

static SSO_EXCHANGES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "sso_exchanges_total",
        "Total number of SSO token exchanges",
        &["outcome"]
    )
    .unwrap()
});

static BACKEND_CALLS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "backend_calls_total",
        "Total number of risk API calls",
        &["endpoint", "outcome"]
    )
    .unwrap()
});

static EXPORTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "exports_total",
        "Total number of generated report files",
        &["format", "outcome"]
    )
    .unwrap()
});

static EXPORT_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "export_duration_seconds",
        "Report generation latency in seconds",
        &["format"],
        vec![0.005, 0.010, 0.050, 0.100, 0.500, 1.0, 3.0, 5.0]
    )
    .unwrap()
});

pub struct MetricsRecorder;

impl MetricsRecorder {
    pub fn record_http_request(method: &str, path: &str, status: u16) {
        HTTP_REQUESTS_TOTAL
            .with_label_values(&[method, path, &status.to_string()])
            .inc();
    }

    pub fn record_http_duration(method: &str, path: &str, duration: f64) {
        HTTP_REQUEST_DURATION
            .with_label_values(&[method, path])
            .observe(duration);
    }

    /// `outcome` is one of `success`, `missing_token`, `invalid_token`, `not_configured`
    pub fn record_sso_exchange(outcome: &str) {
        SSO_EXCHANGES_TOTAL.with_label_values(&[outcome]).inc();
    }

    pub fn record_backend_call(endpoint: &str, outcome: &str) {
        BACKEND_CALLS_TOTAL
            .with_label_values(&[endpoint, outcome])
            .inc();
    }

    pub fn record_export(format: &str, outcome: &str) {
        EXPORTS_TOTAL.with_label_values(&[format, outcome]).inc();
    }

    pub fn record_export_duration(format: &str, duration: f64) {
        EXPORT_DURATION.with_label_values(&[format]).observe(duration);
    }

    /// Export all metrics in Prometheus format
    pub fn export() -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let metric_families = prometheus::gather();
        encoder.encode_to_string(&metric_families)
    }
}
