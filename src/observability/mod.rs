// Tracing, Prometheus metrics and health probes

pub mod health;
pub mod metrics;
pub mod tracing;

pub use health::{HealthChecker, HealthStatus};
pub use metrics::MetricsRecorder;
pub use tracing::init_tracing;
