//! Push-based observability for the predictor
//!
//! Metrics are only pushed out: periodic JSON snapshots on stdout and a
//! Prometheus text rendering on demand. Nothing listens for requests.

pub mod latency_tracker;
pub mod metrics;
pub mod reporter;

pub use latency_tracker::LatencyGuard;
pub use metrics::Metrics;
pub use reporter::MetricsReporter;
