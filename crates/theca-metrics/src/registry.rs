//! The metric set shared by the request pipeline and the admin listener.

use theca_core::config::MetricsConfig;

use crate::families::histogram::exponential_buckets;
use crate::families::{CounterVec, GaugeVec, HistogramVec};

/// Every metric family the service exports.
///
/// Constructed once at startup and shared as `Arc<Metrics>`.
#[derive(Debug)]
pub struct Metrics {
    request_total: CounterVec,
    error_total: CounterVec,
    requests_per_second: GaugeVec,
    request_duration_seconds: HistogramVec,
    info_total: CounterVec,
}

impl Metrics {
    /// Creates the families under `namespace` (e.g. `theca_request_total`).
    pub fn new(namespace: &str) -> Self {
        let name = |suffix: &str| {
            if namespace.is_empty() {
                suffix.to_string()
            } else {
                format!("{namespace}_{suffix}")
            }
        };

        Self {
            request_total: CounterVec::new(
                name("request_total"),
                "requests total counter",
                &["path", "method", "status"],
            ),
            error_total: CounterVec::new(
                name("error_total"),
                "errors total counter",
                &["error_name", "path", "method"],
            ),
            requests_per_second: GaugeVec::new(
                name("requests_per_second"),
                "Current requests per second rate",
                &["path", "method"],
            ),
            request_duration_seconds: HistogramVec::new(
                name("request_duration_seconds"),
                "Request duration in seconds",
                &["path", "method"],
                exponential_buckets(0.001, 2.0, 15),
            ),
            info_total: CounterVec::new(name("info_total"), "info total counter", &["info_name"]),
        }
    }

    /// Creates the families from configuration.
    pub fn from_config(config: &MetricsConfig) -> Self {
        Self::new(&config.namespace)
    }

    /// Count a finished request.
    pub fn increment_request_counter(&self, path: &str, method: &str, status: &str) {
        self.request_total.inc(&[path, method, status]);
    }

    /// Count an error by name.
    pub fn increment_error_counter(&self, error_name: &str, path: &str, method: &str) {
        self.error_total.inc(&[error_name, path, method]);
    }

    /// Observe a request duration in seconds.
    pub fn record_request_duration(&self, path: &str, method: &str, seconds: f64) {
        self.request_duration_seconds.observe(&[path, method], seconds);
    }

    /// Count a lifecycle event such as `server_started` or `user_registered`.
    pub fn record_info(&self, info_name: &str) {
        self.info_total.inc(&[info_name]);
    }

    /// Sets the RPS gauge for one route.
    pub fn set_rps(&self, path: &str, method: &str, rps: f64) {
        self.requests_per_second.set(&[path, method], rps);
    }

    /// Current RPS gauge value; zero when never set.
    pub fn get_rps(&self, path: &str, method: &str) -> f64 {
        self.requests_per_second.get(&[path, method])
    }

    /// Reads a `request_total` series.
    pub fn request_count(&self, path: &str, method: &str, status: &str) -> u64 {
        self.request_total.get(&[path, method, status])
    }

    /// Reads an `error_total` series.
    pub fn error_count(&self, error_name: &str, path: &str, method: &str) -> u64 {
        self.error_total.get(&[error_name, path, method])
    }

    /// Reads the observation count of a duration series.
    pub fn duration_count(&self, path: &str, method: &str) -> u64 {
        self.request_duration_seconds.count(&[path, method])
    }

    /// Prometheus text exposition of every family.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.request_total.render(&mut out);
        self.error_total.render(&mut out);
        self.requests_per_second.render(&mut out);
        self.request_duration_seconds.render(&mut out);
        self.info_total.render(&mut out);
        out
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::from_config(&MetricsConfig::default())
    }
}
