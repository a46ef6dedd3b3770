//! Request metrics interceptor.
//!
//! Every public request is ingested into the RPS window before the handler
//! runs. Counting happens in a drop guard, so a request whose future is
//! dropped mid-flight (client gone, upstream timeout) is still recorded,
//! with status `499`.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;

use theca_metrics::{Metrics, rps};

use crate::extractors::RouteLabels;
use crate::state::AppState;

/// Status recorded for requests that never produced a response.
pub const CLIENT_CLOSED_REQUEST: u16 = 499;

/// Records RPS, request count, duration, and HTTP errors.
pub async fn track_metrics(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let labels = RouteLabels::from_request(&request);
    state.rps.record(&labels.path, &labels.method, rps::now());

    let mut guard = RequestGuard::new(Arc::clone(&state.metrics), labels);
    let response = next.run(request).await;
    guard.status = Some(response.status().as_u16());

    response
}

struct RequestGuard {
    metrics: Arc<Metrics>,
    labels: RouteLabels,
    start: Instant,
    status: Option<u16>,
}

impl RequestGuard {
    fn new(metrics: Arc<Metrics>, labels: RouteLabels) -> Self {
        Self {
            metrics,
            labels,
            start: Instant::now(),
            status: None,
        }
    }
}

impl Drop for RequestGuard {
    fn drop(&mut self) {
        let status = self.status.unwrap_or(CLIENT_CLOSED_REQUEST);
        let RouteLabels { path, method } = &self.labels;

        self.metrics
            .increment_request_counter(path, method, &status.to_string());
        self.metrics
            .record_request_duration(path, method, self.start.elapsed().as_secs_f64());

        if status >= 400 {
            self.metrics
                .increment_error_counter(&format!("http_{status}"), path, method);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels() -> RouteLabels {
        RouteLabels {
            path: "/v1/login".into(),
            method: "POST".into(),
        }
    }

    #[test]
    fn test_completed_request_is_counted() {
        let metrics = Arc::new(Metrics::new("t"));
        {
            let mut guard = RequestGuard::new(Arc::clone(&metrics), labels());
            guard.status = Some(200);
        }
        assert_eq!(metrics.request_count("/v1/login", "POST", "200"), 1);
        assert_eq!(metrics.duration_count("/v1/login", "POST"), 1);
        assert_eq!(metrics.error_count("http_200", "/v1/login", "POST"), 0);
    }

    #[test]
    fn test_dropped_request_counts_as_499() {
        let metrics = Arc::new(Metrics::new("t"));
        drop(RequestGuard::new(Arc::clone(&metrics), labels()));
        assert_eq!(metrics.request_count("/v1/login", "POST", "499"), 1);
        assert_eq!(metrics.error_count("http_499", "/v1/login", "POST"), 1);
    }

    #[test]
    fn test_error_status_counted() {
        let metrics = Arc::new(Metrics::new("t"));
        {
            let mut guard = RequestGuard::new(Arc::clone(&metrics), labels());
            guard.status = Some(401);
        }
        assert_eq!(metrics.error_count("http_401", "/v1/login", "POST"), 1);
    }
}
