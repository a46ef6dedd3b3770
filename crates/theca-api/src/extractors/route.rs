//! Path/method labels for metrics recorded inside handlers.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{Method, Request, Uri};

use theca_metrics::Metrics;

/// The raw URI path and method of the current request.
///
/// The metrics middleware runs before routing, so both it and the handlers
/// label by the path as sent. Handler and middleware series stay joinable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteLabels {
    /// URI path without the query string.
    pub path: String,
    /// HTTP method.
    pub method: String,
}

impl RouteLabels {
    /// Reads labels from a full request, for middleware.
    pub fn from_request<B>(req: &Request<B>) -> Self {
        Self::build(req.uri(), req.method())
    }

    fn build(uri: &Uri, method: &Method) -> Self {
        Self {
            path: uri.path().to_string(),
            method: method.as_str().to_string(),
        }
    }

    /// Counts a named error against this route.
    pub fn record_error(&self, metrics: &Metrics, error_name: &str) {
        metrics.increment_error_counter(error_name, &self.path, &self.method);
    }
}

impl<S> FromRequestParts<S> for RouteLabels
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::build(&parts.uri, &parts.method))
    }
}
