//! # Request Metrics
//!
//! In-process atomic counters, incremented by [`metrics_middleware`] and
//! exposed in Prometheus text format at `GET /metrics`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::extract::Request;
use axum::http::header;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Extension;

/// Shared metrics state.
#[derive(Debug, Clone, Default)]
pub struct ApiMetrics {
    requests: Arc<AtomicU64>,
    client_errors: Arc<AtomicU64>,
    server_errors: Arc<AtomicU64>,
}

impl ApiMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requests(&self) -> u64 {
        self.requests.load(Ordering::Relaxed)
    }

    /// Responses with a 4xx status.
    pub fn client_errors(&self) -> u64 {
        self.client_errors.load(Ordering::Relaxed)
    }

    /// Responses with a 5xx status.
    pub fn server_errors(&self) -> u64 {
        self.server_errors.load(Ordering::Relaxed)
    }

    fn record(&self, response: &Response) {
        self.requests.fetch_add(1, Ordering::Relaxed);
        let status = response.status();
        if status.is_client_error() {
            self.client_errors.fetch_add(1, Ordering::Relaxed);
        } else if status.is_server_error() {
            self.server_errors.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Prometheus text exposition of the counters.
    pub fn render(&self) -> String {
        format!(
            "# HELP booking_api_requests_total HTTP requests served.\n\
             # TYPE booking_api_requests_total counter\n\
             booking_api_requests_total {}\n\
             # HELP booking_api_responses_errors_total HTTP error responses by class.\n\
             # TYPE booking_api_responses_errors_total counter\n\
             booking_api_responses_errors_total{{class=\"4xx\"}} {}\n\
             booking_api_responses_errors_total{{class=\"5xx\"}} {}\n",
            self.requests(),
            self.client_errors(),
            self.server_errors(),
        )
    }
}

/// Middleware that counts requests and error responses.
pub async fn metrics_middleware(request: Request, next: Next) -> Response {
    let metrics = request.extensions().get::<ApiMetrics>().cloned();

    let response = next.run(request).await;

    if let Some(m) = metrics {
        m.record(&response);
    }

    response
}

/// GET /metrics: Counter snapshot.
pub async fn render_metrics(Extension(metrics): Extension<ApiMetrics>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        metrics.render(),
    )
}
