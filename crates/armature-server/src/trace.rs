use std::sync::Arc;
use std::time::Duration;

use http::{Request, Response};
use tower_http::trace::{MakeSpan, OnResponse};
use tracing::Span;

/// Request span recording only the method and path
///
/// Headers are never recorded, so credentials and cookies stay out of the
/// logs. Requests to the skipped path (the health endpoint) get no span.
#[derive(Debug, Clone, Default)]
pub struct RequestSpan {
    skip: Option<Arc<str>>,
}

impl RequestSpan {
    pub fn skipping(path: Option<&str>) -> Self {
        Self { skip: path.map(Arc::from) }
    }
}

impl<B> MakeSpan<B> for RequestSpan {
    fn make_span(&mut self, request: &Request<B>) -> Span {
        let path = request.uri().path();
        if self.skip.as_deref() == Some(path) {
            return Span::none();
        }

        tracing::info_span!("request", method = %request.method(), path = %path)
    }
}

/// Logs completed requests inside their span; silent for skipped requests
#[derive(Debug, Clone, Copy, Default)]
pub struct LogResponse;

impl<B> OnResponse<B> for LogResponse {
    fn on_response(self, response: &Response<B>, latency: Duration, span: &Span) {
        if span.is_disabled() {
            return;
        }

        tracing::info!(
            parent: span,
            status = response.status().as_u16(),
            latency_ms = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
            "finished processing request"
        );
    }
}
