//! Metric names and recording helpers

use std::sync::OnceLock;

use opentelemetry::KeyValue;
use opentelemetry::metrics::Counter;

/// Error envelopes written by the exception filter
pub const HTTP_ERROR_COUNT: &str = "http.server.error.count";

static ERROR_COUNT: OnceLock<Counter<u64>> = OnceLock::new();

/// Count one error response, tagged with its status and error code
///
/// The counter binds to the global meter provider on first use, so call
/// [`crate::init`] before serving requests.
pub fn record_error(status: u16, error_code: &str) {
    let counter = ERROR_COUNT.get_or_init(|| {
        opentelemetry::global::meter("armature")
            .u64_counter(HTTP_ERROR_COUNT)
            .with_description("Error responses by status and error code")
            .build()
    });

    counter.add(
        1,
        &[
            KeyValue::new("http.response.status_code", i64::from(status)),
            KeyValue::new("error.code", error_code.to_owned()),
        ],
    );
}
