//! Request counters exported through the Prometheus recorder.

use metrics::counter;

/// Count a request to `endpoint`.
pub fn record_request(endpoint: &'static str) {
    counter!("seismo_requests_total", "endpoint" => endpoint).increment(1);
}

/// Count a rejected request by error kind.
pub fn record_error(kind: &'static str) {
    counter!("seismo_request_errors_total", "kind" => kind).increment(1);
}

/// Count an extraction stopped by a client disconnect.
pub fn record_cancelled() {
    counter!("seismo_extractions_cancelled_total").increment(1);
}
