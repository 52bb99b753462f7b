//! Prometheus metrics shared by the HTTP layer.
//!
//! A single process-wide registry; `render()` produces the text exposition
//! format served at `/metrics`.

use once_cell::sync::Lazy;
use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};

pub static REGISTRY: Lazy<Registry> = Lazy::new(Registry::new);

pub static HTTP_REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    let counter = IntCounterVec::new(
        Opts::new("qa_http_requests_total", "HTTP requests by endpoint and status code"),
        &["endpoint", "status"],
    )
    .expect("valid metric definition");
    REGISTRY
        .register(Box::new(counter.clone()))
        .expect("metric registered once");
    counter
});

/// Count one finished request.
pub fn record_request(endpoint: &str, status: u16) {
    HTTP_REQUESTS
        .with_label_values(&[endpoint, &status.to_string()])
        .inc();
}

/// Encode every registered metric in the Prometheus text format.
pub fn render() -> Result<String, prometheus::Error> {
    Lazy::force(&HTTP_REQUESTS);
    let mut buf = Vec::new();
    TextEncoder::new().encode(&REGISTRY.gather(), &mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
