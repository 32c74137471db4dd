//! Prometheus metrics for blog-service.

use actix_web::HttpResponse;
use once_cell::sync::Lazy;
use prometheus::{
    register_int_counter_vec, Encoder, IntCounterVec, TextEncoder,
};

/// Global-feed cache events by outcome (hit / miss / error)
pub static FEED_CACHE_EVENTS: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "blog_feed_cache_events_total",
        "Global feed cache events by outcome",
        &["outcome"]
    )
    .expect("feed cache events metric can be registered")
});

/// Global-feed cache writes by result (success / error)
pub static FEED_CACHE_WRITE_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "blog_feed_cache_writes_total",
        "Global feed cache writes by result",
        &["result"]
    )
    .expect("feed cache writes metric can be registered")
});

/// HTTP requests by method and status class
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "blog_http_requests_total",
        "HTTP requests by method and status",
        &["method", "status"]
    )
    .expect("http requests metric can be registered")
});

/// Serve the default registry in the Prometheus text format.
pub async fn serve_metrics() -> HttpResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("failed to encode metrics: {}", e);
        return HttpResponse::InternalServerError().finish();
    }

    HttpResponse::Ok()
        .content_type(encoder.format_type())
        .body(buffer)
}
