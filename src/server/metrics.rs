use crate::catalog::{CatalogEntry, CatalogError};
use crate::catalog_store::CatalogCounts;
use axum::{http::StatusCode, response::IntoResponse};
use lazy_static::lazy_static;
use prometheus::{
    CounterVec, Encoder, GaugeVec, Histogram, HistogramOpts, HistogramVec, Opts, Registry,
    TextEncoder,
};
use std::time::Duration;

/// Metric name prefix for all catalog server metrics
const PREFIX: &str = "disco";

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();

    // HTTP Request Metrics
    pub static ref HTTP_REQUESTS_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_http_requests_total"), "Total number of HTTP requests"),
        &["method", "path", "status"]
    ).expect("Failed to create http_requests_total metric");

    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            format!("{PREFIX}_http_request_duration_seconds"),
            "HTTP request duration in seconds"
        )
        .buckets(vec![0.001, 0.01, 0.05, 0.1, 0.5, 1.0, 2.0, 5.0, 10.0]),
        &["method", "path"]
    ).expect("Failed to create http_request_duration_seconds metric");

    // Catalog Metrics
    pub static ref CATALOG_LOOKUPS_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_catalog_lookups_total"), "Album lookups by outcome"),
        &["outcome"]
    ).expect("Failed to create catalog_lookups_total metric");

    pub static ref CATALOG_PRICES: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            format!("{PREFIX}_catalog_price_dollars"),
            "Computed album prices"
        )
        .buckets(vec![6.0, 8.0, 10.0, 12.0, 15.0, 18.0, 21.0, 25.0, 30.0])
    ).expect("Failed to create catalog_price_dollars metric");

    pub static ref CATALOG_ITEMS_TOTAL: GaugeVec = GaugeVec::new(
        Opts::new(format!("{PREFIX}_catalog_items_total"), "Total items in catalog"),
        &["type"]
    ).expect("Failed to create catalog_items_total metric");
}

/// Initialize all metrics and register them with the Prometheus registry
pub fn init_metrics() {
    // Ignore errors if already registered (for tests)
    let _ = REGISTRY.register(Box::new(HTTP_REQUESTS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(HTTP_REQUEST_DURATION_SECONDS.clone()));
    let _ = REGISTRY.register(Box::new(CATALOG_LOOKUPS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(CATALOG_PRICES.clone()));
    let _ = REGISTRY.register(Box::new(CATALOG_ITEMS_TOTAL.clone()));

    tracing::debug!("Metrics registered");
}

pub fn init_catalog_metrics(counts: &CatalogCounts) {
    for (kind, count) in [
        ("artist", counts.artists),
        ("album", counts.albums),
        ("track", counts.tracks),
        ("genre", counts.genres),
    ] {
        CATALOG_ITEMS_TOTAL
            .with_label_values(&[kind])
            .set(count as f64);
    }

    tracing::info!(
        "Catalog metrics initialized: {} artists, {} albums, {} tracks, {} genres",
        counts.artists,
        counts.albums,
        counts.tracks,
        counts.genres
    );
}

/// Record an HTTP request
pub fn record_http_request(method: &str, path: &str, status: u16, duration: Duration) {
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[method, path, &status.to_string()])
        .inc();

    HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&[method, path])
        .observe(duration.as_secs_f64());
}

pub fn lookup_outcome(result: &Result<CatalogEntry, CatalogError>) -> &'static str {
    match result {
        Ok(_) => "found",
        Err(CatalogError::InvalidIdentifier { .. }) => "invalid",
        Err(CatalogError::NotFound(_)) => "not_found",
        Err(CatalogError::UpstreamUnavailable(_)) => "unavailable",
    }
}

pub fn record_lookup(result: &Result<CatalogEntry, CatalogError>) {
    CATALOG_LOOKUPS_TOTAL
        .with_label_values(&[lookup_outcome(result)])
        .inc();
}

pub fn record_prices<'a, I: IntoIterator<Item = &'a CatalogEntry>>(entries: I) {
    for entry in entries {
        CATALOG_PRICES.observe(entry.price().as_f64());
    }
}

/// Collapses ids out of a path so label cardinality stays bounded.
pub fn categorize_endpoint(path: &str) -> &'static str {
    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
    match segments.as_slice() {
        [""] => "/",
        ["albums"] => "/albums",
        ["albums", _] => "/albums/{id}",
        ["artists"] => "/artists",
        ["artists", _] => "/artists/{id}",
        ["artists", _, "albums"] => "/artists/{id}/albums",
        ["genres"] => "/genres",
        ["genres", _] => "/genres/{link}",
        ["metrics"] => "/metrics",
        ["assets", ..] => "/assets",
        _ => "other",
    }
}

/// Handler for the /metrics endpoint
pub async fn metrics_handler() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();

    let mut buffer = vec![];
    match encoder.encode(&metric_families, &mut buffer) {
        Ok(()) => {
            let response = String::from_utf8(buffer).unwrap_or_default();
            (StatusCode::OK, response)
        }
        Err(e) => {
            tracing::error!("Failed to encode metrics: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to encode metrics: {}", e),
            )
        }
    }
}
