//! Random slowdown middleware for testing
#![allow(dead_code)] // Feature-gated middleware

use axum::body::Body;
use axum::extract::Request;
use axum::middleware::Next;
use axum::response::IntoResponse;
use rand_distr::{Distribution, Normal};
use std::time::Duration;

const MEAN_DELAY_MS: f64 = 1000.0;
const DELAY_STD_DEV_MS: f64 = 2000.0;

/// Delays the request by a gaussian amount of time, clamped at zero.
pub async fn slowdown_request(request: Request<Body>, next: Next) -> impl IntoResponse {
    if let Ok(normal) = Normal::new(MEAN_DELAY_MS, DELAY_STD_DEV_MS) {
        let v = 0.0f64.max(normal.sample(&mut rand::rng()));
        tokio::time::sleep(Duration::from_millis(v as u64)).await;
    }
    next.run(request).await
}
