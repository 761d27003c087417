use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;

use crate::metrics::{HTTP_REQUESTS_TOTAL, HTTP_REQUEST_DURATION_SECONDS};

const KNOWN_ROUTES: [&str; 4] = ["/health", "/metrics", "/index", "/api/questions/create"];

/// Records request count and latency per route.
pub async fn metrics_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().to_string();
    let path = route_label(req.uri().path());

    let response = next.run(req).await;

    let duration = start.elapsed().as_secs_f64();
    let status = response.status().as_u16().to_string();

    HTTP_REQUESTS_TOTAL
        .with_label_values(&[method.as_str(), path, status.as_str()])
        .inc();
    HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&[method.as_str(), path])
        .observe(duration);

    response
}

/// Maps a request path to a bounded label set; anything unrouted is `other`.
fn route_label(path: &str) -> &'static str {
    let trimmed = match path.trim_end_matches('/') {
        "" => "/",
        p => p,
    };
    KNOWN_ROUTES
        .iter()
        .find(|route| **route == trimmed)
        .copied()
        .unwrap_or("other")
}
