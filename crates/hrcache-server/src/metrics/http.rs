//! HTTP metrics middleware.

use axum::{body::Body, extract::MatchedPath, http::Request, middleware::Next, response::Response};
use metrics::{counter, histogram};
use std::time::Instant;

/// Prometheus scrapes are not counted as traffic.
const METRICS_ROUTE: &str = "/metrics";

/// Middleware que registra metricas HTTP para cada request.
///
/// Las rutas se etiquetan con el patron (`/cache/{model}`), no con el path
/// real, para no multiplicar series por modelo.
pub async fn http_metrics_middleware(
    matched_path: Option<MatchedPath>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let route = matched_path
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    if route == METRICS_ROUTE {
        return next.run(request).await;
    }

    let start = Instant::now();
    let method = request.method().to_string();

    let response = next.run(request).await;

    let status = response.status().as_u16().to_string();

    counter!(
        "hrcache_http_requests_total",
        "method" => method.clone(),
        "route" => route.clone(),
        "status" => status
    )
    .increment(1);

    histogram!(
        "hrcache_http_request_duration_seconds",
        "method" => method,
        "route" => route
    )
    .record(start.elapsed().as_secs_f64());

    response
}

/// Registra las metricas HTTP
pub fn register_http_metrics() {
    metrics::describe_counter!(
        "hrcache_http_requests_total",
        "Total number of admin HTTP requests"
    );
    metrics::describe_histogram!(
        "hrcache_http_request_duration_seconds",
        "Admin HTTP request duration in seconds"
    );
}
