use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter, register_int_counter_vec, Encoder,
    HistogramVec, IntCounter, IntCounterVec, TextEncoder,
};

lazy_static! {
    // HTTP Metrics
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "http_requests_total",
        "Total number of HTTP requests",
        &["method", "path", "status"]
    )
    .unwrap();

    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "http_request_duration_seconds",
        "HTTP request duration in seconds",
        &["method", "path"],
        vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0]
    )
    .unwrap();

    // Model provider
    pub static ref MODEL_CALLS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "model_calls_total",
        "Total number of chat-completion calls",
        &["model", "status"]
    )
    .unwrap();

    pub static ref MODEL_CALL_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "model_call_duration_seconds",
        "Chat-completion call duration in seconds",
        &["model"],
        vec![0.5, 1.0, 2.5, 5.0, 10.0, 20.0, 30.0, 60.0, 120.0]
    )
    .unwrap();

    // Pipeline
    pub static ref QUIZ_PARSE_DEGRADED_TOTAL: IntCounter = register_int_counter!(
        "quiz_parse_degraded_total",
        "Model replies that did not parse and produced an empty question"
    )
    .unwrap();

    pub static ref LOG_WRITES_TOTAL: IntCounterVec = register_int_counter_vec!(
        "log_writes_total",
        "Rewrites of the daily question log",
        &["status"]
    )
    .unwrap();
}

/// Renders all metrics in Prometheus text format
pub fn render_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    String::from_utf8(buffer)
        .map_err(|e| prometheus::Error::Msg(format!("Failed to convert metrics to UTF-8: {}", e)))
}

/// Records one chat-completion call.
pub fn record_model_call(model: &str, success: bool, duration_secs: f64) {
    let status = if success { "success" } else { "error" };
    MODEL_CALLS_TOTAL.with_label_values(&[model, status]).inc();
    MODEL_CALL_DURATION_SECONDS
        .with_label_values(&[model])
        .observe(duration_secs);
}
