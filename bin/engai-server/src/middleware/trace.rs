use crate::state::AppState;
use axum::{
    body::{Body, Bytes},
    extract::{Request, State},
    http::{HeaderValue, header},
    middleware::Next,
    response::Response,
};
use http_body_util::BodyExt;
use std::sync::Arc;
use std::time::Instant;
use tracing::{Instrument, info, info_span, warn};
use uuid::Uuid;

pub static X_TRACE_ID: &str = "x-trace-id";

/// Largest JSON response body echoed into the log.
const MAX_LOGGED_BODY: usize = 1024;

/// Tags each request with an `x-trace-id` (propagated if the caller sent a
/// valid UUID) and logs start, status and latency inside an `http_request` span.
///
/// Request bodies are passed through untouched; uploads can be large.
pub async fn trace_middleware(
    State(_state): State<Arc<AppState>>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let start_time = Instant::now();

    let trace_id = req
        .headers()
        .get(X_TRACE_ID)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| Uuid::parse_str(s).ok())
        .unwrap_or_else(Uuid::new_v4);
    let trace_value = HeaderValue::from_str(&trace_id.to_string())
        .unwrap_or_else(|_| HeaderValue::from_static("invalid"));

    let span = info_span!(
        "http_request",
        trace_id = %trace_id,
        method = %req.method(),
        path = %req.uri().path(),
    );

    async move {
        info!("→ request started");
        req.headers_mut().insert(X_TRACE_ID, trace_value.clone());

        let mut response = log_json_body(next.run(req).await).await;
        response.headers_mut().insert(X_TRACE_ID, trace_value);

        info!(
            status = response.status().as_u16(),
            latency_ms = start_time.elapsed().as_millis(),
            "← response finished"
        );
        response
    }
    .instrument(span)
    .await
}

/// Logs small JSON response bodies. Other responses (static assets) pass
/// through without being buffered.
async fn log_json_body(response: Response) -> Response {
    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.contains("application/json"));
    if !is_json {
        return response;
    }

    let (parts, body) = response.into_parts();
    let bytes = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            warn!(error = %e, "failed to buffer response body");
            Bytes::new()
        }
    };

    match std::str::from_utf8(&bytes) {
        Ok(text) if bytes.len() < MAX_LOGGED_BODY => info!(body = %text, "response body"),
        _ => info!(size_bytes = bytes.len(), "response body skipped"),
    }

    Response::from_parts(parts, Body::from(bytes))
}
