//! HTTP middleware stack for the `Clearword` server.
//!
//! Builds the Tower middleware pipeline applied to all HTTP requests, plus
//! the layers the router installs itself: access logging, in-flight
//! tracking, and the panic catcher. The panic catcher sits inside the access
//! log so a panicking request still gets its line. Middleware ordering
//! follows the outer-to-inner convention: the first layer listed is the
//! outermost.

use std::any::Any;
use std::sync::Arc;
use std::time::Instant;

use axum::body::{to_bytes, Body};
use axum::extract::{Request, State};
use axum::http::header::{HeaderName, CONTENT_TYPE};
use axum::http::{Method, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use serde_json::Value;
use tower::layer::util::{Identity, Stack};
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultOnFailure, TraceLayer};
use tracing::{info, warn, Level};

use super::config::NetworkConfig;
use super::error::{panic_response, ApiError, INTERNAL_ERROR_MESSAGE};
use super::shutdown::ShutdownController;

/// Paths under this prefix get an access-log line.
pub const API_PREFIX: &str = "/api";

/// Access-log lines longer than this are cut and end in `…`.
pub const ACCESS_LOG_MAX_CHARS: usize = 80;

type PanicHandler = fn(Box<dyn Any + Send + 'static>) -> Response;

/// The composed Tower layer type produced by [`build_http_layers`].
type HttpLayers = Stack<
    PropagateRequestIdLayer,
    Stack<
        CorsLayer,
        Stack<
            CompressionLayer,
            Stack<
                TraceLayer<SharedClassifier<ServerErrorsAsFailures>>,
                Stack<SetRequestIdLayer<MakeRequestUuid>, Identity>,
            >,
        >,
    >,
>;

/// Builds the HTTP-level Tower middleware stack from the network configuration.
///
/// **Middleware ordering (outermost to innermost):**
/// 1. `SetRequestId` -- assigns a UUID v4 `X-Request-Id` to every incoming request
/// 2. `Tracing` -- request/response spans; 5xx responses are logged at DEBUG
///    because the handler that produced them already logged the cause
/// 3. `Compression` -- gzip response compression
/// 4. `CORS` -- Cross-Origin Resource Sharing based on configured origins
/// 5. `PropagateRequestId` -- copies `X-Request-Id` from the request to the response
#[must_use]
pub fn build_http_layers(config: &NetworkConfig) -> HttpLayers {
    let x_request_id = HeaderName::from_static("x-request-id");

    ServiceBuilder::new()
        .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
        .layer(
            TraceLayer::new_for_http().on_failure(DefaultOnFailure::new().level(Level::DEBUG)),
        )
        .layer(CompressionLayer::new())
        .layer(build_cors_layer(&config.cors_origins))
        .layer(PropagateRequestIdLayer::new(x_request_id))
        .into_inner()
}

/// Turns a handler panic into a `500 {"message"}` envelope. Installed inside
/// [`access_log`].
#[must_use]
pub fn catch_panic_layer() -> CatchPanicLayer<PanicHandler> {
    CatchPanicLayer::custom(panic_response as PanicHandler)
}

/// Builds the CORS layer from the configured list of allowed origins.
///
/// A wildcard `"*"` in the origins list allows any origin. Otherwise,
/// each origin string is parsed and added to an explicit allowlist.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        let parsed: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
        AllowOrigin::list(parsed)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE])
}

/// Logs one line per `/api` request once the response is ready:
/// `METHOD path status in Nms :: <json body>`.
///
/// The response body is buffered to include it in the line, then handed on
/// unchanged.
pub async fn access_log(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_owned();
    let start = Instant::now();

    let response = next.run(req).await;
    if !path.starts_with(API_PREFIX) {
        return response;
    }

    #[allow(clippy::cast_possible_truncation)]
    let duration_ms = start.elapsed().as_millis() as u64;
    let status = response.status().as_u16();

    let (parts, body) = response.into_parts();
    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(err) => {
            warn!(%method, %path, error = %err, "failed to buffer response body");
            return ApiError::Rejected {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: INTERNAL_ERROR_MESSAGE.to_string(),
            }
            .into_response();
        }
    };

    let line = format_access_line(&method, &path, status, duration_ms, &bytes);
    info!(%method, %path, status, duration_ms, "{line}");

    Response::from_parts(parts, Body::from(bytes))
}

/// Holds an in-flight guard for the duration of each request.
pub async fn track_in_flight(
    State(shutdown): State<Arc<ShutdownController>>,
    req: Request,
    next: Next,
) -> Response {
    let _guard = shutdown.in_flight_guard();
    next.run(req).await
}

fn format_access_line(
    method: &Method,
    path: &str,
    status: u16,
    duration_ms: u64,
    body: &[u8],
) -> String {
    let mut line = format!("{method} {path} {status} in {duration_ms}ms");
    if let Ok(json) = serde_json::from_slice::<Value>(body) {
        line.push_str(" :: ");
        line.push_str(&json.to_string());
    }
    truncate_line(line)
}

fn truncate_line(line: String) -> String {
    if line.chars().count() <= ACCESS_LOG_MAX_CHARS {
        return line;
    }
    let mut cut: String = line.chars().take(ACCESS_LOG_MAX_CHARS - 1).collect();
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_http_layers_does_not_panic_with_defaults() {
        let config = NetworkConfig::default();
        let _layers = build_http_layers(&config);
    }

    #[test]
    fn catch_panic_layer_builds() {
        let _layer = catch_panic_layer();
    }

    #[test]
    fn build_cors_layer_wildcard() {
        let origins = vec!["*".to_string()];
        let _cors = build_cors_layer(&origins);
    }

    #[test]
    fn build_cors_layer_specific_origins() {
        let origins = vec![
            "http://localhost:3000".to_string(),
            "https://example.com".to_string(),
        ];
        let _cors = build_cors_layer(&origins);
    }

    #[test]
    fn access_line_includes_json_body() {
        let line = format_access_line(&Method::GET, "/api/hello", 200, 3, br#"{"ok":true}"#);
        assert_eq!(line, r#"GET /api/hello 200 in 3ms :: {"ok":true}"#);
    }

    #[test]
    fn access_line_omits_non_json_body() {
        let line = format_access_line(&Method::POST, "/api/chat", 415, 0, b"plain text");
        assert_eq!(line, "POST /api/chat 415 in 0ms");
    }

    #[test]
    fn long_lines_are_truncated_to_limit() {
        let body = format!(r#"{{"summary":"{}"}}"#, "x".repeat(200));
        let line = format_access_line(&Method::POST, "/api/summarize", 200, 1, body.as_bytes());
        assert_eq!(line.chars().count(), ACCESS_LOG_MAX_CHARS);
        assert!(line.ends_with('…'));
        assert!(line.starts_with("POST /api/summarize 200 in 1ms :: "));
    }

    #[test]
    fn short_lines_are_untouched() {
        let line = "x".repeat(ACCESS_LOG_MAX_CHARS);
        assert_eq!(truncate_line(line.clone()), line);
    }
}
