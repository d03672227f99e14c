//! Per-operation timing and outcome, recorded on a `tracing` span.
//!
//! Each dispatched operation runs inside an `operation` span carrying the
//! operation name and the response key it answers under. When the processor
//! returns, the span gets `duration_ms` and `outcome`, plus `error` with the
//! processor's message on failure. The HTTP handler that owns the request
//! logs the failure itself, so nothing here is emitted above INFO.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;

use clearword_core::TextOperation;
use tower::{Layer, Service};
use tracing::field::Empty;
use tracing::{info, info_span, Instrument, Span};

use crate::service::operation::{OperationError, OperationResponse};

type OperationResult = Result<OperationResponse, OperationError>;

/// Wraps the dispatcher in [`OperationMetrics`].
#[derive(Debug, Clone)]
pub struct MetricsLayer;

impl<S> Layer<S> for MetricsLayer {
    type Service = OperationMetrics<S>;

    fn layer(&self, inner: S) -> Self::Service {
        OperationMetrics { inner }
    }
}

/// Runs each operation inside an `operation` span and records how it ended.
#[derive(Debug, Clone)]
pub struct OperationMetrics<S> {
    inner: S,
}

impl<S> Service<TextOperation> for OperationMetrics<S>
where
    S: Service<TextOperation, Response = OperationResponse, Error = OperationError> + Send,
    S::Future: Send + 'static,
{
    type Response = OperationResponse;
    type Error = OperationError;
    type Future = Pin<Box<dyn Future<Output = OperationResult> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, op: TextOperation) -> Self::Future {
        let kind = op.kind();
        let span = info_span!(
            "operation",
            operation = kind.name(),
            result_key = kind.result_key(),
            duration_ms = Empty,
            outcome = Empty,
            error = Empty,
        );

        let fut = self.inner.call(op);
        Box::pin(record_outcome(fut).instrument(span))
    }
}

async fn record_outcome<F>(fut: F) -> OperationResult
where
    F: Future<Output = OperationResult>,
{
    let start = Instant::now();
    let result = fut.await;

    #[allow(clippy::cast_possible_truncation)]
    let duration_ms = start.elapsed().as_millis() as u64;
    let span = Span::current();
    span.record("duration_ms", duration_ms);

    let outcome = match &result {
        Ok(_) => "ok",
        Err(err) => {
            span.record("error", err.detail().as_str());
            "error"
        }
    };
    span.record("outcome", outcome);
    info!(duration_ms, outcome, "operation complete");

    result
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::fmt;
    use std::sync::{Arc, Mutex};

    use clearword_core::OperationKind;
    use tower::ServiceExt;
    use tracing::field::{Field, Visit};
    use tracing::span::{Attributes, Id, Record};
    use tracing::Subscriber;
    use tracing_subscriber::layer::{Context as LayerContext, SubscriberExt};

    use super::*;
    use crate::service::operation::OperationOutput;

    type Fields = Arc<Mutex<BTreeMap<String, String>>>;

    /// Collects every field recorded on `operation` spans.
    struct SpanFields(Fields);

    struct FieldVisitor<'a>(&'a mut BTreeMap<String, String>);

    impl Visit for FieldVisitor<'_> {
        fn record_str(&mut self, field: &Field, value: &str) {
            self.0.insert(field.name().to_string(), value.to_string());
        }

        fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
            self.0.insert(field.name().to_string(), format!("{value:?}"));
        }
    }

    impl<S: Subscriber> tracing_subscriber::Layer<S> for SpanFields {
        fn on_new_span(&self, attrs: &Attributes<'_>, _id: &Id, _ctx: LayerContext<'_, S>) {
            if attrs.metadata().name() == "operation" {
                attrs.record(&mut FieldVisitor(&mut self.0.lock().unwrap()));
            }
        }

        fn on_record(&self, _id: &Id, values: &Record<'_>, _ctx: LayerContext<'_, S>) {
            values.record(&mut FieldVisitor(&mut self.0.lock().unwrap()));
        }
    }

    fn capture() -> (Fields, tracing::subscriber::DefaultGuard) {
        let fields = Fields::default();
        let subscriber =
            tracing_subscriber::registry().with(SpanFields(Arc::clone(&fields)));
        (fields, tracing::subscriber::set_default(subscriber))
    }

    /// Immediately-completing service for metrics testing.
    struct ImmediateService;

    impl Service<TextOperation> for ImmediateService {
        type Response = OperationResponse;
        type Error = OperationError;
        type Future =
            Pin<Box<dyn Future<Output = Result<OperationResponse, OperationError>> + Send>>;

        fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
            Poll::Ready(Ok(()))
        }

        fn call(&mut self, op: TextOperation) -> Self::Future {
            let kind = op.kind();
            Box::pin(async move {
                Ok(OperationResponse {
                    kind,
                    output: OperationOutput::Text("done".to_string()),
                })
            })
        }
    }

    /// Always-failing service for metrics testing.
    struct BrokenService;

    impl Service<TextOperation> for BrokenService {
        type Response = OperationResponse;
        type Error = OperationError;
        type Future =
            Pin<Box<dyn Future<Output = Result<OperationResponse, OperationError>> + Send>>;

        fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
            Poll::Ready(Ok(()))
        }

        fn call(&mut self, op: TextOperation) -> Self::Future {
            let kind = op.kind();
            Box::pin(async move {
                Err(OperationError::Processing {
                    kind,
                    source: anyhow::anyhow!("boom"),
                })
            })
        }
    }

    #[tokio::test]
    async fn metrics_layer_passes_through_response() {
        let svc = MetricsLayer.layer(ImmediateService);
        let resp = svc
            .oneshot(TextOperation::Simplify {
                text: "x".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(resp.kind, OperationKind::Simplify);
    }

    #[tokio::test]
    async fn metrics_layer_passes_through_error() {
        let svc = MetricsLayer.layer(BrokenService);
        let err = svc
            .oneshot(TextOperation::Chat {
                message: "x".to_string(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.detail(), "boom");
    }

    #[tokio::test]
    async fn failure_records_error_outcome_and_detail() {
        let (fields, _guard) = capture();
        let svc = MetricsLayer.layer(BrokenService);
        svc.oneshot(TextOperation::Chat {
            message: "x".to_string(),
        })
        .await
        .unwrap_err();

        let fields = fields.lock().unwrap();
        assert_eq!(fields.get("operation").map(String::as_str), Some("chat"));
        assert_eq!(fields.get("result_key").map(String::as_str), Some("response"));
        assert_eq!(fields.get("outcome").map(String::as_str), Some("error"));
        assert_eq!(fields.get("error").map(String::as_str), Some("boom"));
        assert!(fields.contains_key("duration_ms"));
    }

    #[tokio::test]
    async fn success_records_ok_outcome_without_error() {
        let (fields, _guard) = capture();
        let svc = MetricsLayer.layer(ImmediateService);
        svc.oneshot(TextOperation::Summarize {
            text: "x".to_string(),
        })
        .await
        .unwrap();

        let fields = fields.lock().unwrap();
        assert_eq!(fields.get("result_key").map(String::as_str), Some("summary"));
        assert_eq!(fields.get("outcome").map(String::as_str), Some("ok"));
        assert!(fields.contains_key("duration_ms"));
        assert!(!fields.contains_key("error"));
    }
}
