//! Pipeline composition: wraps the dispatcher in the operation middleware.

use std::sync::Arc;

use tower::ServiceBuilder;

use super::metrics::{MetricsLayer, OperationMetrics};
use crate::service::dispatch::TextService;
use crate::service::processor::TextProcessor;

/// The composed operation service carried in the HTTP app state.
pub type OperationPipeline = OperationMetrics<TextService>;

/// Build the operation pipeline around a [`TextService`] for `processor`.
///
/// Layer order (outermost to innermost):
/// 1. `MetricsLayer` -- record timing, outcome, and failure detail
///
/// No timeout or retry layer: a processor error reaches the caller as-is.
#[must_use]
pub fn build_operation_pipeline(processor: Arc<dyn TextProcessor>) -> OperationPipeline {
    ServiceBuilder::new()
        .layer(MetricsLayer)
        .service(TextService::new(processor))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
