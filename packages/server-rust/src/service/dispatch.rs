//! Operation dispatch: sends a validated [`TextOperation`] to the processor.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use clearword_core::TextOperation;
use tower::Service;

use super::operation::{OperationError, OperationOutput, OperationResponse};
use super::processor::TextProcessor;

type BoxedFuture = Pin<Box<dyn Future<Output = Result<OperationResponse, OperationError>> + Send>>;

/// Tower service that runs each operation against a shared [`TextProcessor`].
///
/// Cloning is cheap; every clone calls the same processor.
#[derive(Clone)]
pub struct TextService {
    processor: Arc<dyn TextProcessor>,
}

impl TextService {
    #[must_use]
    pub fn new(processor: Arc<dyn TextProcessor>) -> Self {
        Self { processor }
    }
}

impl Service<TextOperation> for TextService {
    type Response = OperationResponse;
    type Error = OperationError;
    type Future = BoxedFuture;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, op: TextOperation) -> Self::Future {
        let processor = Arc::clone(&self.processor);
        let kind = op.kind();
        Box::pin(async move {
            let output = match op {
                TextOperation::Summarize { text } => {
                    processor.summarize(&text).await.map(OperationOutput::Text)
                }
                TextOperation::Simplify { text } => {
                    processor.simplify(&text).await.map(OperationOutput::Text)
                }
                TextOperation::CorrectGrammar { text } => processor
                    .correct_grammar(&text)
                    .await
                    .map(OperationOutput::Text),
                TextOperation::Translate(req) => processor
                    .translate(
                        &req.text,
                        req.source_language.as_deref(),
                        &req.target_language,
                    )
                    .await
                    .map(OperationOutput::Text),
                TextOperation::Chat { message } => {
                    processor.chat(&message).await.map(OperationOutput::Text)
                }
                TextOperation::SuggestedResponses { context } => processor
                    .suggested_responses(&context)
                    .await
                    .map(OperationOutput::Suggestions),
            };
            output
                .map(|output| OperationResponse { kind, output })
                .map_err(|source| OperationError::Processing { kind, source })
        })
    }
}
