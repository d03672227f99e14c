//! The text-processing backend seam.
//!
//! The server never does language processing itself: every text operation
//! calls into a [`TextProcessor`]. [`EchoProcessor`] is the built-in backend
//! used when nothing else is configured; it formats its input instead of
//! transforming it.

use async_trait::async_trait;

/// External text-processing capability, one method per operation.
///
/// Calls may suspend for as long as the backend needs. Errors are surfaced
/// to the client once and never retried.
#[async_trait]
pub trait TextProcessor: Send + Sync {
    async fn summarize(&self, text: &str) -> anyhow::Result<String>;

    async fn simplify(&self, text: &str) -> anyhow::Result<String>;

    async fn correct_grammar(&self, text: &str) -> anyhow::Result<String>;

    /// `source_language` is `None` when the caller did not name one.
    async fn translate(
        &self,
        text: &str,
        source_language: Option<&str>,
        target_language: &str,
    ) -> anyhow::Result<String>;

    async fn chat(&self, message: &str) -> anyhow::Result<String>;

    async fn suggested_responses(&self, context: &str) -> anyhow::Result<Vec<String>>;
}

/// Number of characters kept by [`EchoProcessor::summarize`].
pub const SUMMARY_PREFIX_CHARS: usize = 50;

/// Placeholder backend that labels its input.
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoProcessor;

#[async_trait]
impl TextProcessor for EchoProcessor {
    async fn summarize(&self, text: &str) -> anyhow::Result<String> {
        let prefix: String = text.chars().take(SUMMARY_PREFIX_CHARS).collect();
        Ok(format!("Summary: {prefix}..."))
    }

    async fn simplify(&self, text: &str) -> anyhow::Result<String> {
        Ok(format!("Simplified: {text}"))
    }

    async fn correct_grammar(&self, text: &str) -> anyhow::Result<String> {
        Ok(format!("Corrected: {text}"))
    }

    async fn translate(
        &self,
        text: &str,
        source_language: Option<&str>,
        target_language: &str,
    ) -> anyhow::Result<String> {
        let source = source_language.unwrap_or_default();
        Ok(format!("Translated ({source} -> {target_language}): {text}"))
    }

    async fn chat(&self, message: &str) -> anyhow::Result<String> {
        Ok(format!("Chat response for: {message}"))
    }

    async fn suggested_responses(&self, _context: &str) -> anyhow::Result<Vec<String>> {
        Ok((1..=4).map(|i| format!("Suggestion {i}")).collect())
    }
}
