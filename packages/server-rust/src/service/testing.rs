//! Test doubles for [`TextProcessor`].

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use super::processor::{EchoProcessor, TextProcessor};

/// Delegates to [`EchoProcessor`] and counts every call.
#[derive(Debug, Default)]
pub struct CountingProcessor {
    calls: AtomicUsize,
}

impl CountingProcessor {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl TextProcessor for CountingProcessor {
    async fn summarize(&self, text: &str) -> anyhow::Result<String> {
        self.hit();
        EchoProcessor.summarize(text).await
    }

    async fn simplify(&self, text: &str) -> anyhow::Result<String> {
        self.hit();
        EchoProcessor.simplify(text).await
    }

    async fn correct_grammar(&self, text: &str) -> anyhow::Result<String> {
        self.hit();
        EchoProcessor.correct_grammar(text).await
    }

    async fn translate(
        &self,
        text: &str,
        source_language: Option<&str>,
        target_language: &str,
    ) -> anyhow::Result<String> {
        self.hit();
        EchoProcessor
            .translate(text, source_language, target_language)
            .await
    }

    async fn chat(&self, message: &str) -> anyhow::Result<String> {
        self.hit();
        EchoProcessor.chat(message).await
    }

    async fn suggested_responses(&self, context: &str) -> anyhow::Result<Vec<String>> {
        self.hit();
        EchoProcessor.suggested_responses(context).await
    }
}

/// Fails every call with a fixed message and counts the attempts.
#[derive(Debug)]
pub struct FailingProcessor {
    message: &'static str,
    calls: AtomicUsize,
}

impl FailingProcessor {
    pub fn new(message: &'static str) -> Self {
        Self {
            message,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn fail<T>(&self) -> anyhow::Result<T> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(anyhow::anyhow!(self.message))
    }
}

#[async_trait]
impl TextProcessor for FailingProcessor {
    async fn summarize(&self, _text: &str) -> anyhow::Result<String> {
        self.fail()
    }

    async fn simplify(&self, _text: &str) -> anyhow::Result<String> {
        self.fail()
    }

    async fn correct_grammar(&self, _text: &str) -> anyhow::Result<String> {
        self.fail()
    }

    async fn translate(
        &self,
        _text: &str,
        _source_language: Option<&str>,
        _target_language: &str,
    ) -> anyhow::Result<String> {
        self.fail()
    }

    async fn chat(&self, _message: &str) -> anyhow::Result<String> {
        self.fail()
    }

    async fn suggested_responses(&self, _context: &str) -> anyhow::Result<Vec<String>> {
        self.fail()
    }
}

/// Panics on every call.
#[derive(Debug)]
pub struct PanickingProcessor;

#[async_trait]
impl TextProcessor for PanickingProcessor {
    async fn summarize(&self, _text: &str) -> anyhow::Result<String> {
        panic!("processor crashed")
    }

    async fn simplify(&self, _text: &str) -> anyhow::Result<String> {
        panic!("processor crashed")
    }

    async fn correct_grammar(&self, _text: &str) -> anyhow::Result<String> {
        panic!("processor crashed")
    }

    async fn translate(
        &self,
        _text: &str,
        _source_language: Option<&str>,
        _target_language: &str,
    ) -> anyhow::Result<String> {
        panic!("processor crashed")
    }

    async fn chat(&self, _message: &str) -> anyhow::Result<String> {
        panic!("processor crashed")
    }

    async fn suggested_responses(&self, _context: &str) -> anyhow::Result<Vec<String>> {
        panic!("processor crashed")
    }
}
