//! Typed text-operation payloads and per-operation contract constants.

use std::fmt;

/// Discriminant for the text operations exposed over HTTP.
///
/// Each kind fixes three pieces of the observable contract: its route name,
/// the JSON key its result is returned under, and the message used when the
/// processor fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Summarize,
    Simplify,
    CorrectGrammar,
    Translate,
    Chat,
    SuggestedResponses,
}

impl OperationKind {
    /// All operation kinds, in route registration order.
    pub const ALL: [OperationKind; 6] = [
        OperationKind::Summarize,
        OperationKind::Simplify,
        OperationKind::CorrectGrammar,
        OperationKind::Translate,
        OperationKind::Chat,
        OperationKind::SuggestedResponses,
    ];

    /// Route segment under `/api` (e.g. `"correct-grammar"`).
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Summarize => "summarize",
            Self::Simplify => "simplify",
            Self::CorrectGrammar => "correct-grammar",
            Self::Translate => "translate",
            Self::Chat => "chat",
            Self::SuggestedResponses => "suggested-responses",
        }
    }

    /// The single key of the success envelope.
    #[must_use]
    pub fn result_key(self) -> &'static str {
        match self {
            Self::Summarize => "summary",
            Self::Simplify => "simplifiedText",
            Self::CorrectGrammar => "correctedText",
            Self::Translate => "translatedText",
            Self::Chat => "response",
            Self::SuggestedResponses => "suggestions",
        }
    }

    /// Top-level `message` of the 500 envelope.
    #[must_use]
    pub fn failure_message(self) -> &'static str {
        match self {
            Self::Summarize => "Error processing text summarization",
            Self::Simplify => "Error processing text simplification",
            Self::CorrectGrammar => "Error processing grammar correction",
            Self::Translate => "Error processing translation",
            Self::Chat => "Error processing chat response",
            Self::SuggestedResponses => "Error processing suggested responses",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Payload for `translate`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslateRequest {
    pub text: String,
    /// Passed to the processor as-is; `None` is never replaced by a default.
    pub source_language: Option<String>,
    pub target_language: String,
}

/// A validated text operation, ready for dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextOperation {
    Summarize { text: String },
    Simplify { text: String },
    CorrectGrammar { text: String },
    Translate(TranslateRequest),
    Chat { message: String },
    SuggestedResponses { context: String },
}

impl TextOperation {
    #[must_use]
    pub fn kind(&self) -> OperationKind {
        match self {
            Self::Summarize { .. } => OperationKind::Summarize,
            Self::Simplify { .. } => OperationKind::Simplify,
            Self::CorrectGrammar { .. } => OperationKind::CorrectGrammar,
            Self::Translate(_) => OperationKind::Translate,
            Self::Chat { .. } => OperationKind::Chat,
            Self::SuggestedResponses { .. } => OperationKind::SuggestedResponses,
        }
    }
}
