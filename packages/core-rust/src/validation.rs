//! Request validation: turns untyped JSON bodies into typed operation payloads.
//!
//! Text fields count as missing when they are absent, `null`, not a string,
//! or the empty string. Language fields only need to be present and truthy;
//! a non-string language travels on as its JSON text. Fields outside an
//! operation's required set pass through untouched.

use serde_json::Value;

use crate::operation::{OperationKind, TextOperation, TranslateRequest};

/// A rejected request. The `Display` text is the user-facing message and is
/// part of the HTTP contract, so it must not change.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Text is required and must be a string")]
    TextRequired,
    #[error("Target language is required")]
    TargetLanguageRequired,
    #[error("Message is required and must be a string")]
    MessageRequired,
    #[error("Context is required and must be a string")]
    ContextRequired,
    #[error("User ID is required")]
    UserIdRequired,
    #[error("User payload must be a JSON object")]
    UserPayloadNotObject,
}

/// Validates `body` against the required fields of `kind` and builds the
/// typed payload.
///
/// # Errors
///
/// Returns the [`ValidationError`] for the first required field that is
/// missing or invalid. For `translate`, `text` is checked before
/// `targetLanguage`.
pub fn validate_operation(
    kind: OperationKind,
    body: &Value,
) -> Result<TextOperation, ValidationError> {
    match kind {
        OperationKind::Summarize => Ok(TextOperation::Summarize {
            text: required_string(body, "text", ValidationError::TextRequired)?,
        }),
        OperationKind::Simplify => Ok(TextOperation::Simplify {
            text: required_string(body, "text", ValidationError::TextRequired)?,
        }),
        OperationKind::CorrectGrammar => Ok(TextOperation::CorrectGrammar {
            text: required_string(body, "text", ValidationError::TextRequired)?,
        }),
        OperationKind::Translate => {
            let text = required_string(body, "text", ValidationError::TextRequired)?;
            let target_language = match body.get("targetLanguage") {
                Some(v) if !is_falsy(v) => language_text(v),
                _ => return Err(ValidationError::TargetLanguageRequired),
            };
            Ok(TextOperation::Translate(TranslateRequest {
                text,
                source_language: body
                    .get("sourceLanguage")
                    .filter(|v| !v.is_null())
                    .map(language_text),
                target_language,
            }))
        }
        OperationKind::Chat => Ok(TextOperation::Chat {
            message: required_string(body, "message", ValidationError::MessageRequired)?,
        }),
        OperationKind::SuggestedResponses => Ok(TextOperation::SuggestedResponses {
            context: required_string(body, "context", ValidationError::ContextRequired)?,
        }),
    }
}

/// Returns `true` for the JSON values a caller can use to mean "nothing":
/// `null`, `false`, `0`, and `""`.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f == 0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

fn required_string(
    body: &Value,
    field: &str,
    err: ValidationError,
) -> Result<String, ValidationError> {
    match body.get(field) {
        Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
        _ => Err(err),
    }
}

fn language_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
