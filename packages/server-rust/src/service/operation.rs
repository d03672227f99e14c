//! Response and error types for the text-operation pipeline.

use clearword_core::OperationKind;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// What a processor produced for one operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum OperationOutput {
    Text(String),
    Suggestions(Vec<String>),
}

/// Successful result of a dispatched operation.
///
/// Serializes to a single-key object whose key is the operation's
/// [`result_key`](OperationKind::result_key), e.g. `{"summary": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationResponse {
    pub kind: OperationKind,
    pub output: OperationOutput,
}

impl Serialize for OperationResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(self.kind.result_key(), &self.output)?;
        map.end()
    }
}

/// Errors returned by the operation pipeline.
#[derive(Debug, thiserror::Error)]
pub enum OperationError {
    /// The text processor raised. Never retried.
    #[error("{kind} failed: {source}")]
    Processing {
        kind: OperationKind,
        source: anyhow::Error,
    },
}

impl OperationError {
    #[must_use]
    pub fn kind(&self) -> OperationKind {
        match self {
            Self::Processing { kind, .. } => *kind,
        }
    }

    /// The processor's own error text, as returned to the client under `error`.
    #[must_use]
    pub fn detail(&self) -> String {
        match self {
            Self::Processing { source, .. } => source.to_string(),
        }
    }
}
