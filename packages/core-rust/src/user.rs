use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A user record: a store-assigned id plus whatever fields the caller sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl User {
    /// Combines a creation payload with the allocated id. A caller-supplied
    /// `id` key is dropped so the generated one wins.
    #[must_use]
    pub fn new(id: u64, mut fields: Map<String, Value>) -> Self {
        fields.remove("id");
        Self { id, fields }
    }
}
