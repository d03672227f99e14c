//! Per-user accessibility preferences and their partial-update merge rules.
//!
//! A record is a flat JSON object: store-owned `id` and `userId`, the
//! documented settings with their defaults, and any other key a caller has
//! written. Merges are shallow and accept any JSON value for any setting.

use std::fmt;

use serde::{Serialize, Serializer};
use serde_json::{Map, Number, Value};

use crate::validation::{is_falsy, ValidationError};

/// Key a preference record is stored under, normalized from the caller's
/// `userId`.
///
/// Positive integers (as JSON numbers or numeric strings) share one key
/// space, so `7` and `"7"` address the same record. Any other truthy value
/// is kept verbatim and keyed by its JSON text. Not checked against the user
/// table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UserId {
    Numeric(u64),
    Opaque(String),
}

impl UserId {
    /// Wraps a numeric id. Returns `None` for zero, which callers treat as
    /// "no id".
    #[must_use]
    pub fn new(raw: u64) -> Option<Self> {
        (raw > 0).then_some(Self::Numeric(raw))
    }

    /// Reads the `userId` field of a request body.
    ///
    /// # Errors
    ///
    /// [`ValidationError::UserIdRequired`] if the field is absent or falsy
    /// (`null`, `false`, `0`, `""`). Every other value is accepted.
    pub fn from_json(value: Option<&Value>) -> Result<Self, ValidationError> {
        let value = match value {
            Some(v) if !is_falsy(v) => v,
            _ => return Err(ValidationError::UserIdRequired),
        };
        let numeric = match value {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse::<u64>().ok(),
            _ => None,
        };
        Ok(numeric
            .and_then(Self::new)
            .unwrap_or_else(|| Self::Opaque(value.to_string())))
    }

    /// Reads the id segment of `GET /preferences/{user_id}`.
    ///
    /// The segment is read as a number. Text that is not a number can never
    /// name a stored record and yields `None`.
    #[must_use]
    pub fn from_path(segment: &str) -> Option<Self> {
        let segment = segment.trim();
        if let Some(id) = segment.parse::<u64>().ok().and_then(Self::new) {
            return Some(id);
        }
        segment
            .parse::<Number>()
            .ok()
            .map(|n| Self::Opaque(n.to_string()))
    }

    /// The value reported as the record's `userId`.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Numeric(id) => Value::from(*id),
            Self::Opaque(text) => {
                serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.clone()))
            }
        }
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(id) => write!(f, "{id}"),
            Self::Opaque(text) => f.write_str(text),
        }
    }
}

impl Serialize for UserId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

pub const DEFAULT_THEME: &str = "light";
pub const DEFAULT_FONT_FAMILY: &str = "roboto";
pub const DEFAULT_FONT_SIZE: u64 = 16;
pub const DEFAULT_LETTER_SPACING: u64 = 1;
pub const DEFAULT_LINE_HEIGHT: u64 = 15;

/// Body keys owned by the store. Never merged.
const IDENTITY_KEYS: [&str; 2] = ["id", "userId"];

/// Stored preference record for one user.
///
/// Serializes as one flat object: `id`, `userId`, then every setting.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    /// Store-assigned, allocated once on the first write for `user_id`.
    pub id: u64,
    pub user_id: UserId,
    #[serde(flatten)]
    pub settings: Map<String, Value>,
}

impl UserPreferences {
    /// Builds the default record for a user that has never saved preferences.
    #[must_use]
    pub fn with_defaults(id: u64, user_id: UserId) -> Self {
        let mut settings = Map::new();
        settings.insert("theme".into(), Value::from(DEFAULT_THEME));
        settings.insert("fontFamily".into(), Value::from(DEFAULT_FONT_FAMILY));
        settings.insert("fontSize".into(), Value::from(DEFAULT_FONT_SIZE));
        settings.insert("letterSpacing".into(), Value::from(DEFAULT_LETTER_SPACING));
        settings.insert("lineHeight".into(), Value::from(DEFAULT_LINE_HEIGHT));
        settings.insert("customSettings".into(), Value::Null);
        Self {
            id,
            user_id,
            settings,
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.settings.get(key)
    }

    /// Shallow-merges `patch` into this record: each patch key overwrites
    /// the stored one, every other key keeps its value.
    pub fn apply(&mut self, patch: &PreferencesPatch) {
        for (key, value) in &patch.fields {
            self.settings.insert(key.clone(), value.clone());
        }
    }
}

/// A partial preference update: the body keys to overwrite, with any JSON
/// value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreferencesPatch {
    fields: Map<String, Value>,
}

impl PreferencesPatch {
    /// Takes every key of a request body except `id` and `userId`, which the
    /// store owns. A body that is not an object yields an empty patch.
    #[must_use]
    pub fn from_body(body: &Value) -> Self {
        let fields = body
            .as_object()
            .map(|obj| {
                obj.iter()
                    .filter(|(key, _)| !IDENTITY_KEYS.contains(&key.as_str()))
                    .map(|(key, value)| (key.clone(), value.clone()))
                    .collect()
            })
            .unwrap_or_default();
        Self { fields }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
