use async_trait::async_trait;
use clearword_core::{PreferencesPatch, User, UserId, UserPreferences};
use serde_json::{Map, Value};

/// Keyed storage for users and their accessibility preferences.
///
/// Implementations own their tables outright: every read returns an owned
/// copy, and the only way to change a preference record is
/// [`save_preferences`](Self::save_preferences). Each mutation must be atomic
/// with respect to concurrent callers on the same key.
///
/// Implementations: memory (default, tests). The async signatures leave room
/// for a persistent backend.
#[async_trait]
pub trait AccessibilityStore: Send + Sync {
    /// Allocate the next user id, store `{...fields, id}`, and return it.
    async fn create_user(&self, fields: Map<String, Value>) -> anyhow::Result<User>;

    /// Look up a user by id.
    async fn get_user(&self, id: u64) -> anyhow::Result<Option<User>>;

    /// Look up the preference record for `user_id`.
    async fn get_preferences(&self, user_id: UserId) -> anyhow::Result<Option<UserPreferences>>;

    /// Merge `patch` into the record for `user_id`, creating it from defaults
    /// (with a newly allocated preference id) if none exists yet.
    async fn save_preferences(
        &self,
        user_id: UserId,
        patch: PreferencesPatch,
    ) -> anyhow::Result<UserPreferences>;
}
