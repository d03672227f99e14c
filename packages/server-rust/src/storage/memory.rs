//! In-memory [`AccessibilityStore`] implementation.
//!
//! Created once at startup and shared by every request for the lifetime of
//! the process. Nothing is persisted; a restart starts from empty tables and
//! id counters at 1.

use async_trait::async_trait;
use clearword_core::{PreferencesPatch, User, UserId, UserPreferences};
use serde_json::{Map, Value};
use tracing::debug;

use super::table::{HashMapTable, IdSequence};
use crate::traits::AccessibilityStore;

/// Users and preference records held in two [`HashMapTable`]s with
/// independent id sequences.
pub struct MemoryStore {
    users: HashMapTable<u64, User>,
    preferences: HashMapTable<UserId, UserPreferences>,
    user_ids: IdSequence,
    preference_ids: IdSequence,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            users: HashMapTable::new(),
            preferences: HashMapTable::new(),
            user_ids: IdSequence::new(),
            preference_ids: IdSequence::new(),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AccessibilityStore for MemoryStore {
    async fn create_user(&self, fields: Map<String, Value>) -> anyhow::Result<User> {
        let user = User::new(self.user_ids.next_id(), fields);
        self.users.insert(user.id, user.clone());
        debug!(user_id = user.id, "user created");
        Ok(user)
    }

    async fn get_user(&self, id: u64) -> anyhow::Result<Option<User>> {
        Ok(self.users.get(&id))
    }

    async fn get_preferences(&self, user_id: UserId) -> anyhow::Result<Option<UserPreferences>> {
        Ok(self.preferences.get(&user_id))
    }

    async fn save_preferences(
        &self,
        user_id: UserId,
        patch: PreferencesPatch,
    ) -> anyhow::Result<UserPreferences> {
        // The preference id is drawn inside `create`, so updates never
        // consume one.
        let saved = self.preferences.upsert(
            user_id.clone(),
            || {
                let mut prefs =
                    UserPreferences::with_defaults(self.preference_ids.next_id(), user_id.clone());
                prefs.apply(&patch);
                prefs
            },
            |prefs| prefs.apply(&patch),
        );
        debug!(%user_id, preferences_id = saved.id, "preferences saved");
        Ok(saved)
    }
}
