//! Accessibility preference endpoints.
//!
//! - `POST /api/preferences` -- create-or-merge the record named by `userId`
//! - `GET /api/preferences/{user_id}` -- read one record

use axum::extract::{Path, State};
use axum::Json;
use clearword_core::{PreferencesPatch, UserId, UserPreferences, ValidationError};
use tracing::error;

use super::AppState;
use crate::network::error::{ApiError, JsonBody};

const PREFERENCES_NOT_FOUND: &str = "User preferences not found";

/// Merges the body into the caller's preference record, creating it on the
/// first write. Never 404s.
///
/// `userId` selects the record; every other key except `id` is merged as-is.
pub async fn save_preferences_handler(
    State(state): State<AppState>,
    JsonBody(body): JsonBody,
) -> Result<Json<UserPreferences>, ApiError> {
    let user_id = UserId::from_json(body.get("userId"))?;
    let patch = PreferencesPatch::from_body(&body);

    match state.store.save_preferences(user_id.clone(), patch).await {
        Ok(prefs) => Ok(Json(prefs)),
        Err(err) => {
            error!(%user_id, error = %err, "failed to save preferences");
            Err(ApiError::Processing {
                message: "Error saving user preferences",
                error: err.to_string(),
            })
        }
    }
}

/// Returns the stored record for `user_id`.
///
/// A segment that is not a number can never have been written, so it is
/// reported as not found rather than rejected.
pub async fn get_preferences_handler(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> Result<Json<UserPreferences>, ApiError> {
    if raw.trim().is_empty() {
        return Err(ValidationError::UserIdRequired.into());
    }
    let Some(user_id) = UserId::from_path(&raw) else {
        return Err(ApiError::NotFound(PREFERENCES_NOT_FOUND));
    };

    match state.store.get_preferences(user_id.clone()).await {
        Ok(Some(prefs)) => Ok(Json(prefs)),
        Ok(None) => Err(ApiError::NotFound(PREFERENCES_NOT_FOUND)),
        Err(err) => {
            error!(%user_id, error = %err, "failed to load preferences");
            Err(ApiError::Processing {
                message: "Error getting user preferences",
                error: err.to_string(),
            })
        }
    }
}

/// `GET /api/preferences/` with an empty id segment.
pub async fn missing_user_id_handler() -> ApiError {
    ValidationError::UserIdRequired.into()
}
