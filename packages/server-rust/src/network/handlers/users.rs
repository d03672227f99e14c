//! User endpoints: create and read-by-id.

use axum::extract::{Path, State};
use axum::Json;
use clearword_core::{User, ValidationError};
use tracing::error;

use super::AppState;
use crate::network::error::{ApiError, JsonBody};

const USER_NOT_FOUND: &str = "User not found";

/// Stores the body as a new user under the next id. A caller-supplied `id`
/// is replaced.
pub async fn create_user_handler(
    State(state): State<AppState>,
    JsonBody(body): JsonBody,
) -> Result<Json<User>, ApiError> {
    let serde_json::Value::Object(fields) = body else {
        return Err(ValidationError::UserPayloadNotObject.into());
    };

    state.store.create_user(fields).await.map(Json).map_err(|err| {
        error!(error = %err, "failed to create user");
        ApiError::Processing {
            message: "Error creating user",
            error: err.to_string(),
        }
    })
}

pub async fn get_user_handler(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> Result<Json<User>, ApiError> {
    let Ok(id) = raw.parse::<u64>() else {
        return Err(ApiError::NotFound(USER_NOT_FOUND));
    };

    match state.store.get_user(id).await {
        Ok(Some(user)) => Ok(Json(user)),
        Ok(None) => Err(ApiError::NotFound(USER_NOT_FOUND)),
        Err(err) => {
            error!(user_id = id, error = %err, "failed to load user");
            Err(ApiError::Processing {
                message: "Error getting user",
                error: err.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::StatusCode;
    use serde_json::json;

    use crate::network::handlers::test_support::{get, post, router, router_with, BrokenStore};
    use crate::service::EchoProcessor;

    #[tokio::test]
    async fn ids_increase_across_reads() {
        let app = router();

        let (status, a) = post(&app, "/api/users", json!({"name": "a"})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(a, json!({"id": 1, "name": "a"}));

        let (status, fetched) = get(&app, "/api/users/1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched, a);

        let (_, b) = post(&app, "/api/users", json!({"name": "b"})).await;
        assert_eq!(b, json!({"id": 2, "name": "b"}));
    }

    #[tokio::test]
    async fn supplied_id_is_overwritten() {
        let (_, user) = post(&router(), "/api/users", json!({"id": 40, "name": "x"})).await;
        assert_eq!(user["id"], 1);
    }

    #[tokio::test]
    async fn non_object_payload_is_400() {
        let (status, json) = post(&router(), "/api/users", json!([1, 2])).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json, json!({"message": "User payload must be a JSON object"}));
    }

    #[tokio::test]
    async fn unknown_or_invalid_id_is_404() {
        let app = router();
        for uri in ["/api/users/9", "/api/users/nope"] {
            let (status, json) = get(&app, uri).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
            assert_eq!(json, json!({"message": "User not found"}));
        }
    }

    #[tokio::test]
    async fn storage_failure_is_500() {
        let app = router_with(Arc::new(BrokenStore), Arc::new(EchoProcessor));
        let (status, json) = post(&app, "/api/users", json!({"name": "a"})).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"], "store offline");
    }
}
