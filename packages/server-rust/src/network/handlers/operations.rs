//! Text-operation endpoints: one `POST /api/<operation>` route per
//! [`OperationKind`], plus the processor self-test and hello endpoints.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{post, MethodRouter};
use axum::Json;
use clearword_core::{validate_operation, OperationKind, TextOperation};
use serde_json::{json, Value};
use tower::ServiceExt;
use tracing::error;

use super::AppState;
use crate::network::error::{ApiError, JsonBody};
use crate::service::OperationResponse;

/// Sentence summarized by `GET /api/test-processor`.
pub const PROCESSOR_TEST_TEXT: &str = "Hello, this is a test to check if the text processor is \
     working properly. The quick brown fox jumps over the lazy dog.";

/// Builds the `POST` route for one text operation.
pub fn operation_route(kind: OperationKind) -> MethodRouter<AppState> {
    post(
        move |State(state): State<AppState>, JsonBody(body): JsonBody| async move {
            run_operation(&state, kind, &body).await
        },
    )
}

/// Validates `body` for `kind`, then runs it through the operation pipeline.
///
/// A validation failure returns before the processor is reached. A processor
/// failure is logged here, once, and answered with a 500 envelope.
async fn run_operation(
    state: &AppState,
    kind: OperationKind,
    body: &Value,
) -> Result<Json<OperationResponse>, ApiError> {
    let op = validate_operation(kind, body)?;

    match state.operations.clone().oneshot(op).await {
        Ok(response) => Ok(Json(response)),
        Err(err) => {
            error!(operation = %kind, error = %err.detail(), "text operation failed");
            Err(err.into())
        }
    }
}

/// Summarizes a fixed sentence to check that the processor responds.
pub async fn test_processor_handler(State(state): State<AppState>) -> Response {
    let op = TextOperation::Summarize {
        text: PROCESSOR_TEST_TEXT.to_string(),
    };

    match state.operations.clone().oneshot(op).await {
        Ok(response) => Json(json!({
            "success": true,
            "message": "Text processor is working",
            "testResult": response.output,
        }))
        .into_response(),
        Err(err) => {
            error!(error = %err.detail(), "text processor self-test failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "success": false,
                    "message": "Text processor test failed",
                    "error": err.detail(),
                })),
            )
                .into_response()
        }
    }
}

pub async fn hello_handler() -> Json<Value> {
    Json(json!({ "message": "Hello from Clearword" }))
}
