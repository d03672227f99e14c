//! The JSON error envelope every handler returns on failure.
//!
//! All application errors leave the server as `{"message": ...}`, with an
//! extra `"error"` key for processing failures. Framework rejections
//! (malformed JSON, wrong content type, oversized body) keep their own status
//! code but are rewritten into the same envelope.

use std::any::Any;

use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use clearword_core::ValidationError;
use serde_json::{json, Value};

use crate::service::OperationError;

/// Message used for any failure that has no more specific description.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";

/// Handler-level error, converted into the JSON envelope.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Missing or mistyped input. 400.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Lookup miss. 404 with a fixed message.
    #[error("{0}")]
    NotFound(&'static str),
    /// A downstream call failed. 500 with `message` and `error`.
    #[error("{message}: {error}")]
    Processing { message: &'static str, error: String },
    /// Request rejected before reaching the handler.
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },
}

impl ApiError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Processing { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Rejected { status, .. } => *status,
        }
    }

    fn body(&self) -> Value {
        match self {
            Self::Processing { message, error } => json!({
                "message": message,
                "error": error,
            }),
            other => json!({ "message": other.to_string() }),
        }
    }
}

impl From<OperationError> for ApiError {
    fn from(err: OperationError) -> Self {
        Self::Processing {
            message: err.kind().failure_message(),
            error: err.detail(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.body())).into_response()
    }
}

/// JSON body extractor whose rejection is an [`ApiError`].
///
/// Any well-formed JSON value is accepted; shape checks belong to the
/// handler's validation step.
#[derive(Debug)]
pub struct JsonBody(pub Value);

impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<Value>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(ApiError::Rejected {
                status: rejection.status(),
                message: rejection.body_text(),
            }),
        }
    }
}

/// Response for a handler panic caught by `CatchPanicLayer`.
#[allow(clippy::needless_pass_by_value)]
pub fn panic_response(_panic: Box<dyn Any + Send + 'static>) -> Response {
    ApiError::Rejected {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        message: INTERNAL_ERROR_MESSAGE.to_string(),
    }
    .into_response()
}

/// Fallback for unmatched routes.
pub async fn not_found_handler() -> ApiError {
    ApiError::Rejected {
        status: StatusCode::NOT_FOUND,
        message: "Not Found".to_string(),
    }
}

/// Fallback for a matched path called with a method it does not serve.
pub async fn method_not_allowed_handler() -> ApiError {
    ApiError::Rejected {
        status: StatusCode::METHOD_NOT_ALLOWED,
        message: "Method Not Allowed".to_string(),
    }
}
