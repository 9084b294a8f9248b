//! Types for reporting errors that happened during a request.
//!
//! If your function interacts with the database or validates user input,
//! you likely want to return a [`ApiResult`].

use super::extract::Json;
use super::validation::FieldError;
use axum::{extract::rejection::PathRejection, response::IntoResponse};
use hyper::StatusCode;
use serde::{Deserialize, Serialize};
use tower_http::catch_panic::ResponseForPanic;
use utoipa::ToSchema;

/// A standard error response body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// A description of the error.
    detail: Detail,
}

/// The `detail` field of an error response: a plain message for simple
/// errors, a list of field errors for validation failures.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum Detail {
    /// A single human-readable message.
    Message(String),
    /// One entry per violated field.
    Fields(Vec<FieldError>),
}

impl ErrorBody {
    pub(crate) fn message(message: impl Into<String>) -> Self {
        Self {
            detail: Detail::Message(message.into()),
        }
    }

    pub(crate) fn fields(fields: Vec<FieldError>) -> Self {
        Self {
            detail: Detail::Fields(fields),
        }
    }

    /// The error detail.
    pub fn detail(&self) -> &Detail {
        &self.detail
    }
}

/// An error from our API.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// An error caused by the client.
    #[error("{0}")]
    ClientError(#[from] ClientError),
    /// An internal error.
    #[error("{0}")]
    InternalError(#[from] InternalError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            ApiError::ClientError(e) => e.into_response(),
            ApiError::InternalError(e) => {
                tracing::error!("internal error: {}", e);
                e.into_response()
            }
        }
    }
}

/// The result of calling API-related functions.
pub type ApiResult<T> = Result<T, ApiError>;

impl From<mongodb::error::Error> for ApiError {
    fn from(e: mongodb::error::Error) -> Self {
        ApiError::InternalError(InternalError::Database(e))
    }
}

/// Errors caused by the client.
/// The client can do something to fix these.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Some illegal operation was attempted.
    #[error("{0}")]
    BadRequest(String),
    /// The item was not found.
    #[error("Item not found")]
    NotFound,
    /// An item with the same name already exists.
    #[error("Item with this name already exists")]
    Conflict,
    /// The payload failed schema validation.
    #[error("invalid request payload")]
    Validation(Vec<FieldError>),
    /// Custom error.
    #[error("{1}")]
    Custom(StatusCode, String),
}

impl Default for ClientError {
    fn default() -> Self {
        Self::BadRequest("Bad Request".to_string())
    }
}

impl From<PathRejection> for ClientError {
    fn from(value: PathRejection) -> Self {
        ClientError::Custom(value.status(), value.body_text())
    }
}

impl IntoResponse for ClientError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Conflict => StatusCode::CONFLICT,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Custom(status, _) => *status,
        };
        let body = match self {
            Self::Validation(fields) => ErrorBody::fields(fields),
            other => ErrorBody::message(other.to_string()),
        };
        (status, Json(body)).into_response()
    }
}

/// An internal error.
/// The client cannot do anything about this.
#[derive(Debug, thiserror::Error)]
pub enum InternalError {
    /// A database driver error.
    #[error("{0}")]
    Database(#[from] mongodb::error::Error),
    /// Other miscellaneous errors.
    #[error("{0}")]
    Other(String),
}

impl IntoResponse for InternalError {
    fn into_response(self) -> axum::response::Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorBody::message("Internal server error")),
        )
            .into_response()
    }
}

/// A handler for converting panics into proper responses for the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PanicHandler;

impl ResponseForPanic for PanicHandler {
    type ResponseBody = axum::body::Body;

    fn response_for_panic(
        &mut self,
        _: Box<dyn std::any::Any + Send + 'static>,
    ) -> http::Response<Self::ResponseBody> {
        ApiError::InternalError(InternalError::Other("Panic".to_string())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_serializes_to_plain_detail() {
        let body = ErrorBody::message(ClientError::NotFound.to_string());
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(serde_json::json!({"detail": "Item not found"}), json);
    }

    #[test]
    fn validation_serializes_to_field_list() {
        let body = ErrorBody::fields(vec![FieldError::missing("name")]);
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            serde_json::json!({
                "detail": [{
                    "loc": ["body", "name"],
                    "type": "missing",
                    "msg": "Field required",
                }]
            }),
            json
        );
    }
}
