//! Custom axum extractors.

use super::error::ClientError;
use super::validation::{FieldError, FromJsonValue};
use async_trait::async_trait;
use axum::{
    extract::{FromRequest, Request},
    response::IntoResponse,
};
use serde::Serialize;
use serde_json::Value;

/// A custom JSON extractor since axum's does not let us customize the
/// response.
///
/// The request body is decoded through [`FromJsonValue`] so that schema
/// violations come back as a structured 422 instead of axum's plain-text
/// rejection.
#[derive(Debug, Clone, Copy, Default)]
pub struct Json<T>(pub T);

impl<T> AsRef<T> for Json<T> {
    fn as_ref(&self) -> &T {
        &self.0
    }
}

#[async_trait]
impl<S, T> FromRequest<S> for Json<T>
where
    T: FromJsonValue,
    S: Send + Sync,
{
    type Rejection = ClientError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let axum::Json(value) = axum::Json::<Value>::from_request(req, state)
            .await
            .map_err(|e| ClientError::Validation(vec![FieldError::json_invalid(e.body_text())]))?;
        let payload = T::from_value(&value).map_err(ClientError::Validation)?;
        Ok(Json(payload))
    }
}

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> axum::response::Response {
        axum::Json(self.0).into_response()
    }
}
