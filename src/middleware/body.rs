use async_trait::async_trait;
use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, FromRequest, Request},
    http::StatusCode,
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::ApiError;
use crate::validation::Schema;

/// Raw request body, parsed only when the handler asks for it, which is
/// after the ownership check.
pub struct JsonBody(Bytes);

#[async_trait]
impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        Bytes::from_request(req, state)
            .await
            .map(JsonBody)
            .map_err(rejection_error)
    }
}

/// Oversized bodies stay 413; anything else that stops the body being read is a 400
fn rejection_error(rejection: BytesRejection) -> ApiError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::payload_too_large("Request body too large")
    } else {
        ApiError::bad_request(rejection.body_text())
    }
}

impl JsonBody {
    /// Parse the body; an empty body is an empty object
    pub fn value(&self) -> Result<Value, ApiError> {
        if self.0.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Object(Map::new()));
        }
        serde_json::from_slice(&self.0).map_err(|e| {
            tracing::debug!("Rejected malformed JSON body: {}", e);
            ApiError::bad_request("Malformed JSON body")
        })
    }

    /// Parse, validate against `schema`, then deserialize into `T`
    pub fn validated<T: DeserializeOwned>(self, schema: &Schema) -> Result<T, ApiError> {
        let value = self.value()?;
        schema.validate(&value)?;
        serde_json::from_value(value).map_err(|e| {
            tracing::debug!("Rejected body after schema check: {}", e);
            ApiError::bad_request("Malformed JSON body")
        })
    }
}
