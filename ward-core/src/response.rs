//! Tagged response envelope.
//!
//! Every handler outcome is either a payload or a `WardError`; the JSON
//! form flattens the payload next to `success: true`.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::errors::WardError;

#[derive(Debug)]
pub enum ApiResponse<T> {
    Success(T),
    Failure(WardError),
}

impl<T> ApiResponse<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, ApiResponse::Success(_))
    }

    pub fn status_code(&self) -> u16 {
        match self {
            ApiResponse::Success(_) => 200,
            ApiResponse::Failure(err) => err.code(),
        }
    }
}

impl<T: Serialize> ApiResponse<T> {
    /// Success payloads that serialize to an object are flattened;
    /// anything else lands under `data`.
    pub fn to_json(&self) -> Value {
        match self {
            ApiResponse::Success(payload) => match serde_json::to_value(payload) {
                Ok(Value::Object(fields)) => {
                    let mut out = Map::with_capacity(fields.len() + 1);
                    out.insert("success".to_string(), Value::Bool(true));
                    out.extend(fields);
                    Value::Object(out)
                }
                Ok(other) => {
                    let mut out = Map::new();
                    out.insert("success".to_string(), Value::Bool(true));
                    out.insert("data".to_string(), other);
                    Value::Object(out)
                }
                Err(e) => WardError::unexpected(e.to_string()).to_json(),
            },
            ApiResponse::Failure(err) => err.sanitize_for_client().to_json(),
        }
    }
}

impl<T> From<anyhow::Result<T>> for ApiResponse<T> {
    fn from(res: anyhow::Result<T>) -> Self {
        match res {
            Ok(v) => ApiResponse::Success(v),
            Err(e) => ApiResponse::Failure(WardError::normalize(e)),
        }
    }
}

impl<T> From<WardError> for ApiResponse<T> {
    fn from(err: WardError) -> Self {
        ApiResponse::Failure(err)
    }
}
