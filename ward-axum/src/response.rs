use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use ward_core::{ApiResponse, WardError};

use crate::error::error_response;

/// `ApiResponse<T>` as an axum response.
#[derive(Debug)]
pub struct ApiReply<T>(pub ApiResponse<T>);

impl<T> ApiReply<T> {
    pub fn ok(payload: T) -> Self {
        Self(ApiResponse::Success(payload))
    }
}

impl<T> From<anyhow::Result<T>> for ApiReply<T> {
    fn from(res: anyhow::Result<T>) -> Self {
        Self(res.into())
    }
}

impl<T> From<WardError> for ApiReply<T> {
    fn from(err: WardError) -> Self {
        Self(ApiResponse::Failure(err))
    }
}

impl<T: Serialize> IntoResponse for ApiReply<T> {
    fn into_response(self) -> Response {
        match self.0 {
            ApiResponse::Failure(err) => error_response(&err),
            success => (StatusCode::OK, Json(success.to_json())).into_response(),
        }
    }
}
