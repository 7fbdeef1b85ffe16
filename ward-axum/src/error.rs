use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use ward_core::{ErrorKind, WardError};

/// Handler error type: any `anyhow::Error`, rendered as a `WardError` body.
#[derive(Debug)]
pub struct WardAxumError(pub anyhow::Error);

impl From<anyhow::Error> for WardAxumError {
    fn from(e: anyhow::Error) -> Self {
        Self(e)
    }
}

impl From<WardError> for WardAxumError {
    fn from(e: WardError) -> Self {
        Self(e.into_anyhow())
    }
}

/// Status line plus sanitized JSON body for a `WardError`.
pub(crate) fn error_response(err: &WardError) -> Response {
    if err.kind == ErrorKind::Unexpected {
        tracing::error!(error = ?err, "unexpected error");
    }
    let safe = err.sanitize_for_client();
    let status = StatusCode::from_u16(safe.code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(safe.to_json())).into_response()
}

impl IntoResponse for WardAxumError {
    fn into_response(self) -> Response {
        error_response(&WardError::normalize(self.0))
    }
}
