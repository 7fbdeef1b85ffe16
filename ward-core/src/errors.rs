//! # Errors
//!
//! Ward carries one structured error type through every layer.
//! Core goals:
//! - one kind per failure class, each with a fixed status code
//! - can be carried through anyhow::Error (stages, stores, handlers)
//! - transport-agnostic (the HTTP crate decides how to send it)
//!
//! On the wire a failure is always `{success: false, message, name, code, className}`,
//! optionally with a per-field `errors` object.

use std::fmt;

use anyhow::Error as AnyError;
use serde_json::{json, Value};

use crate::store::StoreError;

/// A convenience result type for Ward core APIs.
pub type WardResult<T> = std::result::Result<T, AnyError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    TenantNotFound, // 404
    Unauthorized,   // 401
    Forbidden,      // 403
    Validation,     // 400
    NotFound,       // 404
    Conflict,       // 409
    Persistence,    // 503
    Unexpected,     // 500
}

impl ErrorKind {
    pub fn status_code(&self) -> u16 {
        match self {
            ErrorKind::TenantNotFound => 404,
            ErrorKind::Unauthorized => 401,
            ErrorKind::Forbidden => 403,
            ErrorKind::Validation => 400,
            ErrorKind::NotFound => 404,
            ErrorKind::Conflict => 409,
            ErrorKind::Persistence => 503,
            ErrorKind::Unexpected => 500,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ErrorKind::TenantNotFound => "TenantNotFound",
            ErrorKind::Unauthorized => "Unauthorized",
            ErrorKind::Forbidden => "Forbidden",
            ErrorKind::Validation => "ValidationError",
            ErrorKind::NotFound => "NotFound",
            ErrorKind::Conflict => "Conflict",
            ErrorKind::Persistence => "PersistenceError",
            ErrorKind::Unexpected => "UnexpectedError",
        }
    }

    pub fn class_name(&self) -> &'static str {
        match self {
            ErrorKind::TenantNotFound => "tenant-not-found",
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::Forbidden => "forbidden",
            ErrorKind::Validation => "validation-error",
            ErrorKind::NotFound => "not-found",
            ErrorKind::Conflict => "conflict",
            ErrorKind::Persistence => "persistence-error",
            ErrorKind::Unexpected => "unexpected-error",
        }
    }
}

/// A structured Ward error that can live inside `anyhow::Error`.
#[derive(Debug)]
pub struct WardError {
    pub kind: ErrorKind,
    pub message: String,
    pub errors: Option<Value>,
    pub source: Option<AnyError>,
}

impl WardError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            errors: None,
            source: None,
        }
    }

    pub fn with_errors(mut self, errors: Value) -> Self {
        self.errors = Some(errors);
        self
    }

    pub fn with_source(mut self, source: AnyError) -> Self {
        self.source = Some(source);
        self
    }

    pub fn code(&self) -> u16 {
        self.kind.status_code()
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn class_name(&self) -> &'static str {
        self.kind.class_name()
    }

    /// Convert into `anyhow::Error` so it flows through stages and handlers.
    pub fn into_anyhow(self) -> AnyError {
        AnyError::new(self)
    }

    /// Find a `WardError` anywhere in an `anyhow` chain.
    pub fn from_anyhow(err: &AnyError) -> Option<&WardError> {
        err.chain().find_map(|e| e.downcast_ref::<WardError>())
    }

    /// Turn any error into a WardError:
    /// - if it's already a WardError, keep it (lossless)
    /// - store errors map onto their kinds
    /// - otherwise wrap as Unexpected
    pub fn normalize(err: AnyError) -> WardError {
        let err = match err.downcast::<WardError>() {
            Ok(ward) => return ward,
            Err(other) => other,
        };
        let err = match err.downcast::<StoreError>() {
            Ok(store) => return WardError::from(store),
            Err(other) => other,
        };
        match WardError::from_anyhow(&err) {
            Some(inner) => inner.sanitize_for_client(),
            None => WardError::unexpected(err.to_string()).with_source(err),
        }
    }

    /// Copy suitable for clients: the inner `source` is dropped and
    /// unexpected errors keep only a generic message.
    pub fn sanitize_for_client(&self) -> WardError {
        let message = match self.kind {
            ErrorKind::Unexpected => "Internal server error".to_string(),
            _ => self.message.clone(),
        };
        WardError {
            kind: self.kind,
            message,
            errors: self.errors.clone(),
            source: None,
        }
    }

    pub fn to_json(&self) -> Value {
        let mut base = json!({
            "success": false,
            "name": self.name(),
            "message": self.message,
            "code": self.code(),
            "className": self.class_name(),
        });

        if let Some(e) = &self.errors {
            base["errors"] = e.clone();
        }
        base
    }

    pub fn tenant_not_found(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::TenantNotFound, msg)
    }
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthorized, msg)
    }
    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Forbidden, msg)
    }
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, msg)
    }
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, msg)
    }
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, msg)
    }
    pub fn persistence(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Persistence, msg)
    }
    pub fn unexpected(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unexpected, msg)
    }
}

impl fmt::Display for WardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.name(), self.code(), self.message)
    }
}

impl std::error::Error for WardError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Convenience helper for "bail with WardError".
#[macro_export]
macro_rules! bail_ward {
    ($ctor:ident, $msg:expr) => {
        return Err($crate::errors::WardError::$ctor($msg).into_anyhow())
    };
    ($ctor:ident, $fmt:expr, $($arg:tt)*) => {
        return Err($crate::errors::WardError::$ctor(format!($fmt, $($arg)*)).into_anyhow())
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn status_codes_follow_taxonomy() {
        assert_eq!(WardError::tenant_not_found("x").code(), 404);
        assert_eq!(WardError::unauthorized("x").code(), 401);
        assert_eq!(WardError::forbidden("x").code(), 403);
        assert_eq!(WardError::validation("x").code(), 400);
        assert_eq!(WardError::conflict("x").code(), 409);
        assert_eq!(WardError::persistence("x").code(), 503);
        assert_eq!(WardError::unexpected("x").code(), 500);
    }

    #[test]
    fn normalize_keeps_ward_errors_behind_context() {
        let err = Err::<(), _>(WardError::not_found("Doctor not found").into_anyhow())
            .context("loading doctor")
            .unwrap_err();

        let ward = WardError::normalize(err);
        assert_eq!(ward.kind, ErrorKind::NotFound);
        assert_eq!(ward.message, "Doctor not found");
    }

    #[test]
    fn normalize_maps_store_errors() {
        let err: AnyError = StoreError::Conflict("Email already registered".into()).into();
        let ward = WardError::normalize(err);
        assert_eq!(ward.kind, ErrorKind::Conflict);
        assert_eq!(ward.code(), 409);
    }

    #[test]
    fn normalize_wraps_foreign_errors_as_unexpected() {
        let ward = WardError::normalize(anyhow::anyhow!("boom"));
        assert_eq!(ward.kind, ErrorKind::Unexpected);
        assert!(ward.source.is_some());
        let safe = ward.sanitize_for_client();
        assert!(safe.source.is_none());
        assert_eq!(safe.message, "Internal server error");
    }

    #[test]
    fn json_shape_carries_success_false() {
        let body = WardError::validation("Missing fields")
            .with_errors(json!({"email": ["required"]}))
            .to_json();

        assert_eq!(body["success"], json!(false));
        assert_eq!(body["name"], "ValidationError");
        assert_eq!(body["className"], "validation-error");
        assert_eq!(body["code"], 400);
        assert_eq!(body["errors"]["email"][0], "required");
    }
}
