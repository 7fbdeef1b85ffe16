//! Extractors over the context the pipeline attached.

use std::borrow::Cow;

use axum::{
    extract::{FromRequest, FromRequestParts, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};
use validator::{Validate, ValidationErrors, ValidationErrorsKind};
use ward_core::{Identity, RequestContext, TenantContext, WardError};

use crate::WardAxumError;

fn context(parts: &Parts) -> Option<&RequestContext> {
    parts.extensions.get::<RequestContext>()
}

/// The hospital the request resolved to.
#[derive(Clone, Debug)]
pub struct Tenant(pub TenantContext);

impl<S> FromRequestParts<S> for Tenant
where
    S: Send + Sync,
{
    type Rejection = WardAxumError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        context(parts)
            .and_then(|ctx| ctx.tenant.clone())
            .map(Tenant)
            .ok_or_else(|| WardError::tenant_not_found("Hospital code is required").into())
    }
}

/// The caller the auth stage verified.
#[derive(Clone, Debug)]
pub struct Authenticated(pub Identity);

impl<S> FromRequestParts<S> for Authenticated
where
    S: Send + Sync,
{
    type Rejection = WardAxumError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        context(parts)
            .and_then(|ctx| ctx.identity.clone())
            .map(Authenticated)
            .ok_or_else(|| WardError::unauthorized("Not authenticated").into())
    }
}

/// JSON body that must deserialize and pass its `validator` rules.
#[derive(Debug)]
pub struct ValidJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = WardAxumError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|rejection| {
            WardError::validation("Failed to parse the request body as JSON")
                .with_errors(json!({"_schema": [rejection.body_text()]}))
        })?;

        value.validate().map_err(|errs| {
            WardError::validation("Request body validation failed").with_errors(validation_errors_to_json(&errs))
        })?;

        Ok(ValidJson(value))
    }
}

fn friendly_message(code: &str) -> Option<&'static str> {
    match code {
        "required" => Some("is required"),
        "email" => Some("must be a valid email"),
        "length" => Some("has invalid length"),
        "range" => Some("is out of range"),
        _ => None,
    }
}

fn join_path(prefix: &str, field: &str) -> String {
    if prefix.is_empty() {
        field.to_string()
    } else {
        format!("{prefix}.{field}")
    }
}

fn push_validation_errors(out: &mut Map<String, Value>, prefix: &str, errs: &ValidationErrors) {
    for (field, kind) in errs.errors() {
        let key = join_path(prefix, field);
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                for e in field_errors {
                    let msg = e
                        .message
                        .as_ref()
                        .map(Cow::to_string)
                        .or_else(|| friendly_message(&e.code).map(|m| m.to_string()))
                        .unwrap_or_else(|| e.code.to_string());
                    if let Value::Array(list) = out.entry(key.clone()).or_insert_with(|| Value::Array(Vec::new())) {
                        list.push(Value::String(msg));
                    }
                }
            }
            ValidationErrorsKind::Struct(nested) => push_validation_errors(out, &key, nested),
            ValidationErrorsKind::List(items) => {
                for (idx, nested) in items {
                    push_validation_errors(out, &format!("{key}[{idx}]"), nested);
                }
            }
        }
    }
}

/// `{field: [messages]}`, nested fields as dotted paths.
pub fn validation_errors_to_json(errs: &ValidationErrors) -> Value {
    let mut out = Map::new();
    push_validation_errors(&mut out, "", errs);
    Value::Object(out)
}
