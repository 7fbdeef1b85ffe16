use axum::http::request::Parts;
use axum::http::HeaderMap;
use serde_json::Value;
use ward_core::{RequestContext, TENANT_HEADER};

/// Build the pipeline context from request parts. Non-UTF-8 header values
/// are skipped.
pub fn context_from_parts(parts: &Parts) -> RequestContext {
    let mut ctx = RequestContext::new(parts.method.as_str(), parts.uri.path());
    copy_headers(&mut ctx, &parts.headers);
    ctx
}

fn copy_headers(ctx: &mut RequestContext, headers: &HeaderMap) {
    for (k, v) in headers.iter() {
        if let Ok(s) = v.to_str() {
            // HeaderName is already lowercase.
            ctx.headers.insert(k.as_str().to_string(), s.to_string());
        }
    }
}

pub(crate) fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(axum::http::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.trim_start().starts_with("application/json"))
        .unwrap_or(false)
}

/// `code` from a JSON object body, if it is a non-empty string.
pub(crate) fn tenant_from_body(bytes: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(bytes).ok()?;
    value
        .get(TENANT_HEADER)
        .and_then(|v| v.as_str())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
