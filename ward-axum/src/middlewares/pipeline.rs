//! Runs a `Pipeline` in front of a set of routes.
//!
//! The resulting `RequestContext` is stored in the request extensions for
//! the extractors in `crate::extract`. A short-circuit renders the stage's
//! error and the handler is never called.

use axum::{
    body::Body,
    extract::{Request, State},
    middleware::{self, Next},
    response::Response,
    Router,
};
use ward_core::{Flow, Pipeline, WardError, TENANT_HEADER};

use crate::error::error_response;
use crate::params::{context_from_parts, is_json, tenant_from_body};

/// Largest JSON body buffered while looking for a `code` field.
pub const MAX_BUFFERED_BODY: usize = 1024 * 1024;

pub async fn run_pipeline(State(pipeline): State<Pipeline>, req: Request, next: Next) -> Response {
    let (parts, body) = req.into_parts();
    let mut ctx = context_from_parts(&parts);

    let body = if ctx.header(TENANT_HEADER).is_none() && is_json(&parts.headers) {
        let bytes = match axum::body::to_bytes(body, MAX_BUFFERED_BODY).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::debug!(error = %e, "request body could not be buffered");
                return error_response(&WardError::validation("Request body is too large or unreadable"));
            }
        };
        if let Some(code) = tenant_from_body(&bytes) {
            ctx = ctx.with_body_tenant(code);
        }
        Body::from(bytes)
    } else {
        body
    };

    match pipeline.run(ctx).await {
        Flow::Continue(ctx) => {
            let mut req = Request::from_parts(parts, body);
            req.extensions_mut().insert(ctx);
            next.run(req).await
        }
        Flow::Respond(err) => error_response(&err),
    }
}

pub trait PipelineExt {
    /// Guard every route added so far with `pipeline`.
    fn pipeline(self, pipeline: Pipeline) -> Self;
}

impl<S> PipelineExt for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn pipeline(self, pipeline: Pipeline) -> Self {
        self.route_layer(middleware::from_fn_with_state(pipeline, run_pipeline))
    }
}
