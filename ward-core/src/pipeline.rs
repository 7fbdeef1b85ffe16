//! Request pipeline.
//!
//! A route declares an ordered list of stages. Each stage receives the
//! request context and either hands back an augmented context or stops the
//! request with an error. Stages after a short-circuit never run, and
//! neither does the handler.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::WardError;
use crate::identity::Identity;
use crate::tenant::TenantContext;

/// Everything a stage may read or attach before the handler runs.
#[derive(Clone, Default)]
pub struct RequestContext {
    pub method: String,
    pub path: String,
    /// Header names are stored lowercased.
    pub headers: HashMap<String, String>,
    /// `code` field lifted from a JSON body, used when the header is absent.
    pub body_tenant: Option<String>,
    pub tenant: Option<TenantContext>,
    pub identity: Option<Identity>,
}

impl RequestContext {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    pub fn with_body_tenant(mut self, code: impl Into<String>) -> Self {
        self.body_tenant = Some(code.into());
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(|s| s.as_str())
    }

    pub fn require_tenant(&self) -> Result<&TenantContext, WardError> {
        self.tenant
            .as_ref()
            .ok_or_else(|| WardError::tenant_not_found("Hospital code is required"))
    }

    pub fn require_identity(&self) -> Result<&Identity, WardError> {
        self.identity
            .as_ref()
            .ok_or_else(|| WardError::unauthorized("Not authenticated"))
    }
}

impl fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestContext")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("tenant", &self.tenant.as_ref().map(|t| &t.tenant_id))
            .field("identity", &self.identity)
            .finish()
    }
}

/// Outcome of a single stage.
#[derive(Debug)]
pub enum Flow {
    Continue(RequestContext),
    Respond(WardError),
}

#[async_trait]
pub trait Stage: Send + Sync {
    fn name(&self) -> &'static str;

    async fn run(&self, ctx: RequestContext) -> Flow;
}

#[derive(Clone, Default)]
pub struct Pipeline {
    stages: Vec<Arc<dyn Stage>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// Append a stage; stages run in the order they were added.
    pub fn stage(mut self, stage: Arc<dyn Stage>) -> Self {
        self.stages.push(stage);
        self
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub async fn run(&self, mut ctx: RequestContext) -> Flow {
        for stage in &self.stages {
            match stage.run(ctx).await {
                Flow::Continue(next) => ctx = next,
                Flow::Respond(err) => {
                    tracing::debug!(stage = stage.name(), error = %err, "pipeline short-circuit");
                    return Flow::Respond(err);
                }
            }
        }
        Flow::Continue(ctx)
    }
}
