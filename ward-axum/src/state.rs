use std::sync::Arc;

use ward_core::{Pipeline, ResolveTenant, TenantRegistry, WardConfigSnapshot};

/// What every Ward router shares: configuration and the tenant registry.
#[derive(Clone)]
pub struct WardAxumState {
    pub config: Arc<WardConfigSnapshot>,
    pub registry: Arc<TenantRegistry>,
}

impl WardAxumState {
    pub fn new(config: WardConfigSnapshot, registry: Arc<TenantRegistry>) -> Self {
        Self {
            config: Arc::new(config),
            registry,
        }
    }

    /// A pipeline that starts with tenant resolution.
    pub fn tenant_pipeline(&self) -> Pipeline {
        Pipeline::new().stage(Arc::new(ResolveTenant::new(Arc::clone(&self.registry))))
    }
}
