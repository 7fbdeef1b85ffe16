use std::sync::Arc;

use anyhow::Result;
use ward_axum::{WardApp, WardAxumState};
use ward_core::{MemoryStoreFactory, TenantRegistry, WardConfigSnapshot};

use crate::config;

/// The bare app: configuration plus a registry holding every configured
/// hospital. Store clients open on first use.
pub async fn ward_app(config: WardConfigSnapshot) -> Result<WardApp> {
    let registry = Arc::new(TenantRegistry::new(Arc::new(MemoryStoreFactory)));
    for hospital in config::hospitals(&config) {
        registry.provision(hospital).await;
    }

    Ok(WardApp::new(WardAxumState::new(config, registry)))
}
