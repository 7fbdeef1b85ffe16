//! Multi-tenant types for Ward.
//!
//! A tenant is a hospital. Every request is resolved to exactly one
//! hospital before any data access, and the `TenantContext` it receives
//! carries the store client for that hospital's partition only.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::{OnceCell, RwLock};
use tracing::{info, warn};

use crate::errors::WardError;
use crate::pipeline::{Flow, RequestContext, Stage};
use crate::store::{HospitalStore, StoreFactory};

/// Header carrying the hospital code.
pub const TENANT_HEADER: &str = "code";

/// A hospital code such as `H1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TenantId(pub String);

impl TenantId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TenantId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for TenantId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A provisioned hospital.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hospital {
    pub code: TenantId,
    pub name: String,
    /// Connection string handed to the store factory.
    pub database_url: String,
}

impl Hospital {
    pub fn new(code: impl Into<String>, name: impl Into<String>, database_url: impl Into<String>) -> Self {
        Self {
            code: TenantId(code.into()),
            name: name.into(),
            database_url: database_url.into(),
        }
    }
}

/// Context carried with every tenant-scoped operation.
#[derive(Clone)]
pub struct TenantContext {
    pub tenant_id: TenantId,
    pub hospital_name: String,
    pub store: Arc<dyn HospitalStore>,
}

impl fmt::Debug for TenantContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TenantContext")
            .field("tenant_id", &self.tenant_id)
            .field("hospital_name", &self.hospital_name)
            .finish()
    }
}

type ClientCell = Arc<OnceCell<Arc<dyn HospitalStore>>>;

/// A provisioned hospital and the cell its client is opened into.
struct Provisioned {
    hospital: Hospital,
    client: ClientCell,
}

/// Provisioned hospitals plus their lazily opened store clients.
///
/// A client is opened on the first request for its hospital and kept until
/// the hospital is deprovisioned or provisioned again. Concurrent first
/// requests share one open. The hospital and its cell live in one map entry,
/// so removing the entry drops the client with it.
pub struct TenantRegistry {
    tenants: RwLock<HashMap<TenantId, Provisioned>>,
    factory: Arc<dyn StoreFactory>,
}

impl TenantRegistry {
    pub fn new(factory: Arc<dyn StoreFactory>) -> Self {
        Self {
            tenants: RwLock::new(HashMap::new()),
            factory,
        }
    }

    /// Add a hospital. Provisioning an existing code replaces it and
    /// discards its client.
    pub async fn provision(&self, hospital: Hospital) {
        info!(hospital = %hospital.code, name = %hospital.name, "hospital provisioned");
        let entry = Provisioned {
            hospital: hospital.clone(),
            client: ClientCell::default(),
        };
        self.tenants.write().await.insert(hospital.code, entry);
    }

    /// Remove a hospital and drop its cached client. Returns whether it existed.
    pub async fn deprovision(&self, code: &str) -> bool {
        let id = TenantId::from(code);
        let removed = self.tenants.write().await.remove(&id).is_some();
        if removed {
            info!(hospital = %id, "hospital deprovisioned");
        }
        removed
    }

    pub async fn is_provisioned(&self, code: &str) -> bool {
        self.tenants.read().await.contains_key(&TenantId::from(code))
    }

    pub async fn hospital_codes(&self) -> Vec<TenantId> {
        let mut codes: Vec<TenantId> = self.tenants.read().await.keys().cloned().collect();
        codes.sort();
        codes
    }

    /// Number of hospitals with an open client.
    pub async fn open_clients(&self) -> usize {
        self.tenants
            .read()
            .await
            .values()
            .filter(|p| p.client.initialized())
            .count()
    }

    pub async fn resolve(&self, code: &str) -> Result<TenantContext, WardError> {
        let code = code.trim();
        if code.is_empty() {
            return Err(WardError::tenant_not_found("Hospital code is required"));
        }

        let id = TenantId::from(code);
        let (hospital, cell) = {
            let tenants = self.tenants.read().await;
            let entry = tenants
                .get(&id)
                .ok_or_else(|| WardError::tenant_not_found(format!("Unknown hospital code: {code}")))?;
            (entry.hospital.clone(), Arc::clone(&entry.client))
        };

        // A cell detached by a concurrent deprovision still serves this
        // request but is never reachable from the registry again.
        let store = cell
            .get_or_try_init(|| async {
                let store = self.factory.connect(&hospital).await?;
                info!(hospital = %hospital.code, "store client opened");
                Ok::<_, crate::store::StoreError>(store)
            })
            .await
            .map_err(|e| {
                warn!(hospital = %id, error = %e, "store client failed to open");
                WardError::from(e)
            })?
            .clone();

        Ok(TenantContext {
            tenant_id: id,
            hospital_name: hospital.name,
            store,
        })
    }
}

/// First stage of every route: attach the hospital's store client.
pub struct ResolveTenant {
    registry: Arc<TenantRegistry>,
}

impl ResolveTenant {
    pub fn new(registry: Arc<TenantRegistry>) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl Stage for ResolveTenant {
    fn name(&self) -> &'static str {
        "resolve-tenant"
    }

    async fn run(&self, mut ctx: RequestContext) -> Flow {
        let code = ctx
            .header(TENANT_HEADER)
            .map(|s| s.to_string())
            .or_else(|| ctx.body_tenant.clone())
            .unwrap_or_default();

        match self.registry.resolve(&code).await {
            Ok(tenant) => {
                ctx.tenant = Some(tenant);
                Flow::Continue(ctx)
            }
            Err(err) => Flow::Respond(err),
        }
    }
}
