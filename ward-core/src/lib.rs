//! ward-core: framework-agnostic core for Ward.
//!
//! Holds the pieces every transport shares: the tenant registry, the
//! request pipeline, structured errors, configuration and the
//! per-hospital store.

pub mod config;
pub mod errors;
pub mod identity;
pub mod memory;
pub mod models;
pub mod pipeline;
pub mod response;
pub mod store;
pub mod tenant;

pub use config::{load_env_config, WardConfig, WardConfigSnapshot};
pub use errors::{ErrorKind, WardError, WardResult};
pub use identity::{Identity, Role};
pub use memory::{MemoryStore, MemoryStoreFactory};
pub use pipeline::{Flow, Pipeline, RequestContext, Stage};
pub use response::ApiResponse;
pub use store::{HospitalStore, StoreError, StoreFactory, StoreResult};
pub use tenant::{Hospital, ResolveTenant, TenantContext, TenantId, TenantRegistry, TENANT_HEADER};
