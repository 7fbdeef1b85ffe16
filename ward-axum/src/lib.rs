//! ward-axum: Axum adapter for Ward.
//!
//! Routes declare a `Pipeline` with `PipelineExt::pipeline`; handlers read
//! what the stages attached through the `Tenant` and `Authenticated`
//! extractors and return `ApiReply`.

pub mod app;
pub mod extract;
pub mod middlewares;
pub mod params;
pub mod response;
pub mod state;
mod error;

pub use error::WardAxumError;
pub use state::WardAxumState;

pub use app::{WardApp, REQUEST_ID_HEADER};
pub use extract::{Authenticated, Tenant, ValidJson};
pub use middlewares::PipelineExt;
pub use response::ApiReply;

/// Re-export so downstream crates build routers against the same axum.
pub use axum;
