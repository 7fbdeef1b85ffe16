//! ward-auth: hospital-bound access tokens.
//!
//! `Authenticator` signs and verifies tokens; `AuthenticateStage` plugs it
//! into a route pipeline after tenant resolution.

pub mod core;
pub mod jwt;
pub mod options;
pub mod stage;

pub use crate::core::{extract_bearer_token, Authenticator};
pub use jwt::{Claims, JwtProvider};
pub use options::{AuthOptions, JwtAlgorithm, JwtOptions};
pub use stage::AuthenticateStage;
