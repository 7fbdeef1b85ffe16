//! Email and password login for Ward.

pub mod password;
pub mod strategy;

pub use password::PasswordHasher;
pub use strategy::{
    AdminResolver, DoctorResolver, LocalEntity, LocalEntityResolver, LocalLogin, LocalStrategy,
    LocalStrategyOptions,
};
