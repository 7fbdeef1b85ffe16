pub mod admins_schema;
pub mod admins_service;
pub mod admins_shared;

pub use admins_shared::router;
