pub mod doctors_schema;
pub mod doctors_service;
pub mod doctors_shared;

pub use doctors_shared::router;
