pub mod admins;
pub mod doctors;
pub mod types;

pub use types::AppState;
