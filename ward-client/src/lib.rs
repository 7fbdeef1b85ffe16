//! ward-client: the pages of the Ward frontend as plain Rust state.
//!
//! Each page holds its view state, talks to the API through `ApiClient`
//! and reads or writes tokens in `LocalStorage`. There is no caching or
//! retrying; a failed call leaves a message in the page's `error`.

pub mod api;
pub mod pages;
pub mod storage;

pub use api::ApiClient;
pub use pages::doctor_dashboard::{display_status, DoctorDashboard, PatientCard};
pub use pages::signin::{AdminPortal, AdminSignIn, DoctorPortal, DoctorSignIn, Portal, SignIn, SignInForm, SignInRole};
pub use storage::{LocalStorage, ADMIN_TOKEN_KEY, DOCTOR_TOKEN_KEY};
