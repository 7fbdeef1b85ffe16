pub mod doctor_dashboard;
pub mod signin;
