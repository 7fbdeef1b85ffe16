//! Sign-in forms for doctors and admins.

use std::marker::PhantomData;

use serde::Serialize;

use crate::api::{failure_message, ApiClient};
use crate::storage::{LocalStorage, ADMIN_TOKEN_KEY, DOCTOR_TOKEN_KEY};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SignInRole {
    Doctor,
    Admin,
}

impl SignInRole {
    pub fn login_path(&self) -> &'static str {
        match self {
            SignInRole::Doctor => "/api/doctor/login",
            SignInRole::Admin => "/api/admin/login",
        }
    }

    pub fn token_key(&self) -> &'static str {
        match self {
            SignInRole::Doctor => DOCTOR_TOKEN_KEY,
            SignInRole::Admin => ADMIN_TOKEN_KEY,
        }
    }
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct SignInForm {
    pub email: String,
    pub password: String,
}

/// Which login a form posts to. Implemented by the two portal markers.
pub trait Portal {
    const ROLE: SignInRole;
}

#[derive(Debug)]
pub struct DoctorPortal;

impl Portal for DoctorPortal {
    const ROLE: SignInRole = SignInRole::Doctor;
}

#[derive(Debug)]
pub struct AdminPortal;

impl Portal for AdminPortal {
    const ROLE: SignInRole = SignInRole::Admin;
}

#[derive(Debug)]
pub struct SignIn<P: Portal> {
    pub form: SignInForm,
    pub error: Option<String>,
    portal: PhantomData<P>,
}

pub type DoctorSignIn = SignIn<DoctorPortal>;
pub type AdminSignIn = SignIn<AdminPortal>;

impl<P: Portal> Default for SignIn<P> {
    fn default() -> Self {
        Self {
            form: SignInForm::default(),
            error: None,
            portal: PhantomData,
        }
    }
}

impl<P: Portal> SignIn<P> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn role(&self) -> SignInRole {
        P::ROLE
    }

    /// Input change by element id; unknown ids are ignored.
    pub fn set_field(&mut self, id: &str, value: impl Into<String>) {
        match id {
            "email" => self.form.email = value.into(),
            "password" => self.form.password = value.into(),
            _ => {}
        }
    }

    /// Submit the form. Returns whether a token was stored.
    pub async fn submit(&mut self, api: &ApiClient, storage: &LocalStorage) -> bool {
        self.error = None;

        if self.form.email.is_empty() || self.form.password.is_empty() {
            self.error = Some("Please fill in all fields.".to_string());
            return false;
        }

        let body = match api.post_json(P::ROLE.login_path(), &self.form, None).await {
            Ok(body) => body,
            Err(e) => {
                self.error = Some(e.to_string());
                return false;
            }
        };

        if let Some(message) = failure_message(&body) {
            self.error = Some(message);
            return false;
        }

        match body.get("token").and_then(|t| t.as_str()) {
            Some(token) => {
                storage.set_item(P::ROLE.token_key(), token);
                tracing::info!(role = ?P::ROLE, "login successful");
                true
            }
            None => {
                self.error = Some("Login response did not include a token".to_string());
                false
            }
        }
    }
}
