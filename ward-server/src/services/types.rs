use std::sync::Arc;

use serde::{Deserialize, Serialize};
use validator::Validate;
use ward_auth::AuthenticateStage;
use ward_axum::WardAxumState;
use ward_core::Pipeline;

use crate::auth::Auth;

#[derive(Clone)]
pub struct AppState {
    pub ward: WardAxumState,
    pub auth: Auth,
}

impl AppState {
    pub fn new(ward: WardAxumState, auth: Auth) -> Self {
        Self { ward, auth }
    }

    /// Tenant resolution only: registration, login, directory lookups.
    pub fn tenant_only(&self) -> Pipeline {
        self.ward.tenant_pipeline()
    }

    pub fn doctor_only(&self) -> Pipeline {
        self.ward
            .tenant_pipeline()
            .stage(Arc::new(AuthenticateStage::doctor(Arc::clone(&self.auth.authenticator))))
    }

    pub fn admin_only(&self) -> Pipeline {
        self.ward
            .tenant_pipeline()
            .stage(Arc::new(AuthenticateStage::admin(Arc::clone(&self.auth.authenticator))))
    }
}

/// Login body shared by both roles.
#[derive(Debug, Deserialize, Validate)]
pub struct Credentials {
    #[validate(length(min = 1, message = "email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenReply {
    pub token: String,
}
