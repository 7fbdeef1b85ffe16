// Local authentication strategy.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::OnceCell;
use ward_auth::Authenticator;
use ward_core::{HospitalStore, Identity, Role, TenantContext, WardError};

use crate::password::PasswordHasher;

/// A stored account as the strategy needs to see it.
#[derive(Clone, Debug)]
pub struct LocalEntity {
    pub id: String,
    pub email: String,
    pub password_hash: String,
}

/// Finds accounts of one role by email inside a hospital's store.
#[async_trait]
pub trait LocalEntityResolver: Send + Sync {
    fn role(&self) -> Role;

    async fn resolve_entity(&self, store: &dyn HospitalStore, email: &str) -> Result<Option<LocalEntity>>;
}

pub struct DoctorResolver;

#[async_trait]
impl LocalEntityResolver for DoctorResolver {
    fn role(&self) -> Role {
        Role::Doctor
    }

    async fn resolve_entity(&self, store: &dyn HospitalStore, email: &str) -> Result<Option<LocalEntity>> {
        Ok(store.find_doctor_by_email(email).await?.map(|d| LocalEntity {
            id: d.id,
            email: d.email,
            password_hash: d.password,
        }))
    }
}

pub struct AdminResolver;

#[async_trait]
impl LocalEntityResolver for AdminResolver {
    fn role(&self) -> Role {
        Role::Admin
    }

    async fn resolve_entity(&self, store: &dyn HospitalStore, email: &str) -> Result<Option<LocalEntity>> {
        Ok(store.find_admin_by_email(email).await?.map(|a| LocalEntity {
            id: a.id,
            email: a.email,
            password_hash: a.password,
        }))
    }
}

#[derive(Clone, Debug)]
pub struct LocalStrategyOptions {
    /// Same message for unknown email and wrong password.
    pub error_message: String,
    pub hash_cost: u32,
}

impl Default for LocalStrategyOptions {
    fn default() -> Self {
        Self {
            error_message: "Invalid login".to_string(),
            hash_cost: 10,
        }
    }
}

/// Result of a successful login.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalLogin {
    pub access_token: String,
    #[serde(skip)]
    pub identity: Identity,
}

pub struct LocalStrategy {
    auth: Arc<Authenticator>,
    resolver: Arc<dyn LocalEntityResolver>,
    options: LocalStrategyOptions,
    hasher: PasswordHasher,
    /// Checked against when the email is unknown, at the configured cost.
    dummy_hash: OnceCell<String>,
}

impl LocalStrategy {
    pub fn new(auth: Arc<Authenticator>, resolver: Arc<dyn LocalEntityResolver>) -> Self {
        let options = LocalStrategyOptions::default();
        Self {
            auth,
            resolver,
            hasher: PasswordHasher::new(options.hash_cost),
            options,
            dummy_hash: OnceCell::new(),
        }
    }

    pub fn doctors(auth: Arc<Authenticator>) -> Self {
        Self::new(auth, Arc::new(DoctorResolver))
    }

    pub fn admins(auth: Arc<Authenticator>) -> Self {
        Self::new(auth, Arc::new(AdminResolver))
    }

    pub fn with_options(mut self, options: LocalStrategyOptions) -> Self {
        self.hasher = PasswordHasher::new(options.hash_cost);
        self.dummy_hash = OnceCell::new();
        self.options = options;
        self
    }

    pub fn role(&self) -> Role {
        self.resolver.role()
    }

    pub async fn hash_password(&self, password: &str) -> Result<String> {
        self.hasher.hash(password).await
    }

    async fn dummy_hash(&self) -> Result<&str> {
        let hash = self
            .dummy_hash
            .get_or_try_init(|| self.hasher.hash("ward-unknown-account"))
            .await?;
        Ok(hash.as_str())
    }

    fn rejected(&self) -> anyhow::Error {
        WardError::unauthorized(&self.options.error_message).into_anyhow()
    }

    /// Check credentials against the tenant's store and issue a token bound
    /// to that tenant.
    pub async fn authenticate(&self, tenant: &TenantContext, email: &str, password: &str) -> Result<LocalLogin> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(self.rejected());
        }

        let Some(entity) = self.resolver.resolve_entity(tenant.store.as_ref(), email).await? else {
            // Same bcrypt work as a wrong password.
            self.hasher.verify(password, self.dummy_hash().await?).await?;
            tracing::debug!(hospital = %tenant.tenant_id, role = %self.role(), "login for unknown email");
            return Err(self.rejected());
        };

        if !self.hasher.verify(password, &entity.password_hash).await? {
            tracing::debug!(hospital = %tenant.tenant_id, user = %entity.id, "login with wrong password");
            return Err(self.rejected());
        }

        let identity = Identity {
            id: entity.id,
            role: self.role(),
            hospital: tenant.tenant_id.clone(),
            email: entity.email,
        };
        let access_token = self.auth.create_access_token(&identity)?;

        Ok(LocalLogin { access_token, identity })
    }
}
