use anyhow::Result;
use axum::extract::State;
use serde::Serialize;
use tracing::info;
use ward_axum::{ApiReply, Authenticated, Tenant, ValidJson};
use ward_core::models::{Admin, NewAdmin, QueueEntry};
use ward_core::{Identity, Role, TenantContext};

use crate::services::types::{Credentials, TokenReply};
use crate::services::AppState;

use super::admins_schema::{QueuePatient, RegisterAdmin};

#[derive(Debug, Serialize)]
pub struct Registered {
    pub token: String,
    pub admin: Admin,
}

#[derive(Debug, Serialize)]
pub struct Queued {
    pub entry: QueueEntry,
}

async fn create_admin(state: &AppState, tenant: &TenantContext, body: RegisterAdmin) -> Result<Registered> {
    let password_hash = state.auth.admins.hash_password(&body.password).await?;

    let admin = tenant
        .store
        .create_admin(NewAdmin {
            name: body.name.unwrap_or_default(),
            email: body.email,
            password_hash,
        })
        .await?;

    let token = state.auth.authenticator.create_access_token(&Identity {
        id: admin.id.clone(),
        role: Role::Admin,
        hospital: tenant.tenant_id.clone(),
        email: admin.email.clone(),
    })?;

    info!(hospital = %tenant.tenant_id, admin = %admin.id, "admin registered");
    Ok(Registered { token, admin })
}

pub async fn register(
    State(state): State<AppState>,
    Tenant(tenant): Tenant,
    ValidJson(body): ValidJson<RegisterAdmin>,
) -> ApiReply<Registered> {
    create_admin(&state, &tenant, body).await.into()
}

pub async fn login(
    State(state): State<AppState>,
    Tenant(tenant): Tenant,
    ValidJson(body): ValidJson<Credentials>,
) -> ApiReply<TokenReply> {
    state
        .auth
        .admins
        .authenticate(&tenant, &body.email, &body.password)
        .await
        .map(|login| TokenReply { token: login.access_token })
        .into()
}

pub async fn queue_patient(
    Tenant(tenant): Tenant,
    Authenticated(admin): Authenticated,
    ValidJson(body): ValidJson<QueuePatient>,
) -> ApiReply<Queued> {
    let res = tenant.store.enqueue_patient(&body.doctor_id, body.patient.into()).await;
    if let Ok(entry) = &res {
        info!(hospital = %tenant.tenant_id, admin = %admin.id, doctor = %entry.doctor_id, "patient queued");
    }
    res.map(|entry| Queued { entry })
        .map_err(anyhow::Error::from)
        .into()
}
