use anyhow::Result;
use axum::extract::State;
use serde::Serialize;
use tracing::info;
use ward_axum::{ApiReply, Authenticated, Tenant, ValidJson};
use ward_core::models::{Admission, Doctor, Medication, NewDoctor, QueueEntry};
use ward_core::{bail_ward, Identity, Role, TenantContext, WardError};

use crate::services::types::{Credentials, TokenReply};
use crate::services::AppState;

use super::doctors_schema::{AddMedications, CreateAdmission, GetDoctor, RegisterDoctor, UpdateStatus};

#[derive(Debug, Serialize)]
pub struct Registered {
    pub token: String,
    pub doctor: Doctor,
}

#[derive(Debug, Serialize)]
pub struct Patients {
    pub patients: Vec<QueueEntry>,
}

#[derive(Debug, Serialize)]
pub struct Medications {
    pub medications: Vec<Medication>,
}

#[derive(Debug, Serialize)]
pub struct AdmissionReply {
    pub admission: Admission,
}

#[derive(Debug, Serialize)]
pub struct EntryReply {
    pub entry: QueueEntry,
}

#[derive(Debug, Serialize)]
pub struct Doctors {
    pub doctors: Vec<Doctor>,
}

#[derive(Debug, Serialize)]
pub struct DoctorReply {
    pub doctor: Doctor,
}

async fn create_doctor(state: &AppState, tenant: &TenantContext, body: RegisterDoctor) -> Result<Registered> {
    let password_hash = state.auth.doctors.hash_password(&body.password).await?;

    let doctor = tenant
        .store
        .create_doctor(NewDoctor {
            name: body.name.unwrap_or_default(),
            email: body.email,
            password_hash,
            specialization: body.specialization,
            phone: body.phone,
        })
        .await?;

    let token = state.auth.authenticator.create_access_token(&Identity {
        id: doctor.id.clone(),
        role: Role::Doctor,
        hospital: tenant.tenant_id.clone(),
        email: doctor.email.clone(),
    })?;

    info!(hospital = %tenant.tenant_id, doctor = %doctor.id, "doctor registered");
    Ok(Registered { token, doctor })
}

pub async fn register(
    State(state): State<AppState>,
    Tenant(tenant): Tenant,
    ValidJson(body): ValidJson<RegisterDoctor>,
) -> ApiReply<Registered> {
    create_doctor(&state, &tenant, body).await.into()
}

pub async fn login(
    State(state): State<AppState>,
    Tenant(tenant): Tenant,
    ValidJson(body): ValidJson<Credentials>,
) -> ApiReply<TokenReply> {
    state
        .auth
        .doctors
        .authenticate(&tenant, &body.email, &body.password)
        .await
        .map(|login| TokenReply { token: login.access_token })
        .into()
}

pub async fn get_patients(Tenant(tenant): Tenant, Authenticated(doctor): Authenticated) -> ApiReply<Patients> {
    let patients = tenant.store.queue_for_doctor(&doctor.id).await;
    patients
        .map(|patients| Patients { patients })
        .map_err(anyhow::Error::from)
        .into()
}

pub async fn add_medications(
    Tenant(tenant): Tenant,
    Authenticated(doctor): Authenticated,
    ValidJson(body): ValidJson<AddMedications>,
) -> ApiReply<Medications> {
    let meds = body.medications.into_iter().map(Into::into).collect();
    tenant
        .store
        .add_medications(&doctor.id, &body.abha_id, meds)
        .await
        .map(|medications| Medications { medications })
        .map_err(anyhow::Error::from)
        .into()
}

pub async fn create_admission(
    Tenant(tenant): Tenant,
    Authenticated(doctor): Authenticated,
    ValidJson(body): ValidJson<CreateAdmission>,
) -> ApiReply<AdmissionReply> {
    tenant
        .store
        .create_admission(&doctor.id, body.into())
        .await
        .map(|admission| AdmissionReply { admission })
        .map_err(anyhow::Error::from)
        .into()
}

pub async fn update_status(
    Tenant(tenant): Tenant,
    Authenticated(doctor): Authenticated,
    ValidJson(body): ValidJson<UpdateStatus>,
) -> ApiReply<EntryReply> {
    let res = tenant.store.set_queue_status(&body.entry_id, &doctor.id, body.status).await;
    if let Ok(entry) = &res {
        info!(hospital = %tenant.tenant_id, entry = %entry.id, status = %entry.status, "visit status changed");
    }
    res.map(|entry| EntryReply { entry })
        .map_err(anyhow::Error::from)
        .into()
}

pub async fn all_doctors(Tenant(tenant): Tenant) -> ApiReply<Doctors> {
    tenant
        .store
        .list_doctors()
        .await
        .map(|doctors| Doctors { doctors })
        .map_err(anyhow::Error::from)
        .into()
}

async fn find_doctor(tenant: &TenantContext, body: GetDoctor) -> Result<Doctor> {
    let found = match (body.id.as_deref(), body.email.as_deref()) {
        (Some(id), _) if !id.trim().is_empty() => tenant.store.get_doctor(id.trim()).await?,
        (_, Some(email)) => tenant.store.find_doctor_by_email(email).await?,
        _ => bail_ward!(validation, "id or email is required"),
    };

    found.ok_or_else(|| WardError::not_found("Doctor not found").into_anyhow())
}

pub async fn get_doctor(Tenant(tenant): Tenant, ValidJson(body): ValidJson<GetDoctor>) -> ApiReply<DoctorReply> {
    find_doctor(&tenant, body).await.map(|doctor| DoctorReply { doctor }).into()
}
