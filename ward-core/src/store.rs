//! Per-hospital persistence.
//!
//! A `HospitalStore` is the client for exactly one hospital's partition.
//! Nothing in it takes a hospital argument: the partition is fixed when the
//! client is opened by a `StoreFactory`.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::errors::WardError;
use crate::models::{
    Admin, Admission, Doctor, Medication, NewAdmin, NewAdmission, NewDoctor, NewMedication,
    Patient, QueueEntry, QueueStatus,
};
use crate::tenant::{Hospital, TenantId};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Invalid(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl From<StoreError> for WardError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(m) => WardError::conflict(m),
            StoreError::NotFound(m) => WardError::not_found(m),
            StoreError::Invalid(m) => WardError::validation(m),
            StoreError::Unavailable(m) => WardError::persistence(m),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait HospitalStore: Send + Sync {
    /// The partition this client is bound to.
    fn hospital(&self) -> &TenantId;

    async fn create_doctor(&self, doctor: NewDoctor) -> StoreResult<Doctor>;
    async fn find_doctor_by_email(&self, email: &str) -> StoreResult<Option<Doctor>>;
    async fn get_doctor(&self, id: &str) -> StoreResult<Option<Doctor>>;
    async fn list_doctors(&self) -> StoreResult<Vec<Doctor>>;

    async fn create_admin(&self, admin: NewAdmin) -> StoreResult<Admin>;
    async fn find_admin_by_email(&self, email: &str) -> StoreResult<Option<Admin>>;

    /// Queue a visit for a doctor; the patient record is created or refreshed.
    async fn enqueue_patient(&self, doctor_id: &str, patient: Patient) -> StoreResult<QueueEntry>;
    /// Entries for one doctor in the order they were queued.
    async fn queue_for_doctor(&self, doctor_id: &str) -> StoreResult<Vec<QueueEntry>>;
    async fn set_queue_status(
        &self,
        entry_id: &str,
        doctor_id: &str,
        status: QueueStatus,
    ) -> StoreResult<QueueEntry>;

    async fn add_medications(
        &self,
        doctor_id: &str,
        abha_id: &str,
        medications: Vec<NewMedication>,
    ) -> StoreResult<Vec<Medication>>;
    async fn create_admission(&self, doctor_id: &str, admission: NewAdmission) -> StoreResult<Admission>;
}

/// Opens a store client for a provisioned hospital.
#[async_trait]
pub trait StoreFactory: Send + Sync {
    async fn connect(&self, hospital: &Hospital) -> StoreResult<Arc<dyn HospitalStore>>;
}
