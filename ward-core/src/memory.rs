//! In-memory hospital store.
//!
//! One `MemoryStore` is one hospital's partition. Tables are plain vectors
//! so listings come back in insertion order.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{
    Admin, Admission, Doctor, Medication, NewAdmin, NewAdmission, NewDoctor, NewMedication,
    Patient, QueueEntry, QueueStatus,
};
use crate::store::{HospitalStore, StoreError, StoreFactory, StoreResult};
use crate::tenant::{Hospital, TenantId};

#[derive(Default)]
struct Tables {
    doctors: Vec<Doctor>,
    admins: Vec<Admin>,
    patients: HashMap<String, Patient>,
    queue: Vec<QueueEntry>,
    medications: Vec<Medication>,
    admissions: Vec<Admission>,
}

pub struct MemoryStore {
    hospital: TenantId,
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new(hospital: TenantId) -> Self {
        Self {
            hospital,
            tables: RwLock::new(Tables::default()),
        }
    }

    fn new_id() -> String {
        Uuid::new_v4().to_string()
    }

    fn normalize_email(email: &str) -> String {
        email.trim().to_ascii_lowercase()
    }
}

#[async_trait]
impl HospitalStore for MemoryStore {
    fn hospital(&self) -> &TenantId {
        &self.hospital
    }

    async fn create_doctor(&self, doctor: NewDoctor) -> StoreResult<Doctor> {
        let email = Self::normalize_email(&doctor.email);
        let mut t = self.tables.write().await;
        if t.doctors.iter().any(|d| d.email == email) {
            return Err(StoreError::Conflict(format!("Doctor already registered: {email}")));
        }

        let record = Doctor {
            id: Self::new_id(),
            name: doctor.name,
            email,
            password: doctor.password_hash,
            specialization: doctor.specialization,
            phone: doctor.phone,
            created_at: Utc::now(),
        };
        t.doctors.push(record.clone());
        Ok(record)
    }

    async fn find_doctor_by_email(&self, email: &str) -> StoreResult<Option<Doctor>> {
        let email = Self::normalize_email(email);
        let t = self.tables.read().await;
        Ok(t.doctors.iter().find(|d| d.email == email).cloned())
    }

    async fn get_doctor(&self, id: &str) -> StoreResult<Option<Doctor>> {
        let t = self.tables.read().await;
        Ok(t.doctors.iter().find(|d| d.id == id).cloned())
    }

    async fn list_doctors(&self) -> StoreResult<Vec<Doctor>> {
        let t = self.tables.read().await;
        Ok(t.doctors.clone())
    }

    async fn create_admin(&self, admin: NewAdmin) -> StoreResult<Admin> {
        let email = Self::normalize_email(&admin.email);
        let mut t = self.tables.write().await;
        if t.admins.iter().any(|a| a.email == email) {
            return Err(StoreError::Conflict(format!("Admin already registered: {email}")));
        }

        let record = Admin {
            id: Self::new_id(),
            name: admin.name,
            email,
            password: admin.password_hash,
            created_at: Utc::now(),
        };
        t.admins.push(record.clone());
        Ok(record)
    }

    async fn find_admin_by_email(&self, email: &str) -> StoreResult<Option<Admin>> {
        let email = Self::normalize_email(email);
        let t = self.tables.read().await;
        Ok(t.admins.iter().find(|a| a.email == email).cloned())
    }

    async fn enqueue_patient(&self, doctor_id: &str, patient: Patient) -> StoreResult<QueueEntry> {
        let mut t = self.tables.write().await;
        if !t.doctors.iter().any(|d| d.id == doctor_id) {
            return Err(StoreError::NotFound(format!("Doctor not found: {doctor_id}")));
        }

        t.patients.insert(patient.abha_id.clone(), patient.clone());
        let entry = QueueEntry {
            id: Self::new_id(),
            doctor_id: doctor_id.to_string(),
            patient_instance: patient,
            status: QueueStatus::Pending,
            created_at: Utc::now(),
        };
        t.queue.push(entry.clone());
        Ok(entry)
    }

    async fn queue_for_doctor(&self, doctor_id: &str) -> StoreResult<Vec<QueueEntry>> {
        let t = self.tables.read().await;
        Ok(t.queue
            .iter()
            .filter(|e| e.doctor_id == doctor_id)
            .cloned()
            .collect())
    }

    async fn set_queue_status(
        &self,
        entry_id: &str,
        doctor_id: &str,
        status: QueueStatus,
    ) -> StoreResult<QueueEntry> {
        let mut t = self.tables.write().await;
        let entry = t
            .queue
            .iter_mut()
            .find(|e| e.id == entry_id && e.doctor_id == doctor_id)
            .ok_or_else(|| StoreError::NotFound(format!("Queue entry not found: {entry_id}")))?;

        if !entry.status.can_transition_to(status) {
            return Err(StoreError::Invalid(format!(
                "Cannot move a visit from {} to {}",
                entry.status, status
            )));
        }

        entry.status = status;
        Ok(entry.clone())
    }

    async fn add_medications(
        &self,
        doctor_id: &str,
        abha_id: &str,
        medications: Vec<NewMedication>,
    ) -> StoreResult<Vec<Medication>> {
        let mut t = self.tables.write().await;
        if !t.patients.contains_key(abha_id) {
            return Err(StoreError::NotFound(format!("Patient not found: {abha_id}")));
        }

        let now = Utc::now();
        let created: Vec<Medication> = medications
            .into_iter()
            .map(|m| Medication {
                id: Self::new_id(),
                abha_id: abha_id.to_string(),
                doctor_id: doctor_id.to_string(),
                name: m.name,
                dosage: m.dosage,
                frequency: m.frequency,
                duration: m.duration,
                notes: m.notes,
                created_at: now,
            })
            .collect();

        t.medications.extend(created.iter().cloned());
        Ok(created)
    }

    async fn create_admission(&self, doctor_id: &str, admission: NewAdmission) -> StoreResult<Admission> {
        let mut t = self.tables.write().await;
        if !t.patients.contains_key(&admission.abha_id) {
            return Err(StoreError::NotFound(format!(
                "Patient not found: {}",
                admission.abha_id
            )));
        }

        let record = Admission {
            id: Self::new_id(),
            abha_id: admission.abha_id,
            doctor_id: doctor_id.to_string(),
            ward: admission.ward,
            bed: admission.bed,
            reason: admission.reason,
            admitted_at: Utc::now(),
        };
        t.admissions.push(record.clone());
        Ok(record)
    }
}

/// Opens a fresh `MemoryStore` per hospital.
#[derive(Debug, Default, Clone)]
pub struct MemoryStoreFactory;

#[async_trait]
impl StoreFactory for MemoryStoreFactory {
    async fn connect(&self, hospital: &Hospital) -> StoreResult<Arc<dyn HospitalStore>> {
        tracing::debug!(hospital = %hospital.code, url = %hospital.database_url, "opening in-memory store");
        Ok(Arc::new(MemoryStore::new(hospital.code.clone())))
    }
}
