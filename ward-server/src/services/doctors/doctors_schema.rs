//! Request bodies for `/api/doctor`. A `code` field, when present, is read
//! by tenant resolution and otherwise ignored here.

use serde::{Deserialize, Serialize};
use validator::Validate;
use ward_core::models::{NewAdmission, NewMedication, QueueStatus};

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterDoctor {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,

    #[validate(email(message = "email must be a valid email"))]
    pub email: String,

    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,

    pub specialization: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct MedicationBody {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    #[validate(length(min = 1, message = "dosage must not be empty"))]
    pub dosage: String,
    #[validate(length(min = 1, message = "frequency must not be empty"))]
    pub frequency: String,
    pub duration: Option<String>,
    pub notes: Option<String>,
}

impl From<MedicationBody> for NewMedication {
    fn from(m: MedicationBody) -> Self {
        NewMedication {
            name: m.name,
            dosage: m.dosage,
            frequency: m.frequency,
            duration: m.duration,
            notes: m.notes,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddMedications {
    #[validate(length(min = 1, message = "abhaId is required"))]
    pub abha_id: String,

    #[validate(length(min = 1, message = "at least one medication is required"), nested)]
    pub medications: Vec<MedicationBody>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAdmission {
    #[validate(length(min = 1, message = "abhaId is required"))]
    pub abha_id: String,
    #[validate(length(min = 1, message = "ward is required"))]
    pub ward: String,
    pub bed: Option<String>,
    #[validate(length(min = 1, message = "reason is required"))]
    pub reason: String,
}

impl From<CreateAdmission> for NewAdmission {
    fn from(a: CreateAdmission) -> Self {
        NewAdmission {
            abha_id: a.abha_id,
            ward: a.ward,
            bed: a.bed,
            reason: a.reason,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatus {
    #[validate(length(min = 1, message = "entryId is required"))]
    pub entry_id: String,
    pub status: QueueStatus,
}

/// Directory lookup by id or, failing that, by email.
#[derive(Debug, Deserialize, Validate)]
pub struct GetDoctor {
    pub id: Option<String>,
    #[validate(email(message = "email must be a valid email"))]
    pub email: Option<String>,
}
