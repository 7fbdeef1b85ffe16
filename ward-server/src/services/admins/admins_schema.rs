use serde::Deserialize;
use validator::Validate;
use ward_core::models::Patient;

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterAdmin {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,

    #[validate(email(message = "email must be a valid email"))]
    pub email: String,

    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct PatientBody {
    #[serde(rename = "abhaId")]
    #[validate(length(min = 1, message = "abhaId is required"))]
    pub abha_id: String,

    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,

    #[validate(range(max = 150, message = "age is out of range"))]
    pub age: u32,

    #[serde(rename = "Gender", alias = "gender")]
    #[validate(length(min = 1, message = "Gender is required"))]
    pub gender: String,

    #[validate(length(min = 1, message = "reason is required"))]
    pub reason: String,
}

impl From<PatientBody> for Patient {
    fn from(p: PatientBody) -> Self {
        Patient {
            abha_id: p.abha_id,
            name: p.name,
            age: p.age,
            gender: p.gender,
            reason: p.reason,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct QueuePatient {
    #[validate(length(min = 1, message = "doctorId is required"))]
    pub doctor_id: String,

    #[validate(nested)]
    pub patient: PatientBody,
}
