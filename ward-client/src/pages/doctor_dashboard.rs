//! Doctor dashboard: the queue of patients waiting for the signed-in doctor.

use serde::Deserialize;

use crate::api::{failure_message, ApiClient};
use crate::storage::{LocalStorage, DOCTOR_TOKEN_KEY};

/// One card on the dashboard.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatientCard {
    /// The patient's ABHA id.
    pub id: String,
    pub name: String,
    pub age: u32,
    pub gender: String,
    pub reason: String,
    pub status: String,
}

/// `Pending` shows as `Waiting`; other statuses are shown as sent.
pub fn display_status(status: &str) -> String {
    match status {
        "Pending" => "Waiting".to_string(),
        other => other.to_string(),
    }
}

#[derive(Debug, Deserialize)]
struct PatientInstance {
    #[serde(rename = "abhaId")]
    abha_id: String,
    name: String,
    age: u32,
    #[serde(rename = "Gender")]
    gender: String,
    reason: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QueueItem {
    patient_instance: PatientInstance,
    status: String,
}

impl From<QueueItem> for PatientCard {
    fn from(item: QueueItem) -> Self {
        let p = item.patient_instance;
        PatientCard {
            id: p.abha_id,
            name: p.name,
            age: p.age,
            gender: p.gender,
            reason: p.reason,
            status: display_status(&item.status),
        }
    }
}

#[derive(Debug, Default)]
pub struct DoctorDashboard {
    pub patients: Vec<PatientCard>,
    pub error: Option<String>,
}

impl DoctorDashboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map a `getPatients` body into cards.
    pub fn cards_from(body: &serde_json::Value) -> anyhow::Result<Vec<PatientCard>> {
        let Some(list) = body.get("patients") else {
            return Ok(Vec::new());
        };
        let items: Vec<QueueItem> = serde_json::from_value(list.clone())?;
        Ok(items.into_iter().map(PatientCard::from).collect())
    }

    /// Load on mount. On failure the previous cards stay and `error` is set.
    pub async fn load(&mut self, api: &ApiClient, storage: &LocalStorage) {
        self.error = None;
        let token = storage.get_item(DOCTOR_TOKEN_KEY);

        let body = match api.get_json("/api/doctor/getPatients", token.as_deref()).await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(error = %e, "error fetching patients");
                self.error = Some(e.to_string());
                return;
            }
        };

        if let Some(message) = failure_message(&body) {
            tracing::warn!(%message, "failed to fetch patients");
            self.error = Some(message);
            return;
        }

        match Self::cards_from(&body) {
            Ok(cards) => self.patients = cards,
            Err(e) => self.error = Some(e.to_string()),
        }
    }
}
