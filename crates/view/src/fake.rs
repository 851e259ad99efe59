//! Scripted in-memory backend for view tests.

use async_trait::async_trait;
use patientor_client::{ApiError, ApiResult, PatientorApi};
use patientor_core::{Diagnosis, Entry, NewEntry, NewPatient, Patient};
use std::sync::Mutex;

#[derive(Default)]
pub(crate) struct FakeApi {
    pub patients: Vec<Patient>,
    /// `None` makes the catalog request fail with HTTP 500.
    pub diagnoses: Option<Vec<Diagnosis>>,
    /// When set, entry creation fails with this status and optional `error` message.
    pub entry_rejection: Option<(u16, Option<String>)>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeApi {
    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

fn status(url: &str, status: u16, message: Option<String>) -> ApiError {
    ApiError::Status {
        url: format!("fake://{url}"),
        status,
        message,
    }
}

#[async_trait]
impl PatientorApi for FakeApi {
    async fn get_patient(&self, id: &str) -> ApiResult<Patient> {
        self.record(format!("get_patient {id}"));
        self.patients
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| status("patients", 404, None))
    }

    async fn list_patients(&self) -> ApiResult<Vec<Patient>> {
        self.record("list_patients".into());
        Ok(self.patients.clone())
    }

    async fn create_patient(&self, patient: &NewPatient) -> ApiResult<Patient> {
        self.record(format!("create_patient {}", patient.name));
        Ok(Patient {
            id: format!("p{}", self.patients.len() + 1),
            name: patient.name.clone(),
            occupation: patient.occupation.clone(),
            gender: patient.gender,
            ssn: patient.ssn.clone(),
            date_of_birth: patient.date_of_birth.clone(),
            entries: Vec::new(),
        })
    }

    async fn get_diagnoses(&self) -> ApiResult<Vec<Diagnosis>> {
        self.record("get_diagnoses".into());
        self.diagnoses
            .clone()
            .ok_or_else(|| status("diagnoses/", 500, None))
    }

    async fn create_entry(&self, patient_id: &str, entry: &NewEntry) -> ApiResult<Entry> {
        self.record(format!("create_entry {patient_id}"));
        match &self.entry_rejection {
            Some((code, message)) => Err(status("entries", *code, message.clone())),
            None => Ok(entry.clone().with_id("created-1")),
        }
    }
}
