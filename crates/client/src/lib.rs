//! # Patientor Client
//!
//! Typed access to the patient records REST backend.
//!
//! Handles:
//! - The [`PatientorApi`] trait that views are generic over
//! - [`HttpClient`], the `reqwest` implementation of it
//! - Mapping non-2xx responses to [`ApiError::Status`], keeping the body's `error` message
//!
//! Requests carry no timeout and are never retried; every failure is returned to the caller.

mod error;
mod http;

pub use error::{ApiError, ApiResult};
pub use http::HttpClient;

use async_trait::async_trait;
use patientor_core::{Diagnosis, Entry, NewEntry, NewPatient, Patient};

/// Operations offered by the patient records backend.
#[async_trait]
pub trait PatientorApi: Send + Sync {
    /// `GET /patients/{id}`: a patient including embedded entries.
    async fn get_patient(&self, id: &str) -> ApiResult<Patient>;

    /// `GET /patients`.
    async fn list_patients(&self) -> ApiResult<Vec<Patient>>;

    /// `POST /patients`: returns the created patient with its assigned id.
    async fn create_patient(&self, patient: &NewPatient) -> ApiResult<Patient>;

    /// `GET /diagnoses/`: the full diagnosis catalog.
    async fn get_diagnoses(&self) -> ApiResult<Vec<Diagnosis>>;

    /// `POST /patients/{id}/entries`: returns the created entry with its assigned id.
    async fn create_entry(&self, patient_id: &str, entry: &NewEntry) -> ApiResult<Entry>;
}
