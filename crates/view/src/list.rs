//! Patient list: fetching all patients, adding one, and rendering the list.

use patientor_client::{ApiResult, PatientorApi};
use patientor_core::{Action, Gender, NewPatient, Patient, StateContainer, Store};
use std::fmt;

/// Fetch every patient and seed the store with them.
///
/// Patients already in the store are kept as they are.
pub async fn fetch_patient_list<A>(api: &A, store: &mut StateContainer) -> ApiResult<usize>
where
    A: PatientorApi + ?Sized,
{
    let patients = api.list_patients().await.map_err(|err| {
        tracing::error!(error = %err, "patient list fetch failed");
        err
    })?;
    let count = patients.len();
    store.dispatch(Action::SetPatientList(patients));
    Ok(count)
}

/// Create a patient and add the server's record to the store.
pub async fn create_patient<A>(
    api: &A,
    store: &mut StateContainer,
    patient: &NewPatient,
) -> ApiResult<Patient>
where
    A: PatientorApi + ?Sized,
{
    let created = api.create_patient(patient).await?;
    tracing::info!(patient_id = %created.id, "patient created");
    store.dispatch(Action::AddPatient(created.clone()));
    Ok(created)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatientListRow {
    pub id: String,
    pub name: String,
    pub gender: Gender,
    pub occupation: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatientListPage {
    pub rows: Vec<PatientListRow>,
}

impl PatientListPage {
    /// One row per patient in the store, ordered by name then id.
    pub fn build(store: &Store) -> Self {
        let mut rows: Vec<PatientListRow> = store
            .patients()
            .values()
            .map(|p| PatientListRow {
                id: p.id.clone(),
                name: p.name.clone(),
                gender: p.gender,
                occupation: p.occupation.clone(),
            })
            .collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Self { rows }
    }
}

impl fmt::Display for PatientListPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Patient list")?;
        if self.rows.is_empty() {
            return writeln!(f, "(no patients)");
        }
        let name_width = self
            .rows
            .iter()
            .map(|r| r.name.chars().count())
            .max()
            .unwrap_or(0)
            .max("Name".len());
        writeln!(f, "{:<name_width$}  Gender  Occupation  Id", "Name")?;
        for row in &self.rows {
            writeln!(
                f,
                "{:<name_width$}  {:<6}  {}  {}",
                row.name,
                row.gender.symbol(),
                row.occupation,
                row.id
            )?;
        }
        Ok(())
    }
}
