//! The patient page view.
//!
//! A `PatientView` owns the state that is local to one page: where the initial load is, and
//! whether the "add entry" modal is open (with its last error). Shared data lives in the
//! store and is only changed through `StateContainer::dispatch`.
//!
//! ## Load state machine
//!
//! ```text
//! NotStarted ──load()──▶ Loading ──ok──▶ Loaded
//!                            │
//!                            └──err──▶ Failed(reason)
//! ```
//!
//! `load` only acts from `NotStarted`; calling it again is a no-op. This makes the fetch
//! one-shot without relying on a flag being observed between renders. A load whose future is
//! dropped mid-flight returns to `NotStarted`.

use crate::error::{LoadError, LoadStep, SubmitError};
use crate::page::PatientPage;
use patientor_client::PatientorApi;
use patientor_core::{Action, Entry, NewEntry, StateContainer, Store};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    NotStarted,
    Loading,
    Loaded,
    Failed(String),
}

/// Result of a call to [`PatientView::load`].
#[derive(Debug)]
pub enum LoadOutcome {
    /// The patient, catalog and entries were fetched and dispatched.
    Loaded,
    /// A step failed; later steps were not run.
    Failed(LoadError),
    /// Nothing to do: no patient id, or the load already ran.
    Skipped,
}

/// State of the "add entry" modal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryModal {
    pub open: bool,
    pub error: Option<String>,
}

/// What the view shows for the current state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    /// No patient id, or the patient is not in the store yet.
    Nothing,
    Loading,
    Error(String),
    Page(PatientPage),
}

#[derive(Debug, Clone)]
pub struct PatientView {
    patient_id: Option<String>,
    load_state: LoadState,
    modal: EntryModal,
}

impl PatientView {
    /// A view for the route parameter `patient_id`, if one was given.
    pub fn new(patient_id: Option<String>) -> Self {
        Self {
            patient_id,
            load_state: LoadState::NotStarted,
            modal: EntryModal::default(),
        }
    }

    pub fn for_patient(patient_id: impl Into<String>) -> Self {
        Self::new(Some(patient_id.into()))
    }

    pub fn patient_id(&self) -> Option<&str> {
        self.patient_id.as_deref()
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    pub fn modal(&self) -> &EntryModal {
        &self.modal
    }

    pub fn open_modal(&mut self) {
        self.modal.open = true;
    }

    /// Close the modal and forget its error.
    pub fn close_modal(&mut self) {
        self.modal = EntryModal::default();
    }

    /// Run the initial load once.
    ///
    /// Steps run strictly in order and the first failure ends the chain:
    /// 1. fetch the patient, dispatch `UpdatePatient`;
    /// 2. fetch the diagnosis catalog, dispatch `SetDiagnoses`;
    /// 3. dispatch `SetEntries` with the fetched patient's embedded entries.
    ///
    /// Failures are logged and recorded as `LoadState::Failed`. If the returned future is
    /// dropped before it completes, the state goes back to `NotStarted` so a later call can
    /// retry. Actions dispatched before the drop stay in the store.
    pub async fn load<A>(&mut self, api: &A, store: &mut StateContainer) -> LoadOutcome
    where
        A: PatientorApi + ?Sized,
    {
        if self.load_state != LoadState::NotStarted {
            return LoadOutcome::Skipped;
        }
        let Some(id) = self.patient_id.clone() else {
            return LoadOutcome::Skipped;
        };

        tracing::info!(patient_id = %id, "loading patient");
        let guard = LoadingGuard::enter(&mut self.load_state);

        match fetch_patient_data(api, store, &id).await {
            Ok(()) => {
                tracing::info!(patient_id = %id, "patient loaded");
                guard.finish(LoadState::Loaded);
                LoadOutcome::Loaded
            }
            Err(err) => {
                tracing::error!(patient_id = %id, error = %err, "patient load failed");
                guard.finish(LoadState::Failed(err.to_string()));
                LoadOutcome::Failed(err)
            }
        }
    }

    /// Submit a new entry for this patient.
    ///
    /// On success the created entry is dispatched and the modal closed. On failure the modal
    /// stays as it is and shows the backend's `error` message, or a generic one.
    pub async fn submit_new_entry<A>(
        &mut self,
        api: &A,
        store: &mut StateContainer,
        entry: &NewEntry,
    ) -> Result<Entry, SubmitError>
    where
        A: PatientorApi + ?Sized,
    {
        let Some(id) = self.patient_id.clone() else {
            return Err(SubmitError::NoPatient);
        };

        match api.create_entry(&id, entry).await {
            Ok(created) => {
                tracing::info!(patient_id = %id, entry_id = %created.id, "entry created");
                store.dispatch(Action::AddEntry(created.clone()));
                self.close_modal();
                Ok(created)
            }
            Err(err) => {
                tracing::warn!(patient_id = %id, error = %err, "entry creation failed");
                self.modal.error = Some(err.user_message().to_owned());
                Err(SubmitError::Rejected(err))
            }
        }
    }

    /// The page for this patient, if it is in the store.
    pub fn page(&self, store: &Store) -> Option<PatientPage> {
        let patient = store.patient(self.patient_id.as_deref()?)?;
        Some(PatientPage::build(patient, store))
    }

    /// Choose what to show from the load state and the store.
    ///
    /// A failed load always renders the error, even when the patient step succeeded and the
    /// patient is already in the store.
    pub fn render(&self, store: &Store) -> Rendered {
        if self.patient_id.is_none() {
            return Rendered::Nothing;
        }
        if let LoadState::Failed(reason) = &self.load_state {
            return Rendered::Error(reason.clone());
        }
        if let Some(page) = self.page(store) {
            return Rendered::Page(page);
        }
        match &self.load_state {
            LoadState::Loading => Rendered::Loading,
            _ => Rendered::Nothing,
        }
    }
}

/// Holds a view in `Loading`; resets it to `NotStarted` if dropped without `finish`.
struct LoadingGuard<'a> {
    state: &'a mut LoadState,
}

impl<'a> LoadingGuard<'a> {
    fn enter(state: &'a mut LoadState) -> Self {
        *state = LoadState::Loading;
        Self { state }
    }

    fn finish(self, outcome: LoadState) {
        *self.state = outcome;
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        if *self.state == LoadState::Loading {
            *self.state = LoadState::NotStarted;
        }
    }
}

async fn fetch_patient_data<A>(
    api: &A,
    store: &mut StateContainer,
    id: &str,
) -> Result<(), LoadError>
where
    A: PatientorApi + ?Sized,
{
    let patient = api.get_patient(id).await.map_err(|source| LoadError {
        step: LoadStep::Patient,
        source,
    })?;
    let entries = patient.entries.clone();
    store.dispatch(Action::UpdatePatient(patient.into()));

    let diagnoses = api.get_diagnoses().await.map_err(|source| LoadError {
        step: LoadStep::Diagnoses,
        source,
    })?;
    store.dispatch(Action::SetDiagnoses(diagnoses));

    store.dispatch(Action::SetEntries(entries));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::FakeApi;
    use patientor_client::ApiResult;
    use patientor_core::{
        Diagnosis, EntryKind, Gender, HealthCheckRating, NewPatient, Patient, PatientUpdate,
    };

    const ID: &str = "d2773598-f723-11e9-8f0b-362b9e155667";

    fn entry(id: &str) -> Entry {
        NewEntry {
            description: "Yearly control visit.".into(),
            date: "2019-10-20".into(),
            specialist: "MD House".into(),
            diagnosis_codes: Some(vec!["Z57.1".into()]),
            kind: EntryKind::HealthCheck {
                health_check_rating: Some(HealthCheckRating::LowRisk),
            },
        }
        .with_id(id)
    }

    fn patient() -> Patient {
        Patient {
            id: ID.into(),
            name: "Dana Scully".into(),
            occupation: "Forensic Pathologist".into(),
            gender: Gender::Female,
            ssn: Some("050174-432N".into()),
            date_of_birth: Some("1974-01-05".into()),
            entries: vec![entry("e1")],
        }
    }

    fn api() -> FakeApi {
        FakeApi {
            patients: vec![patient()],
            diagnoses: Some(vec![Diagnosis::new("Z57.1", "Occupational exposure")]),
            ..FakeApi::default()
        }
    }

    fn new_entry() -> NewEntry {
        entry("ignored").into_new_entry()
    }

    #[tokio::test]
    async fn load_fetches_in_order_and_fills_store() {
        let api = api();
        let mut store = StateContainer::new();
        let mut view = PatientView::for_patient(ID);

        assert!(matches!(view.load(&api, &mut store).await, LoadOutcome::Loaded));
        assert_eq!(view.load_state(), &LoadState::Loaded);
        assert_eq!(
            api.calls(),
            [format!("get_patient {ID}"), "get_diagnoses".to_string()]
        );
        assert_eq!(store.state().patient(ID).unwrap().name, "Dana Scully");
        assert!(store.state().diagnosis("Z57.1").is_some());
        assert!(store.state().entry("e1").is_some());
    }

    #[tokio::test]
    async fn load_runs_only_once() {
        let api = api();
        let mut store = StateContainer::new();
        let mut view = PatientView::for_patient(ID);

        view.load(&api, &mut store).await;
        assert!(matches!(view.load(&api, &mut store).await, LoadOutcome::Skipped));
        assert_eq!(api.calls().len(), 2);
    }

    #[tokio::test]
    async fn load_merges_onto_existing_patient() {
        let api = api();
        let mut store = StateContainer::new();
        store.dispatch(Action::UpdatePatient(PatientUpdate::from(Patient {
            name: "Old Name".into(),
            ..patient()
        })));
        let mut view = PatientView::for_patient(ID);
        view.load(&api, &mut store).await;
        assert_eq!(store.state().patient(ID).unwrap().name, "Dana Scully");
    }

    #[tokio::test]
    async fn diagnosis_failure_stops_before_entries() {
        let api = FakeApi {
            diagnoses: None,
            ..api()
        };
        let mut store = StateContainer::new();
        store.dispatch(Action::SetDiagnoses(vec![Diagnosis::new("M24.2", "Disorder of ligament")]));
        let diagnoses_before = store.state().diagnoses().clone();
        let mut view = PatientView::for_patient(ID);

        match view.load(&api, &mut store).await {
            LoadOutcome::Failed(err) => assert_eq!(err.step, LoadStep::Diagnoses),
            other => panic!("expected failure, got {other:?}"),
        }
        assert!(store.state().patient(ID).is_some());
        assert!(store.state().entries().is_empty());
        assert_eq!(store.state().diagnoses(), &diagnoses_before);
        assert!(matches!(view.load_state(), LoadState::Failed(_)));
    }

    #[tokio::test]
    async fn diagnosis_failure_renders_error_not_page() {
        let api = FakeApi {
            diagnoses: None,
            ..api()
        };
        let mut store = StateContainer::new();
        let mut view = PatientView::for_patient(ID);

        assert!(matches!(view.load(&api, &mut store).await, LoadOutcome::Failed(_)));
        assert!(store.state().patient(ID).is_some());
        match view.render(store.state()) {
            Rendered::Error(reason) => {
                assert!(reason.contains("failed to fetch diagnosis catalog"))
            }
            other => panic!("expected error render, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn patient_failure_renders_error() {
        let api = FakeApi {
            patients: Vec::new(),
            ..api()
        };
        let mut store = StateContainer::new();
        let mut view = PatientView::for_patient(ID);

        assert!(matches!(
            view.load(&api, &mut store).await,
            LoadOutcome::Failed(LoadError {
                step: LoadStep::Patient,
                ..
            })
        ));
        assert_eq!(api.calls(), [format!("get_patient {ID}")]);
        match view.render(store.state()) {
            Rendered::Error(reason) => assert!(reason.contains("failed to fetch patient")),
            other => panic!("expected error render, got {other:?}"),
        }
    }

    /// Never answers the patient request.
    struct StalledApi;

    #[async_trait::async_trait]
    impl PatientorApi for StalledApi {
        async fn get_patient(&self, _id: &str) -> ApiResult<Patient> {
            std::future::pending().await
        }

        async fn list_patients(&self) -> ApiResult<Vec<Patient>> {
            std::future::pending().await
        }

        async fn create_patient(&self, _patient: &NewPatient) -> ApiResult<Patient> {
            std::future::pending().await
        }

        async fn get_diagnoses(&self) -> ApiResult<Vec<Diagnosis>> {
            std::future::pending().await
        }

        async fn create_entry(&self, _id: &str, _entry: &NewEntry) -> ApiResult<Entry> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn cancelled_load_can_be_retried() {
        let mut store = StateContainer::new();
        let mut view = PatientView::for_patient(ID);

        tokio::select! {
            biased;
            _ = view.load(&StalledApi, &mut store) => panic!("stalled load completed"),
            _ = std::future::ready(()) => {}
        }
        assert_eq!(view.load_state(), &LoadState::NotStarted);

        let api = api();
        assert!(matches!(view.load(&api, &mut store).await, LoadOutcome::Loaded));
        assert_eq!(view.load_state(), &LoadState::Loaded);
    }

    #[tokio::test]
    async fn no_patient_id_renders_nothing() {
        let api = api();
        let mut store = StateContainer::new();
        let mut view = PatientView::new(None);

        assert!(matches!(view.load(&api, &mut store).await, LoadOutcome::Skipped));
        assert!(api.calls().is_empty());
        assert_eq!(view.render(store.state()), Rendered::Nothing);
    }

    #[tokio::test]
    async fn loaded_view_renders_page() {
        let api = api();
        let mut store = StateContainer::new();
        let mut view = PatientView::for_patient(ID);
        view.load(&api, &mut store).await;

        match view.render(store.state()) {
            Rendered::Page(page) => {
                assert_eq!(page.summary.name, "Dana Scully");
                assert_eq!(page.summary.health_rating, Some(HealthCheckRating::LowRisk));
                assert_eq!(page.entries.len(), 1);
                assert_eq!(
                    page.entries[0].diagnoses[0].name.as_deref(),
                    Some("Occupational exposure")
                );
            }
            other => panic!("expected page, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn successful_submit_adds_entry_and_closes_modal() {
        let api = api();
        let mut store = StateContainer::new();
        let mut view = PatientView::for_patient(ID);
        view.open_modal();

        let created = view
            .submit_new_entry(&api, &mut store, &new_entry())
            .await
            .unwrap();
        assert_eq!(created.id, "created-1");
        assert_eq!(store.state().entry("created-1"), Some(&created));
        assert_eq!(view.modal(), &EntryModal::default());
    }

    #[tokio::test]
    async fn rejected_submit_keeps_modal_open_with_message() {
        let api = FakeApi {
            entry_rejection: Some((400, Some("Incorrect or missing date".into()))),
            ..api()
        };
        let mut store = StateContainer::new();
        let mut view = PatientView::for_patient(ID);
        view.open_modal();

        let err = view
            .submit_new_entry(&api, &mut store, &new_entry())
            .await
            .unwrap_err();
        assert!(matches!(err, SubmitError::Rejected(_)));
        assert!(view.modal().open);
        assert_eq!(view.modal().error.as_deref(), Some("Incorrect or missing date"));
        assert!(store.state().entries().is_empty());

        view.close_modal();
        assert_eq!(view.modal().error, None);
    }

    #[tokio::test]
    async fn rejected_submit_without_message_uses_fallback() {
        let api = FakeApi {
            entry_rejection: Some((500, None)),
            ..api()
        };
        let mut store = StateContainer::new();
        let mut view = PatientView::for_patient(ID);
        view.open_modal();

        let _ = view.submit_new_entry(&api, &mut store, &new_entry()).await;
        assert_eq!(view.modal().error.as_deref(), Some("Unknown error"));
    }

    #[tokio::test]
    async fn submit_without_patient_is_refused() {
        let api = api();
        let mut store = StateContainer::new();
        let mut view = PatientView::new(None);
        assert!(matches!(
            view.submit_new_entry(&api, &mut store, &new_entry()).await,
            Err(SubmitError::NoPatient)
        ));
        assert!(api.calls().is_empty());
    }
}
