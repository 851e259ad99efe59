//! Normalised client-side store and its reducer.
//!
//! The store keeps each entity type once, keyed by its natural identifier:
//!
//! - `patients`: `id → Patient`
//! - `diagnoses`: `code → Diagnosis`
//! - `entries`: `id → Entry`
//!
//! [`reduce`] is a pure function from `(&Store, Action)` to a new `Store`. Each table sits behind
//! an `Arc`, so a reduction only copies the table it changes and shares the others with its
//! input.
//!
//! ## Precedence
//!
//! The actions do not agree on who wins a key collision:
//!
//! | Action | Precedence |
//! |---|---|
//! | `SetPatientList`, `SetEntries`, `SetDiagnoses` | existing record wins |
//! | `AddPatient`, `AddEntry` | incoming record wins (full replace) |
//! | `UpdatePatient` | field-by-field merge |
//!
//! Bulk loads therefore never overwrite a record already in the store. This asymmetry is kept
//! as observed backend-client behaviour; see [`Action::precedence`].

use crate::model::{Diagnosis, Entry, Patient, PatientUpdate};
use std::collections::BTreeMap;
use std::sync::Arc;

pub type PatientTable = BTreeMap<String, Patient>;
pub type DiagnosisTable = BTreeMap<String, Diagnosis>;
pub type EntryTable = BTreeMap<String, Entry>;

/// The normalised store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Store {
    patients: Arc<PatientTable>,
    diagnoses: Arc<DiagnosisTable>,
    entries: Arc<EntryTable>,
}

impl Store {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn patients(&self) -> &PatientTable {
        &self.patients
    }

    pub fn diagnoses(&self) -> &DiagnosisTable {
        &self.diagnoses
    }

    pub fn entries(&self) -> &EntryTable {
        &self.entries
    }

    pub fn patient(&self, id: &str) -> Option<&Patient> {
        self.patients.get(id)
    }

    pub fn diagnosis(&self, code: &str) -> Option<&Diagnosis> {
        self.diagnoses.get(code)
    }

    pub fn entry(&self, id: &str) -> Option<&Entry> {
        self.entries.get(id)
    }
}

/// How an action resolves a key that is already present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precedence {
    /// The record already in the store is kept.
    ExistingWins,
    /// The payload replaces the stored record.
    IncomingWins,
    /// Payload fields are overlaid onto the stored record.
    Merge,
}

/// A store mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SetPatientList(Vec<Patient>),
    AddPatient(Patient),
    UpdatePatient(PatientUpdate),
    AddEntry(Entry),
    SetEntries(Vec<Entry>),
    SetDiagnoses(Vec<Diagnosis>),
}

impl Action {
    /// Stable action name, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Action::SetPatientList(_) => "SET_PATIENT_LIST",
            Action::AddPatient(_) => "ADD_PATIENT",
            Action::UpdatePatient(_) => "UPDATE_PATIENT",
            Action::AddEntry(_) => "ADD_ENTRY",
            Action::SetEntries(_) => "SET_ENTRIES",
            Action::SetDiagnoses(_) => "SET_DIAGNOSES",
        }
    }

    pub fn precedence(&self) -> Precedence {
        match self {
            Action::SetPatientList(_) | Action::SetEntries(_) | Action::SetDiagnoses(_) => {
                Precedence::ExistingWins
            }
            Action::AddPatient(_) | Action::AddEntry(_) => Precedence::IncomingWins,
            Action::UpdatePatient(_) => Precedence::Merge,
        }
    }
}

/// Apply `action` to `state`, returning the next store.
///
/// `state` is never modified. Tables the action does not touch are shared with the result.
pub fn reduce(state: &Store, action: Action) -> Store {
    match action {
        Action::SetPatientList(patients) => Store {
            patients: seed_missing(&state.patients, patients.into_iter().map(|p| (p.id.clone(), p))),
            ..state.clone()
        },
        Action::AddPatient(patient) => Store {
            patients: with_inserted(&state.patients, patient.id.clone(), patient),
            ..state.clone()
        },
        Action::UpdatePatient(update) => {
            let next = match state.patients.get(&update.id) {
                Some(existing) => update.merge_onto(existing),
                None => {
                    let id = update.id.clone();
                    match update.into_patient() {
                        Some(patient) => patient,
                        None => {
                            tracing::warn!(
                                patient_id = %id,
                                "UPDATE_PATIENT for unknown patient is missing required fields; ignored"
                            );
                            return state.clone();
                        }
                    }
                }
            };
            Store {
                patients: with_inserted(&state.patients, next.id.clone(), next),
                ..state.clone()
            }
        }
        Action::AddEntry(entry) => Store {
            entries: with_inserted(&state.entries, entry.id.clone(), entry),
            ..state.clone()
        },
        Action::SetEntries(entries) => Store {
            entries: seed_missing(&state.entries, entries.into_iter().map(|e| (e.id.clone(), e))),
            ..state.clone()
        },
        Action::SetDiagnoses(diagnoses) => Store {
            diagnoses: seed_missing(
                &state.diagnoses,
                diagnoses.into_iter().map(|d| (d.code.clone(), d)),
            ),
            ..state.clone()
        },
    }
}

/// Insert-or-replace a single key on a copy of `table`.
fn with_inserted<V: Clone>(
    table: &Arc<BTreeMap<String, V>>,
    key: String,
    value: V,
) -> Arc<BTreeMap<String, V>> {
    let mut next = BTreeMap::clone(table);
    next.insert(key, value);
    Arc::new(next)
}

/// Build a table from `incoming` and overlay `existing` on top of it.
///
/// Within `incoming` the last record for a key wins. Keys already in `existing` are never
/// replaced. When nothing new is seeded the existing table is shared unchanged.
fn seed_missing<V: Clone>(
    existing: &Arc<BTreeMap<String, V>>,
    incoming: impl IntoIterator<Item = (String, V)>,
) -> Arc<BTreeMap<String, V>> {
    let fresh: BTreeMap<String, V> = incoming
        .into_iter()
        .filter(|(key, _)| !existing.contains_key(key))
        .collect();

    if fresh.is_empty() {
        return Arc::clone(existing);
    }

    let mut next = BTreeMap::clone(existing);
    next.extend(fresh);
    Arc::new(next)
}

/// Owner of the current store; the only place the store changes.
#[derive(Debug, Default)]
pub struct StateContainer {
    state: Store,
}

impl StateContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing store.
    pub fn with_state(state: Store) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &Store {
        &self.state
    }

    /// Reduce `action` into the current store.
    pub fn dispatch(&mut self, action: Action) {
        tracing::debug!(action = action.kind(), "dispatch");
        self.state = reduce(&self.state, action);
    }
}
