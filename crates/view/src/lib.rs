//! # Patientor View
//!
//! Views over the normalised store.
//!
//! Handles:
//! - The patient page: one-shot initial load, "add entry" modal, page model
//! - The patient list: bulk fetch, patient creation, list model
//! - Validation of form input into request payloads
//!
//! Views are generic over [`patientor_client::PatientorApi`] and mutate shared state only
//! through [`patientor_core::StateContainer::dispatch`].

pub mod error;
pub mod form;
pub mod list;
pub mod page;
pub mod patient;

#[cfg(test)]
mod fake;

pub use error::{FormError, LoadError, LoadStep, SubmitError};
pub use form::{EntryFormValues, PatientFormValues};
pub use list::{create_patient, fetch_patient_list, PatientListPage};
pub use page::{DiagnosisLookup, EntryBlock, PatientPage, SummaryRow};
pub use patient::{EntryModal, LoadOutcome, LoadState, PatientView, Rendered};
