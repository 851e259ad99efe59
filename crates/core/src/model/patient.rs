//! Patient models.

use super::Entry;
use crate::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};

/// Administrative gender as recorded by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    /// Convert to the wire string.
    pub fn to_wire(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }

    /// Parse from the wire string.
    pub fn from_wire(s: &str) -> Option<Self> {
        match s {
            "male" => Some(Gender::Male),
            "female" => Some(Gender::Female),
            "other" => Some(Gender::Other),
            _ => None,
        }
    }

    /// Symbol used in place of the gender icon when rendering as text.
    pub fn symbol(self) -> &'static str {
        match self {
            Gender::Male => "♂",
            Gender::Female => "♀",
            Gender::Other => "⚥",
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.to_wire())
    }
}

impl std::str::FromStr for Gender {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        Self::from_wire(&s.trim().to_lowercase())
            .ok_or_else(|| CoreError::UnknownGender(s.to_owned()))
    }
}

/// A patient record, keyed by `id`.
///
/// `entries` is only read once, when the patient is first fetched, to seed the store's entry
/// table. Entries added later are tracked in the store, not here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: String,
    pub name: String,
    pub occupation: String,
    pub gender: Gender,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(default)]
    pub entries: Vec<Entry>,
}

/// Payload for creating a patient; the backend assigns `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPatient {
    pub name: String,
    pub occupation: String,
    pub gender: Gender,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
}

/// A partial patient record used for field-by-field merges.
///
/// Every field except `id` is optional; `None` means "not present in the payload" and leaves
/// the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientUpdate {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occupation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entries: Option<Vec<Entry>>,
}

impl PatientUpdate {
    /// An update carrying only the identifier.
    pub fn for_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Overlay the present fields onto `existing`.
    pub fn merge_onto(self, existing: &Patient) -> Patient {
        Patient {
            id: self.id,
            name: self.name.unwrap_or_else(|| existing.name.clone()),
            occupation: self
                .occupation
                .unwrap_or_else(|| existing.occupation.clone()),
            gender: self.gender.unwrap_or(existing.gender),
            ssn: self.ssn.or_else(|| existing.ssn.clone()),
            date_of_birth: self
                .date_of_birth
                .or_else(|| existing.date_of_birth.clone()),
            entries: self.entries.unwrap_or_else(|| existing.entries.clone()),
        }
    }

    /// Build a patient from the payload's fields alone.
    ///
    /// Returns `None` when a required field (`name`, `occupation`, `gender`) is missing.
    pub fn into_patient(self) -> Option<Patient> {
        Some(Patient {
            id: self.id,
            name: self.name?,
            occupation: self.occupation?,
            gender: self.gender?,
            ssn: self.ssn,
            date_of_birth: self.date_of_birth,
            entries: self.entries.unwrap_or_default(),
        })
    }
}

impl From<Patient> for PatientUpdate {
    fn from(patient: Patient) -> Self {
        Self {
            id: patient.id,
            name: Some(patient.name),
            occupation: Some(patient.occupation),
            gender: Some(patient.gender),
            ssn: patient.ssn,
            date_of_birth: patient.date_of_birth,
            entries: Some(patient.entries),
        }
    }
}
