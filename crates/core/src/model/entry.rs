//! Medical entries.
//!
//! An entry is a single medical event belonging to a patient. On the wire it is a flat JSON
//! object: the shared base fields, a `type` discriminant and the kind-specific fields.
//!
//! ```json
//! { "id": "b4f4eca1", "date": "2019-10-20", "specialist": "MD House",
//!   "type": "HealthCheck", "description": "Yearly control visit.",
//!   "healthCheckRating": 1, "diagnosisCodes": ["Z57.1"] }
//! ```
//!
//! [`NewEntry`] is the same shape without `id`; the backend assigns the identifier.

use crate::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};

/// Health check outcome, encoded on the wire as an integer `0..=3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum HealthCheckRating {
    Healthy = 0,
    LowRisk = 1,
    HighRisk = 2,
    CriticalRisk = 3,
}

impl HealthCheckRating {
    pub const ALL: [HealthCheckRating; 4] = [
        HealthCheckRating::Healthy,
        HealthCheckRating::LowRisk,
        HealthCheckRating::HighRisk,
        HealthCheckRating::CriticalRisk,
    ];

    /// Human readable description shown next to the rating.
    pub fn description(self) -> &'static str {
        match self {
            HealthCheckRating::Healthy => "The patient is in great shape",
            HealthCheckRating::LowRisk => "The patient has a low risk of getting sick",
            HealthCheckRating::HighRisk => "The patient has a high risk of getting sick",
            HealthCheckRating::CriticalRisk => "The patient has a diagnosed condition",
        }
    }
}

impl From<HealthCheckRating> for u8 {
    fn from(rating: HealthCheckRating) -> Self {
        rating as u8
    }
}

impl TryFrom<u8> for HealthCheckRating {
    type Error = CoreError;

    fn try_from(value: u8) -> CoreResult<Self> {
        HealthCheckRating::ALL
            .get(usize::from(value))
            .copied()
            .ok_or(CoreError::InvalidHealthCheckRating(value))
    }
}

/// Discriminant of an entry, without the kind-specific data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryType {
    HealthCheck,
    Hospital,
    OccupationalHealthcare,
}

impl EntryType {
    /// Convert to the wire `type` string.
    pub fn to_wire(self) -> &'static str {
        match self {
            EntryType::HealthCheck => "HealthCheck",
            EntryType::Hospital => "Hospital",
            EntryType::OccupationalHealthcare => "OccupationalHealthcare",
        }
    }

    /// Parse from the wire `type` string.
    pub fn from_wire(s: &str) -> Option<Self> {
        match s {
            "HealthCheck" => Some(EntryType::HealthCheck),
            "Hospital" => Some(EntryType::Hospital),
            "OccupationalHealthcare" => Some(EntryType::OccupationalHealthcare),
            _ => None,
        }
    }
}

impl std::fmt::Display for EntryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.to_wire())
    }
}

impl std::str::FromStr for EntryType {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        Self::from_wire(s.trim()).ok_or_else(|| CoreError::UnknownEntryType(s.to_owned()))
    }
}

/// Hospital discharge details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discharge {
    pub date: String,
    pub criteria: String,
}

/// Sick leave period granted during an occupational healthcare visit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SickLeave {
    pub start_date: String,
    pub end_date: String,
}

/// Kind-specific entry data, tagged by `type` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EntryKind {
    #[serde(rename_all = "camelCase")]
    HealthCheck {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        health_check_rating: Option<HealthCheckRating>,
    },
    Hospital {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        discharge: Option<Discharge>,
    },
    #[serde(rename_all = "camelCase")]
    OccupationalHealthcare {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        employer_name: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        sick_leave: Option<SickLeave>,
    },
}

impl EntryKind {
    pub fn entry_type(&self) -> EntryType {
        match self {
            EntryKind::HealthCheck { .. } => EntryType::HealthCheck,
            EntryKind::Hospital { .. } => EntryType::Hospital,
            EntryKind::OccupationalHealthcare { .. } => EntryType::OccupationalHealthcare,
        }
    }

    /// The rating, if this is a health check that carries one.
    pub fn health_check_rating(&self) -> Option<HealthCheckRating> {
        match self {
            EntryKind::HealthCheck {
                health_check_rating,
            } => *health_check_rating,
            _ => None,
        }
    }
}

/// An entry without its identifier, as submitted for creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEntry {
    pub description: String,
    pub date: String,
    pub specialist: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnosis_codes: Option<Vec<String>>,
    #[serde(flatten)]
    pub kind: EntryKind,
}

impl NewEntry {
    /// Attach a server-assigned identifier.
    pub fn with_id(self, id: impl Into<String>) -> Entry {
        Entry {
            id: id.into(),
            details: self,
        }
    }
}

/// A medical entry, keyed by `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: String,
    #[serde(flatten)]
    pub details: NewEntry,
}

impl Entry {
    pub fn entry_type(&self) -> EntryType {
        self.details.kind.entry_type()
    }

    pub fn date(&self) -> &str {
        &self.details.date
    }

    pub fn description(&self) -> &str {
        &self.details.description
    }

    pub fn specialist(&self) -> &str {
        &self.details.specialist
    }

    /// Referenced diagnosis codes; empty when the field is absent.
    pub fn diagnosis_codes(&self) -> &[String] {
        self.details.diagnosis_codes.as_deref().unwrap_or_default()
    }

    pub fn into_new_entry(self) -> NewEntry {
        self.details
    }
}
