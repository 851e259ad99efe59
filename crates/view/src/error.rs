use patientor_client::ApiError;
use patientor_core::EntryType;

/// Step of the initial patient load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStep {
    Patient,
    Diagnoses,
}

impl std::fmt::Display for LoadStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadStep::Patient => f.write_str("patient"),
            LoadStep::Diagnoses => f.write_str("diagnosis catalog"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("failed to fetch {step}: {source}")]
pub struct LoadError {
    pub step: LoadStep,
    #[source]
    pub source: ApiError,
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("no patient selected")]
    NoPatient,
    #[error("entry rejected: {0}")]
    Rejected(#[source] ApiError),
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FormError {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("{field} must be a date in YYYY-MM-DD form, got {value:?}")]
    InvalidDate { field: &'static str, value: String },
    #[error("health check rating must be between 0 and 3, got {0}")]
    InvalidRating(u8),
    #[error("health check rating is only allowed on HealthCheck entries, not {0}")]
    RatingNotAllowed(EntryType),
    #[error("discharge needs both a date and criteria")]
    IncompleteDischarge,
    #[error("sick leave needs both a start and an end date")]
    IncompleteSickLeave,
    #[error("sick leave ends before it starts")]
    SickLeaveEndsBeforeStart,
    #[error("unknown gender: {0}")]
    InvalidGender(String),
}

pub type FormResult<T> = std::result::Result<T, FormError>;
