#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("health check rating out of range (expected 0-3): {0}")]
    InvalidHealthCheckRating(u8),
    #[error("unknown entry type: {0}")]
    UnknownEntryType(String),
    #[error("unknown gender: {0}")]
    UnknownGender(String),
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;
