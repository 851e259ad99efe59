use patientor_core::constants::UNKNOWN_ERROR_MESSAGE;
use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(reqwest::Error),
    #[error("invalid request URL: {0}")]
    InvalidUrl(String),
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error(
        "{url} returned HTTP {status}: {}",
        message.as_deref().unwrap_or("no error message")
    )]
    Status {
        url: String,
        status: u16,
        message: Option<String>,
    },
    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    /// Best-effort message for display to a user.
    ///
    /// This is the `error` string from the response body when the backend sent one, otherwise
    /// a generic fallback.
    pub fn user_message(&self) -> &str {
        match self {
            ApiError::Status {
                message: Some(message),
                ..
            } => message,
            _ => UNKNOWN_ERROR_MESSAGE,
        }
    }

    /// HTTP status code, if the backend answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Shape of an error response body. Every field is optional.
#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

/// Pull the `error` field out of a response body, if it is JSON and carries a non-empty one.
pub(crate) fn extract_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .map(|m| m.trim().to_owned())
        .filter(|m| !m.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_error_field() {
        assert_eq!(
            extract_error_message(r#"{"error":"Incorrect date: 2019-13-01"}"#).as_deref(),
            Some("Incorrect date: 2019-13-01")
        );
    }

    #[test]
    fn ignores_bodies_without_error_field() {
        assert_eq!(extract_error_message(r#"{"message":"nope"}"#), None);
        assert_eq!(extract_error_message("<html>Bad Gateway</html>"), None);
        assert_eq!(extract_error_message(""), None);
        assert_eq!(extract_error_message(r#"{"error":"  "}"#), None);
        assert_eq!(extract_error_message(r#"{"error":42}"#), None);
    }

    #[test]
    fn user_message_falls_back_to_generic_text() {
        let with_message = ApiError::Status {
            url: "http://x/api/patients/1/entries".into(),
            status: 400,
            message: Some("Incorrect or missing specialist".into()),
        };
        assert_eq!(with_message.user_message(), "Incorrect or missing specialist");
        assert_eq!(with_message.status(), Some(400));

        let without = ApiError::Status {
            url: "http://x".into(),
            status: 500,
            message: None,
        };
        assert_eq!(without.user_message(), "Unknown error");
    }
}
