//! Client runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into the HTTP client and
//! views. Nothing below the binary reads environment variables while handling a request.

use crate::constants::DEFAULT_API_BASE_URL;
use crate::{CoreError, CoreResult};

/// Client configuration resolved at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    api_base_url: String,
}

impl ClientConfig {
    /// Create a new `ClientConfig`.
    ///
    /// The base URL must use the `http` or `https` scheme and have a host. A trailing slash is
    /// trimmed.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidConfig` if the URL is empty, has another scheme, or has no
    /// host.
    pub fn new(api_base_url: impl AsRef<str>) -> CoreResult<Self> {
        let trimmed = api_base_url.as_ref().trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(CoreError::InvalidConfig(
                "api_base_url cannot be empty".into(),
            ));
        }

        let rest = trimmed
            .strip_prefix("http://")
            .or_else(|| trimmed.strip_prefix("https://"))
            .ok_or_else(|| {
                CoreError::InvalidConfig(format!(
                    "api_base_url must start with http:// or https://: {trimmed}"
                ))
            })?;

        if rest.is_empty() || rest.starts_with('/') {
            return Err(CoreError::InvalidConfig(format!(
                "api_base_url has no host: {trimmed}"
            )));
        }

        Ok(Self {
            api_base_url: trimmed.to_owned(),
        })
    }

    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_owned(),
        }
    }
}

/// Build a `ClientConfig` from an optional raw value (typically an environment variable).
///
/// If `value` is `None` or empty/whitespace, the default base URL is used.
pub fn client_config_from_env_value(value: Option<String>) -> CoreResult<ClientConfig> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    match value {
        Some(url) => ClientConfig::new(url),
        None => Ok(ClientConfig::default()),
    }
}
