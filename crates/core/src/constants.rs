//! Constants used throughout the Patientor crates.
//!
//! Endpoint paths and user-facing fallback strings live here so the client, the view and the
//! CLI agree on them.

/// Base URL used when no explicit API base URL is configured.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3001/api";

/// Environment variable holding the API base URL.
pub const API_BASE_URL_ENV: &str = "PATIENTOR_API_BASE_URL";

/// Path segment for the patients collection.
pub const PATIENTS_PATH: &str = "patients";

/// Path segment for the diagnosis catalog. The backend route is `diagnoses/`, with a
/// trailing slash.
pub const DIAGNOSES_PATH: &str = "diagnoses";

/// Path segment for a patient's entries collection.
pub const ENTRIES_PATH: &str = "entries";

/// Message shown when a failed request carries no usable `error` field.
pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error";
