use crate::error::{extract_error_message, ApiError, ApiResult};
use crate::PatientorApi;
use async_trait::async_trait;
use patientor_core::constants::{DIAGNOSES_PATH, ENTRIES_PATH, PATIENTS_PATH};
use patientor_core::{ClientConfig, Diagnosis, Entry, NewEntry, NewPatient, Patient};
use serde::de::DeserializeOwned;
use reqwest::Url;
use serde::Serialize;

/// HTTP client for the patient records backend.
#[derive(Clone, Debug)]
pub struct HttpClient {
    cfg: ClientConfig,
    base: Url,
    client: reqwest::Client,
}

impl HttpClient {
    /// Create a client for the backend at `cfg.api_base_url()`.
    pub fn new(cfg: ClientConfig) -> ApiResult<Self> {
        let base = Url::parse(cfg.api_base_url())
            .map_err(|err| ApiError::InvalidUrl(format!("{}: {err}", cfg.api_base_url())))?;
        if base.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(cfg.api_base_url().to_owned()));
        }
        let client = reqwest::Client::builder()
            .build()
            .map_err(ApiError::ClientBuild)?;
        Ok(Self { cfg, base, client })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.cfg
    }

    /// Append path segments to the base URL, percent-encoding each one.
    ///
    /// A segment can never add path levels, a query or a fragment. An empty last segment
    /// gives a trailing slash.
    fn endpoint(&self, segments: &[&str]) -> ApiResult<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidUrl(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// The URL of one patient's resource, or of a sub-collection under it.
    fn patient_endpoint(&self, id: &str, rest: &[&str]) -> ApiResult<Url> {
        if id.is_empty() || id == "." || id == ".." {
            return Err(ApiError::InvalidUrl(format!("invalid patient id {id:?}")));
        }
        let mut segments = vec![PATIENTS_PATH, id];
        segments.extend_from_slice(rest);
        self.endpoint(&segments)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> ApiResult<T> {
        tracing::debug!(%url, "GET");
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                url: url.to_string(),
                source,
            })?;
        decode(url.to_string(), response).await
    }

    async fn post_json<B, T>(&self, url: Url, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        tracing::debug!(%url, "POST");
        let response = self
            .client
            .post(url.clone())
            .json(body)
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                url: url.to_string(),
                source,
            })?;
        decode(url.to_string(), response).await
    }
}

/// Turn a response into `T`, or into `ApiError::Status` for non-2xx codes.
async fn decode<T: DeserializeOwned>(url: String, response: reqwest::Response) -> ApiResult<T> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|source| ApiError::Transport {
            url: url.clone(),
            source,
        })?;

    if !status.is_success() {
        return Err(ApiError::Status {
            url,
            status: status.as_u16(),
            message: extract_error_message(&body),
        });
    }

    serde_json::from_str(&body).map_err(|source| ApiError::Decode { url, source })
}

#[async_trait]
impl PatientorApi for HttpClient {
    async fn get_patient(&self, id: &str) -> ApiResult<Patient> {
        self.get_json(self.patient_endpoint(id, &[])?).await
    }

    async fn list_patients(&self) -> ApiResult<Vec<Patient>> {
        self.get_json(self.endpoint(&[PATIENTS_PATH])?).await
    }

    async fn create_patient(&self, patient: &NewPatient) -> ApiResult<Patient> {
        self.post_json(self.endpoint(&[PATIENTS_PATH])?, patient)
            .await
    }

    async fn get_diagnoses(&self) -> ApiResult<Vec<Diagnosis>> {
        // The backend route has a trailing slash.
        self.get_json(self.endpoint(&[DIAGNOSES_PATH, ""])?).await
    }

    async fn create_entry(&self, patient_id: &str, entry: &NewEntry) -> ApiResult<Entry> {
        self.post_json(self.patient_endpoint(patient_id, &[ENTRIES_PATH])?, entry)
            .await
    }
}
