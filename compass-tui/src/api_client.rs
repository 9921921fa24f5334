//! REST client for the COMPASS API.

use crate::config::{AuthConfig, TuiConfig};
use async_trait::async_trait;
use compass_core::{
    validate_records, AssessorMapping, Competency, DirectoryError, Employee, EmployeeRecord,
    IndividualDevelopmentPlan, Job, JobCompetencyMapping, Sid,
};
use compass_org::EmployeeDirectory;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ApiClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },
    #[error("Invalid record: {0}")]
    Record(#[from] compass_core::ValidationError),
    #[error("Config error: {0}")]
    Config(String),
}

impl From<ApiClientError> for DirectoryError {
    fn from(err: ApiClientError) -> Self {
        match err {
            ApiClientError::Status { status, message } => DirectoryError::Rejected { status, message },
            ApiClientError::Serde(e) => DirectoryError::Decode {
                reason: e.to_string(),
            },
            ApiClientError::Http(e) if e.is_decode() => DirectoryError::Decode {
                reason: e.to_string(),
            },
            ApiClientError::Record(e) => DirectoryError::InvalidRecord(e),
            other => DirectoryError::Unavailable {
                reason: other.to_string(),
            },
        }
    }
}

/// Error body returned by the API on non-2xx responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Clone)]
pub struct RestClient {
    client: reqwest::Client,
    base_url: String,
    auth_header: HeaderMap,
}

impl RestClient {
    pub fn new(config: &TuiConfig) -> Result<Self, ApiClientError> {
        let timeout = Duration::from_millis(config.request_timeout_ms);
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        let auth_header = build_auth_headers(&config.auth)?;
        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            auth_header,
        })
    }

    /// Everyone under `manager`, validated. Malformed records are dropped
    /// and logged rather than failing the whole team.
    pub async fn team(&self, manager: &Sid) -> Result<Vec<Employee>, ApiClientError> {
        let path = format!("/api/employees/{}/team", manager);
        let records: Vec<EmployeeRecord> = self.get_json(&path).await?;
        let batch = validate_records(records);
        tracing::info!(
            manager = %manager,
            accepted = batch.employees.len(),
            rejected = batch.rejected.len(),
            "Fetched team"
        );
        Ok(batch.employees)
    }

    pub async fn employee(&self, sid: &Sid) -> Result<Employee, ApiClientError> {
        let path = format!("/api/employees/{}", sid);
        let record: EmployeeRecord = self.get_json(&path).await?;
        Ok(Employee::try_from(record)?)
    }

    pub async fn jobs(&self) -> Result<Vec<Job>, ApiClientError> {
        self.get_json("/api/jobs").await
    }

    pub async fn competencies(&self) -> Result<Vec<Competency>, ApiClientError> {
        self.get_json("/api/competencies").await
    }

    pub async fn job_competencies(
        &self,
        job_code: &str,
    ) -> Result<Vec<JobCompetencyMapping>, ApiClientError> {
        let path = format!("/api/jobs/{}/competencies", job_code);
        self.get_json(&path).await
    }

    pub async fn assessors(&self) -> Result<Vec<AssessorMapping>, ApiClientError> {
        self.get_json("/api/assessors").await
    }

    pub async fn idps(&self, sid: &Sid) -> Result<Vec<IndividualDevelopmentPlan>, ApiClientError> {
        let path = format!("/api/employees/{}/idps", sid);
        self.get_json(&path).await
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<T, ApiClientError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, "GET");
        let response = self
            .client
            .get(url)
            .headers(self.auth_header.clone())
            .send()
            .await?;
        parse_response(response).await
    }
}

#[async_trait]
impl EmployeeDirectory for RestClient {
    async fn team(&self, manager: &Sid) -> Result<Vec<Employee>, DirectoryError> {
        RestClient::team(self, manager).await.map_err(DirectoryError::from)
    }
}

async fn parse_response<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ApiClientError> {
    let status = response.status();
    if status.is_success() {
        let bytes = response.bytes().await?;
        return Ok(serde_json::from_slice(&bytes)?);
    }
    let text = response.text().await?;
    Err(status_error(status.as_u16(), &text))
}

/// Prefer the API's `{"error": ...}` message; fall back to the raw body.
pub(crate) fn status_error(status: u16, body: &str) -> ApiClientError {
    let message = match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => parsed.error,
        Err(_) => body.trim().to_string(),
    };
    ApiClientError::Status { status, message }
}

fn build_auth_headers(auth: &AuthConfig) -> Result<HeaderMap, ApiClientError> {
    let mut headers = HeaderMap::new();
    if let Some(token) = &auth.bearer_token {
        let value = format!("Bearer {}", token);
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&value).map_err(|e| ApiClientError::Config(e.to_string()))?,
        );
    }
    Ok(headers)
}
