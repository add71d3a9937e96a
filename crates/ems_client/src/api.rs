use ems_core::{EmployeeRecord, EmploymentHistoryEntry, ExportConfig};
use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::{AUTHORIZATION, USER_AGENT};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use crate::credential::Credential;
use crate::error::SourceError;
use crate::source::RecordSource;

const CLIENT_USER_AGENT: &str = "ems-export/0.1";

/// Response envelope used by every records API endpoint.
#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    status: String,
    #[serde(default)]
    message: String,
    data: Option<T>,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
}

/// Blocking client for the employee records REST API.
///
/// Every call carries the caller's credential as a bearer token. Responses
/// are decoded from the `{status, message, data}` envelope into typed
/// records.
pub struct ApiClient {
    base_url: String,
    client: Client,
}

impl ApiClient {
    /// Create a client for `base_url` with the given request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, SourceError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SourceError::Transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { base_url, client })
    }

    pub fn from_config(config: &ExportConfig) -> Result<Self, SourceError> {
        Self::new(
            config.api_root(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    /// Return the configured base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Exchange admin credentials for a bearer token (`POST /auth/login`).
    pub fn login(&self, email: &str, password: &str) -> Result<Credential, SourceError> {
        let url = self.url("/auth/login");
        debug!(url = %url, "logging in");
        let payload = serde_json::json!({ "email": email, "password": password });

        let response = self
            .client
            .post(&url)
            .header(USER_AGENT, CLIENT_USER_AGENT)
            .json(&payload)
            .send()
            .map_err(transport_error)?;
        let status = response.status();
        let body = response.text().map_err(transport_error)?;

        decode_login(status.as_u16(), &body)
    }

    fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        credential: &Credential,
    ) -> Result<Option<T>, SourceError> {
        let url = self.url(path);
        debug!(url = %url, "GET");

        let response = self
            .client
            .get(&url)
            .header(USER_AGENT, CLIENT_USER_AGENT)
            .header(AUTHORIZATION, credential.bearer())
            .send()
            .map_err(transport_error)?;
        let status = response.status();
        let body = response.text().map_err(transport_error)?;

        decode_envelope(status.as_u16(), &body)
    }
}

impl RecordSource for ApiClient {
    fn fetch_all_employees(
        &self,
        credential: &Credential,
    ) -> Result<Vec<EmployeeRecord>, SourceError> {
        Ok(self.get("/employees", credential)?.unwrap_or_default())
    }

    fn fetch_employee(
        &self,
        credential: &Credential,
        id: i64,
    ) -> Result<Option<EmployeeRecord>, SourceError> {
        match self.get(&format!("/employees/{id}"), credential) {
            Err(SourceError::NotFound) => Ok(None),
            other => other,
        }
    }

    fn fetch_history(
        &self,
        credential: &Credential,
        id: i64,
    ) -> Result<Vec<EmploymentHistoryEntry>, SourceError> {
        Ok(self
            .get(&format!("/employees/{id}/history"), credential)?
            .unwrap_or_default())
    }
}

fn transport_error(e: reqwest::Error) -> SourceError {
    if e.is_timeout() {
        SourceError::Transport(format!("request timed out: {e}"))
    } else {
        SourceError::Transport(e.to_string())
    }
}

/// Turn a status code and body into the envelope's `data`.
///
/// 404 maps to `NotFound`, 401/403 to `Unauthorized`; any other failure
/// status or an `"error"` envelope becomes `Api`.
pub(crate) fn decode_envelope<T: DeserializeOwned>(
    status: u16,
    body: &str,
) -> Result<Option<T>, SourceError> {
    let code = StatusCode::from_u16(status).map_err(|e| SourceError::Decode(e.to_string()))?;

    match code {
        StatusCode::NOT_FOUND => return Err(SourceError::NotFound),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => return Err(SourceError::Unauthorized),
        _ => {}
    }

    if !code.is_success() {
        return Err(SourceError::Api {
            status,
            message: error_message(body),
        });
    }

    let envelope: ApiEnvelope<T> =
        serde_json::from_str(body).map_err(|e| SourceError::Decode(e.to_string()))?;

    if envelope.status != "success" {
        return Err(SourceError::Api {
            status,
            message: envelope.message,
        });
    }

    Ok(envelope.data)
}

fn decode_login(status: u16, body: &str) -> Result<Credential, SourceError> {
    match status {
        200..=299 => {
            let login: LoginResponse =
                serde_json::from_str(body).map_err(|e| SourceError::Decode(e.to_string()))?;
            Ok(Credential::new(login.token))
        }
        401 | 403 => Err(SourceError::Unauthorized),
        _ => Err(SourceError::Api {
            status,
            message: error_message(body),
        }),
    }
}

/// Prefer the envelope's message; fall back to a prefix of the raw body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<ApiEnvelope<serde_json::Value>>(body)
        .map(|e| e.message)
        .ok()
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| body.chars().take(200).collect())
}
