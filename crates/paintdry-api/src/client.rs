use crate::endpoint::absolute_url;
use crate::error::ApiError;
use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder};
use serde_json::Value;
use std::time::Duration;

/// Read-only access to the backend.
///
/// Paths are server-relative (`/api/resources`). Implementations must be usable
/// from worker threads.
pub trait Backend: Send + Sync {
    fn get(&self, path: &str) -> Result<Value, ApiError>;

    fn post(&self, path: &str, body: &Value) -> Result<Value, ApiError>;
}

/// HTTP implementation of [`Backend`]
pub struct ApiClient {
    base_url: String,
    http: Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let base_url = base_url.into();
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::transport(&base_url, e))?;
        Ok(Self { base_url, http })
    }

    pub fn url(&self, path: &str) -> String {
        absolute_url(&self.base_url, path)
    }

    fn send(&self, url: &str, request: RequestBuilder) -> Result<Value, ApiError> {
        let response = request.send().map_err(|e| ApiError::transport(url, e))?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound {
                url: url.to_string(),
            });
        }
        if !status.is_success() {
            return Err(ApiError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().map_err(|e| ApiError::transport(url, e))?;
        serde_json::from_str(&body).map_err(|e| ApiError::decode(url, e))
    }
}

impl Backend for ApiClient {
    fn get(&self, path: &str) -> Result<Value, ApiError> {
        let url = self.url(path);
        log::debug!("GET {}", url);
        self.send(&url, self.http.get(&url))
    }

    fn post(&self, path: &str, body: &Value) -> Result<Value, ApiError> {
        let url = self.url(path);
        log::debug!("POST {} {}", url, body);
        self.send(&url, self.http.post(&url).json(body))
    }
}
