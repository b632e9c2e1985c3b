//! HTTP client for the inference service.

use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, StatusCode, Url};
use serde_json::Value;

use crate::error::{InferviewError, Result, ServiceError};
use crate::model::{AnalysisResult, CandidateFile, ProcessResponse};

use super::AnalysisService;
use super::config::ClientConfig;

/// Media type sent when the candidate declares none.
const DEFAULT_UPLOAD_MEDIA_TYPE: &str = "text/csv";

/// Inference service reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpAnalysisService {
    client: Client,
    base_url: Url,
    config: ClientConfig,
}

impl HttpAnalysisService {
    /// Create a client with the given configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| InferviewError::Config(format!("Failed to create HTTP client: {}", e)))?;

        let base_url = Url::parse(config.base_url.trim()).map_err(|e| {
            InferviewError::Config(format!("Invalid API URL '{}': {}", config.base_url, e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(InferviewError::Config(format!(
                "API URL '{}' cannot have endpoint paths appended",
                config.base_url
            )));
        }

        Ok(Self {
            client,
            base_url,
            config,
        })
    }

    /// Create a client configured from the environment.
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env())
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Endpoint URL with a trailing slash, e.g. `/api/analysis/{id}/`.
    fn endpoint(&self, segments: &[&str]) -> std::result::Result<Url, ServiceError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ServiceError::Request(format!("cannot extend URL '{}'", self.base_url)))?
            .pop_if_empty()
            .extend(segments)
            .push("");
        Ok(url)
    }
}

impl AnalysisService for HttpAnalysisService {
    async fn process(&self, file: &CandidateFile) -> std::result::Result<ProcessResponse, ServiceError> {
        let url = self.endpoint(&["api", "process-data"])?;
        log::debug!(
            "POST {} ({}, {} bytes, {})",
            url,
            file.name(),
            file.len(),
            file.digest()
        );

        let part = Part::bytes(file.contents().to_vec())
            .file_name(file.name().to_string())
            .mime_str(file.media_type().unwrap_or(DEFAULT_UPLOAD_MEDIA_TYPE))
            .map_err(|e| ServiceError::Request(e.to_string()))?;
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(map_send_error)?;

        if !response.status().is_success() {
            return Err(failure_from(response).await);
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| ServiceError::Network(e.to_string()))?;
        ProcessResponse::decode(&body)
    }

    async fn fetch(&self, id: &str) -> std::result::Result<AnalysisResult, ServiceError> {
        let url = self.endpoint(&["api", "analysis", id])?;
        log::debug!("GET {}", url);

        let response = self.client.get(url).send().await.map_err(map_send_error)?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(ServiceError::NotFound { id: id.to_string() });
        }
        if !response.status().is_success() {
            return Err(failure_from(response).await);
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| ServiceError::Network(e.to_string()))?;
        AnalysisResult::decode(&body)
    }

    fn name(&self) -> &str {
        "http"
    }
}

/// Classify a failure to get any response.
fn map_send_error(e: reqwest::Error) -> ServiceError {
    if e.is_builder() {
        ServiceError::Request(e.to_string())
    } else {
        ServiceError::Network(e.to_string())
    }
}

/// Capture status and (if JSON) body of a non-success response.
async fn failure_from(response: Response) -> ServiceError {
    let status = response.status().as_u16();
    let body = response
        .bytes()
        .await
        .ok()
        .and_then(|b| serde_json::from_slice::<Value>(&b).ok());
    log::debug!("Service responded with status {}", status);
    ServiceError::Http { status, body }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(base: &str) -> HttpAnalysisService {
        HttpAnalysisService::new(ClientConfig::default().with_base_url(base)).unwrap()
    }

    #[test]
    fn test_endpoint_paths() {
        let svc = service("http://localhost:8000");
        assert_eq!(
            svc.endpoint(&["api", "process-data"]).unwrap().as_str(),
            "http://localhost:8000/api/process-data/"
        );
        assert_eq!(
            svc.endpoint(&["api", "analysis", "abc123"]).unwrap().as_str(),
            "http://localhost:8000/api/analysis/abc123/"
        );
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let svc = service("https://example.org/infer/");
        assert_eq!(
            svc.endpoint(&["api", "analysis", "x"]).unwrap().as_str(),
            "https://example.org/infer/api/analysis/x/"
        );
    }

    #[test]
    fn test_endpoint_escapes_id() {
        let svc = service("http://localhost:8000");
        let url = svc.endpoint(&["api", "analysis", "a/b c"]).unwrap();
        assert_eq!(url.path(), "/api/analysis/a%2Fb%20c/");
    }

    #[test]
    fn test_invalid_base_url() {
        let err = HttpAnalysisService::new(ClientConfig::default().with_base_url("not a url"));
        assert!(matches!(err, Err(InferviewError::Config(_))));

        let err = HttpAnalysisService::new(ClientConfig::default().with_base_url("mailto:a@b.c"));
        assert!(matches!(err, Err(InferviewError::Config(_))));
    }
}
