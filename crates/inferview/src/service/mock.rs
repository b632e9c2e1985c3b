//! Mock service for testing.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::ServiceError;
use crate::model::{AnalysisResult, CandidateFile, ProcessResponse};

use super::AnalysisService;

/// Mock service that returns predictable responses and counts requests.
///
/// Unknown ids are reported as not found. Uploads fail with a request
/// error unless a response was configured.
#[derive(Debug, Default)]
pub struct MockService {
    process_outcome: Option<Result<ProcessResponse, ServiceError>>,
    analyses: HashMap<String, Result<AnalysisResult, ServiceError>>,
    process_calls: AtomicUsize,
    fetch_calls: AtomicUsize,
    uploaded: Mutex<Vec<String>>,
}

impl MockService {
    /// Create a mock with nothing configured.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every upload with this response.
    pub fn with_process_response(mut self, response: ProcessResponse) -> Self {
        self.process_outcome = Some(Ok(response));
        self
    }

    /// Fail every upload with this error.
    pub fn with_process_error(mut self, error: ServiceError) -> Self {
        self.process_outcome = Some(Err(error));
        self
    }

    /// Serve an analysis under its own id.
    pub fn with_analysis(mut self, analysis: AnalysisResult) -> Self {
        self.analyses.insert(analysis.id.clone(), Ok(analysis));
        self
    }

    /// Fail fetches of `id` with this error.
    pub fn with_fetch_error(mut self, id: impl Into<String>, error: ServiceError) -> Self {
        self.analyses.insert(id.into(), Err(error));
        self
    }

    /// Number of upload requests received.
    pub fn process_calls(&self) -> usize {
        self.process_calls.load(Ordering::SeqCst)
    }

    /// Number of fetch requests received.
    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    /// Names of uploaded files, in request order.
    pub fn uploaded_files(&self) -> Vec<String> {
        self.uploaded
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl AnalysisService for MockService {
    async fn process(&self, file: &CandidateFile) -> Result<ProcessResponse, ServiceError> {
        self.process_calls.fetch_add(1, Ordering::SeqCst);
        self.uploaded
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(file.name().to_string());

        self.process_outcome.clone().unwrap_or_else(|| {
            Err(ServiceError::Request(
                "mock service has no upload response configured".to_string(),
            ))
        })
    }

    async fn fetch(&self, id: &str) -> Result<AnalysisResult, ServiceError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);

        self.analyses
            .get(id)
            .cloned()
            .unwrap_or_else(|| Err(ServiceError::NotFound { id: id.to_string() }))
    }

    fn name(&self) -> &str {
        "mock"
    }
}
