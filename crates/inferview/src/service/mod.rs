//! Access to the remote inference service.
//!
//! Two operations are consumed: uploading a file for processing and
//! fetching a stored analysis by id.
//!
//! # Implementations
//!
//! - **HttpAnalysisService** - talks to a running service over HTTP
//! - **MockService** - canned responses and request counters, for tests

mod config;
mod http;
mod mock;

use std::future::Future;

use crate::error::ServiceError;
use crate::model::{AnalysisResult, CandidateFile, ProcessResponse};

pub use config::ClientConfig;
pub use http::HttpAnalysisService;
pub use mock::MockService;

/// Trait for inference service clients.
///
/// Implementations must be thread-safe (Send + Sync) so a front end can
/// share one client between its workflows.
pub trait AnalysisService: Send + Sync {
    /// Upload a file for processing.
    ///
    /// # Returns
    /// The response carrying the new analysis id
    fn process(
        &self,
        file: &CandidateFile,
    ) -> impl Future<Output = Result<ProcessResponse, ServiceError>> + Send;

    /// Fetch a stored analysis.
    ///
    /// A missing analysis is reported as [`ServiceError::NotFound`].
    fn fetch(&self, id: &str) -> impl Future<Output = Result<AnalysisResult, ServiceError>> + Send;

    /// Get the name of this client (for logging/debugging).
    fn name(&self) -> &str;
}
