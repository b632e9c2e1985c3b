//! Inferview: client-side view model for remote column type inference.
//!
//! A CSV file is uploaded to an inference service, which answers with the
//! pandas-style dtype it inferred for every column plus the processed rows.
//! This crate turns that loosely-typed answer into something a front end can
//! render safely.
//!
//! # Core Pieces
//!
//! - **Classification**: raw dtype tags (`int64`, `datetime64[ns]`, ...) map to
//!   a small set of semantic categories
//! - **Formatting**: every cell is rendered according to its column category
//! - **Workflows**: upload and fetch lifecycles as explicit state machines
//!
//! # Example
//!
//! ```no_run
//! use inferview::{CandidateFile, ClientConfig, HttpAnalysisService, ResultWorkflow, UploadWorkflow};
//!
//! # async fn run() -> inferview::Result<()> {
//! let service = HttpAnalysisService::new(ClientConfig::from_env())?;
//!
//! let mut upload = UploadWorkflow::new();
//! upload.select_file(CandidateFile::from_path("sales.csv")?)?;
//! upload.submit(&service).await?;
//!
//! if let Some(id) = upload.succeeded_id() {
//!     let mut results = ResultWorkflow::new();
//!     results.load(id, &service).await;
//!     if let Some(view) = results.view() {
//!         println!("Columns: {}", view.columns.len());
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod format;
pub mod model;
pub mod service;
pub mod types;
pub mod view;
pub mod workflow;

pub use error::{InferviewError, Result, ServiceError, ValidationError, WorkflowError};
pub use format::{PLACEHOLDER, format_value};
pub use model::{AnalysisResult, CandidateFile, ProcessResponse, Record};
pub use service::{AnalysisService, ClientConfig, HttpAnalysisService, MockService};
pub use types::{SemanticCategory, TypeClassification, classify};
pub use view::{
    ColumnView, DEFAULT_PREVIEW_ROWS, ResultHeader, ResultView, RowView, present,
    present_preview,
};
pub use workflow::{
    LoadTicket, Notification, NotificationLevel, ResultState, ResultWorkflow, SubmitTicket,
    UploadState, UploadWorkflow,
};
