//! File selection and submission.

use crate::error::{CSV_ONLY_MESSAGE, ServiceError, WorkflowError};
use crate::model::{CandidateFile, ProcessResponse};
use crate::service::AnalysisService;

use super::{Generation, Notification, Stamp};

/// Fallback for upload failures without a better message.
pub const UPLOAD_FAILED_MESSAGE: &str = "Failed to analyze file";

/// Shown when an upload succeeds.
pub const UPLOAD_SUCCEEDED_MESSAGE: &str = "File analyzed successfully!";

/// State of an upload.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadState {
    /// Nothing selected.
    Idle,
    /// A valid CSV file is selected.
    FileSelected(CandidateFile),
    /// The file is being processed.
    Submitting(CandidateFile),
    /// The service accepted the file; the response carries the analysis id.
    Succeeded(ProcessResponse),
    /// The upload failed. The file stays selected so it can be retried.
    Failed {
        message: String,
        candidate: CandidateFile,
    },
}

impl UploadState {
    /// Short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            UploadState::Idle => "idle",
            UploadState::FileSelected(_) => "file_selected",
            UploadState::Submitting(_) => "submitting",
            UploadState::Succeeded(_) => "succeeded",
            UploadState::Failed { .. } => "failed",
        }
    }

    /// The selected file, if any.
    pub fn candidate(&self) -> Option<&CandidateFile> {
        match self {
            UploadState::FileSelected(c)
            | UploadState::Submitting(c)
            | UploadState::Failed { candidate: c, .. } => Some(c),
            UploadState::Idle | UploadState::Succeeded(_) => None,
        }
    }
}

/// Permission to run one upload request.
#[derive(Debug)]
#[must_use = "a submission stays in progress until its ticket is completed"]
pub struct SubmitTicket {
    stamp: Stamp,
    candidate: CandidateFile,
}

impl SubmitTicket {
    /// The file to send.
    pub fn candidate(&self) -> &CandidateFile {
        &self.candidate
    }
}

/// Upload lifecycle: select, validate, submit.
///
/// At most one submission is in flight; a second submit while one is
/// running is ignored.
#[derive(Debug)]
pub struct UploadWorkflow {
    state: UploadState,
    generation: Generation,
    notifications: Vec<Notification>,
}

impl Default for UploadWorkflow {
    fn default() -> Self {
        Self::new()
    }
}

impl UploadWorkflow {
    /// Create a workflow with nothing selected.
    pub fn new() -> Self {
        Self {
            state: UploadState::Idle,
            generation: Generation::new(),
            notifications: Vec::new(),
        }
    }

    pub fn state(&self) -> &UploadState {
        &self.state
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.state, UploadState::Submitting(_))
    }

    /// Id of the created analysis once the upload succeeded.
    pub fn succeeded_id(&self) -> Option<&str> {
        match &self.state {
            UploadState::Succeeded(response) => Some(&response.id),
            _ => None,
        }
    }

    /// Take the queued notifications.
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    /// Select a file. Non-CSV files are rejected and the state is kept.
    pub fn select_file(&mut self, candidate: CandidateFile) -> Result<(), WorkflowError> {
        if self.is_submitting() {
            return Err(WorkflowError::Busy);
        }

        if let Err(e) = candidate.validate() {
            log::debug!("Rejected '{}': not a CSV file", candidate.name());
            self.notifications.push(Notification::error(CSV_ONLY_MESSAGE));
            return Err(e.into());
        }

        log::debug!("Selected '{}' ({} bytes)", candidate.name(), candidate.len());
        self.state = UploadState::FileSelected(candidate);
        Ok(())
    }

    /// Drop the selected file.
    pub fn clear_file(&mut self) {
        if matches!(
            self.state,
            UploadState::FileSelected(_) | UploadState::Failed { .. }
        ) {
            self.state = UploadState::Idle;
        }
    }

    /// Enter `Submitting` and hand out the request ticket.
    ///
    /// Returns `Ok(None)` when a submission is already running.
    pub fn begin_submit(&mut self) -> Result<Option<SubmitTicket>, WorkflowError> {
        match std::mem::replace(&mut self.state, UploadState::Idle) {
            UploadState::FileSelected(candidate) | UploadState::Failed { candidate, .. } => {
                let stamp = self.generation.advance();
                log::debug!("Submitting '{}'", candidate.name());
                self.state = UploadState::Submitting(candidate.clone());
                Ok(Some(SubmitTicket { stamp, candidate }))
            }
            submitting @ UploadState::Submitting(_) => {
                log::debug!("Ignoring submit while a submission is in progress");
                self.state = submitting;
                Ok(None)
            }
            other => {
                self.state = other;
                self.notifications
                    .push(Notification::error(WorkflowError::NoFileSelected.to_string()));
                Err(WorkflowError::NoFileSelected)
            }
        }
    }

    /// Apply the outcome of a submission.
    ///
    /// Returns false (and changes nothing) if the ticket is stale.
    pub fn complete_submit(
        &mut self,
        ticket: SubmitTicket,
        outcome: Result<ProcessResponse, ServiceError>,
    ) -> bool {
        if !self.generation.is_current(ticket.stamp) || !self.is_submitting() {
            log::warn!(
                "Ignoring stale upload response for '{}'",
                ticket.candidate.name()
            );
            return false;
        }

        match outcome {
            Ok(response) => {
                log::debug!(
                    "Upload of '{}' created analysis {}",
                    ticket.candidate.name(),
                    response.id
                );
                self.notifications
                    .push(Notification::success(UPLOAD_SUCCEEDED_MESSAGE));
                self.state = UploadState::Succeeded(response);
            }
            Err(e) => {
                log::debug!("Upload of '{}' failed: {}", ticket.candidate.name(), e);
                let message = e.user_message(UPLOAD_FAILED_MESSAGE);
                let text = if message == UPLOAD_FAILED_MESSAGE {
                    message.clone()
                } else {
                    format!("{}: {}", UPLOAD_FAILED_MESSAGE, message)
                };
                self.notifications.push(Notification::error(text));
                self.state = UploadState::Failed {
                    message,
                    candidate: ticket.candidate,
                };
            }
        }
        true
    }

    /// Abandon a running submission; its response will be ignored.
    pub fn cancel(&mut self) -> bool {
        match std::mem::replace(&mut self.state, UploadState::Idle) {
            UploadState::Submitting(candidate) => {
                self.generation.advance();
                self.state = UploadState::FileSelected(candidate);
                true
            }
            other => {
                self.state = other;
                false
            }
        }
    }

    /// Submit the selected file and wait for the outcome.
    ///
    /// Issues exactly one request, or none if a submission is already in
    /// progress.
    pub async fn submit<S: AnalysisService>(&mut self, service: &S) -> Result<(), WorkflowError> {
        let Some(ticket) = self.begin_submit()? else {
            return Ok(());
        };

        let outcome = service.process(ticket.candidate()).await;
        self.complete_submit(ticket, outcome);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::NotificationLevel;

    fn csv() -> CandidateFile {
        CandidateFile::new("data.csv", Some("text/csv".to_string()), "a,b\n1,2\n")
    }

    #[test]
    fn test_select_valid_file() {
        let mut wf = UploadWorkflow::new();
        wf.select_file(csv()).unwrap();
        assert_eq!(wf.state().name(), "file_selected");
        assert_eq!(wf.state().candidate().unwrap().name(), "data.csv");
    }

    #[test]
    fn test_reject_non_csv_keeps_state() {
        let mut wf = UploadWorkflow::new();
        let err = wf
            .select_file(CandidateFile::new("report.pdf", None, "%PDF"))
            .unwrap_err();
        assert!(matches!(err, WorkflowError::Validation(_)));
        assert_eq!(wf.state(), &UploadState::Idle);

        let notes = wf.drain_notifications();
        assert_eq!(notes, vec![Notification::error(CSV_ONLY_MESSAGE)]);

        wf.select_file(csv()).unwrap();
        wf.select_file(CandidateFile::new("x.json", None, "{}"))
            .unwrap_err();
        assert_eq!(wf.state(), &UploadState::FileSelected(csv()));
    }

    #[test]
    fn test_clear_file() {
        let mut wf = UploadWorkflow::new();
        wf.select_file(csv()).unwrap();
        wf.clear_file();
        assert_eq!(wf.state(), &UploadState::Idle);
    }

    #[test]
    fn test_submit_without_file() {
        let mut wf = UploadWorkflow::new();
        assert_eq!(wf.begin_submit().unwrap_err(), WorkflowError::NoFileSelected);
        assert_eq!(wf.drain_notifications()[0].text, "Please select a file first");
    }

    #[test]
    fn test_duplicate_begin_is_ignored() {
        let mut wf = UploadWorkflow::new();
        wf.select_file(csv()).unwrap();
        let ticket = wf.begin_submit().unwrap();
        assert!(ticket.is_some());
        assert!(wf.begin_submit().unwrap().is_none());
        assert!(wf.is_submitting());
    }

    #[test]
    fn test_select_while_submitting_is_busy() {
        let mut wf = UploadWorkflow::new();
        wf.select_file(csv()).unwrap();
        let _ticket = wf.begin_submit().unwrap();
        assert_eq!(wf.select_file(csv()).unwrap_err(), WorkflowError::Busy);
    }

    #[test]
    fn test_complete_success() {
        let mut wf = UploadWorkflow::new();
        wf.select_file(csv()).unwrap();
        let ticket = wf.begin_submit().unwrap().unwrap();
        assert!(wf.complete_submit(ticket, Ok(ProcessResponse::with_id("abc123"))));
        assert_eq!(wf.succeeded_id(), Some("abc123"));

        let notes = wf.drain_notifications();
        assert_eq!(notes[0].level, NotificationLevel::Success);
        assert_eq!(notes[0].text, UPLOAD_SUCCEEDED_MESSAGE);
    }

    #[test]
    fn test_failure_then_retry() {
        let mut wf = UploadWorkflow::new();
        wf.select_file(csv()).unwrap();
        let ticket = wf.begin_submit().unwrap().unwrap();
        wf.complete_submit(
            ticket,
            Err(ServiceError::Http {
                status: 400,
                body: Some(serde_json::json!({"error": "No file uploaded"})),
            }),
        );

        match wf.state() {
            UploadState::Failed { message, candidate } => {
                assert_eq!(message, "No file uploaded");
                assert_eq!(candidate.name(), "data.csv");
            }
            other => panic!("unexpected state {:?}", other),
        }
        assert_eq!(
            wf.drain_notifications()[0].text,
            "Failed to analyze file: No file uploaded"
        );

        let retry = wf.begin_submit().unwrap().unwrap();
        assert_eq!(retry.candidate().name(), "data.csv");
    }

    #[test]
    fn test_failure_without_detail_not_repeated() {
        let mut wf = UploadWorkflow::new();
        wf.select_file(csv()).unwrap();
        let ticket = wf.begin_submit().unwrap().unwrap();
        wf.complete_submit(
            ticket,
            Err(ServiceError::MalformedResponse("missing field `id`".to_string())),
        );

        assert!(matches!(
            wf.state(),
            UploadState::Failed { message, .. } if message == UPLOAD_FAILED_MESSAGE
        ));
        assert_eq!(
            wf.drain_notifications(),
            vec![Notification::error(UPLOAD_FAILED_MESSAGE)]
        );
    }

    #[test]
    fn test_cancel_ignores_late_response() {
        let mut wf = UploadWorkflow::new();
        wf.select_file(csv()).unwrap();
        let ticket = wf.begin_submit().unwrap().unwrap();
        assert!(wf.cancel());
        assert_eq!(wf.state().name(), "file_selected");

        assert!(!wf.complete_submit(ticket, Ok(ProcessResponse::with_id("late"))));
        assert_eq!(wf.succeeded_id(), None);
        assert!(wf.drain_notifications().is_empty());
    }

    #[test]
    fn test_ticket_from_other_instance_ignored() {
        let mut old = UploadWorkflow::new();
        old.select_file(csv()).unwrap();
        let stale = old.begin_submit().unwrap().unwrap();
        drop(old);

        let mut replacement = UploadWorkflow::new();
        replacement.select_file(csv()).unwrap();
        let _own = replacement.begin_submit().unwrap().unwrap();

        assert!(!replacement.complete_submit(stale, Ok(ProcessResponse::with_id("stale"))));
        assert!(replacement.is_submitting());
    }
}
