//! Fetching a stored analysis by id.

use crate::error::ServiceError;
use crate::model::AnalysisResult;
use crate::service::AnalysisService;
use crate::view::{ResultHeader, ResultView, present};

use super::{Generation, Notification, Stamp};

/// Fallback for fetch failures without a better message.
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load analysis results";

/// State of a results view.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultState {
    /// Nothing requested yet.
    Idle,
    /// Waiting for the analysis.
    Loading { id: String },
    /// The analysis arrived and passed validation.
    Loaded(AnalysisResult),
    /// The service has no analysis with this id.
    NotFound { id: String },
    /// The fetch failed; `message` is meant for the user.
    Failed { id: String, message: String },
}

impl ResultState {
    /// Short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            ResultState::Idle => "idle",
            ResultState::Loading { .. } => "loading",
            ResultState::Loaded(_) => "loaded",
            ResultState::NotFound { .. } => "not_found",
            ResultState::Failed { .. } => "failed",
        }
    }
}

/// Permission to apply one fetch outcome.
#[derive(Debug)]
#[must_use = "the view stays loading until its ticket is completed"]
pub struct LoadTicket {
    stamp: Stamp,
    id: String,
}

impl LoadTicket {
    /// The id to fetch.
    pub fn id(&self) -> &str {
        &self.id
    }
}

/// Results lifecycle for one view.
///
/// Loading a new id discards whatever was shown before; nothing is cached
/// across ids.
#[derive(Debug)]
pub struct ResultWorkflow {
    state: ResultState,
    generation: Generation,
    notifications: Vec<Notification>,
}

impl Default for ResultWorkflow {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultWorkflow {
    pub fn new() -> Self {
        Self {
            state: ResultState::Idle,
            generation: Generation::new(),
            notifications: Vec::new(),
        }
    }

    pub fn state(&self) -> &ResultState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, ResultState::Loading { .. })
    }

    /// The loaded analysis, if any.
    pub fn result(&self) -> Option<&AnalysisResult> {
        match &self.state {
            ResultState::Loaded(result) => Some(result),
            _ => None,
        }
    }

    /// Display model of the loaded analysis.
    pub fn view(&self) -> Option<ResultView> {
        self.result().map(present)
    }

    /// Header (file name, upload time) of the loaded analysis.
    pub fn header(&self) -> Option<ResultHeader> {
        self.result().map(ResultHeader::from_result)
    }

    /// Message for the persistent error panel, if the fetch failed.
    pub fn error_message(&self) -> Option<&str> {
        match &self.state {
            ResultState::Failed { message, .. } => Some(message),
            _ => None,
        }
    }

    /// Take the queued notifications.
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    /// Enter `Loading` for `id`, dropping any previous state.
    pub fn begin_load(&mut self, id: impl Into<String>) -> LoadTicket {
        let id = id.into();
        let stamp = self.generation.advance();
        log::debug!("Loading analysis {}", id);
        self.state = ResultState::Loading { id: id.clone() };
        LoadTicket { stamp, id }
    }

    /// Apply the outcome of a fetch.
    ///
    /// Returns false (and changes nothing) if the ticket is stale.
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        outcome: Result<AnalysisResult, ServiceError>,
    ) -> bool {
        if !self.generation.is_current(ticket.stamp) || !self.is_loading() {
            log::warn!("Ignoring stale response for analysis {}", ticket.id);
            return false;
        }

        self.state = match outcome {
            Ok(mut result) => {
                if result.id.is_empty() {
                    result.id = ticket.id;
                }
                log::debug!(
                    "Loaded analysis {} ({} columns, {} rows)",
                    result.id,
                    result.column_count(),
                    result.row_count()
                );
                ResultState::Loaded(result)
            }
            Err(e) if e.is_not_found() => {
                log::debug!("Analysis {} not found", ticket.id);
                ResultState::NotFound { id: ticket.id }
            }
            Err(e) => {
                log::debug!("Loading analysis {} failed: {}", ticket.id, e);
                let message = e.user_message(LOAD_FAILED_MESSAGE);
                self.notifications.push(Notification::error(message.clone()));
                ResultState::Failed {
                    id: ticket.id,
                    message,
                }
            }
        };
        true
    }

    /// Stop waiting for the current fetch; a late response is ignored.
    pub fn cancel(&mut self) -> bool {
        if self.is_loading() {
            self.generation.advance();
            self.state = ResultState::Idle;
            true
        } else {
            false
        }
    }

    /// Fetch `id` and wait for the outcome.
    ///
    /// Issues exactly one request, except for a blank id: that cannot name
    /// an analysis, so it goes straight to `NotFound` without a request.
    pub async fn load<S: AnalysisService>(&mut self, id: &str, service: &S) -> &ResultState {
        let ticket = self.begin_load(id);

        let outcome = if id.trim().is_empty() {
            Err(ServiceError::NotFound { id: id.to_string() })
        } else {
            service.fetch(id).await
        };

        self.complete_load(ticket, outcome);
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn analysis() -> AnalysisResult {
        AnalysisResult::from_value(json!({
            "file_name": "t.csv",
            "upload_time": "2024-01-01T00:00:00Z",
            "columns": ["a"],
            "dtypes": {"a": "int64"},
            "data": [{"a": 1}]
        }))
        .unwrap()
    }

    #[test]
    fn test_begin_enters_loading() {
        let mut wf = ResultWorkflow::new();
        assert_eq!(wf.state(), &ResultState::Idle);
        let ticket = wf.begin_load("abc");
        assert_eq!(ticket.id(), "abc");
        assert_eq!(
            wf.state(),
            &ResultState::Loading {
                id: "abc".to_string()
            }
        );
    }

    #[test]
    fn test_loaded_fills_missing_id() {
        let mut wf = ResultWorkflow::new();
        let ticket = wf.begin_load("abc");
        assert!(wf.complete_load(ticket, Ok(analysis())));
        assert_eq!(wf.result().unwrap().id, "abc");
        assert!(wf.view().is_some());
        assert_eq!(wf.header().unwrap().file_name, "t.csv");
    }

    #[test]
    fn test_not_found_is_not_failure() {
        let mut wf = ResultWorkflow::new();
        let ticket = wf.begin_load("missing-id");
        wf.complete_load(
            ticket,
            Err(ServiceError::NotFound {
                id: "missing-id".to_string(),
            }),
        );
        assert_eq!(wf.state().name(), "not_found");
        assert!(wf.error_message().is_none());
        assert!(wf.drain_notifications().is_empty());
    }

    #[test]
    fn test_failure_message() {
        let mut wf = ResultWorkflow::new();
        let ticket = wf.begin_load("abc");
        wf.complete_load(
            ticket,
            Err(ServiceError::Http {
                status: 500,
                body: None,
            }),
        );
        assert_eq!(
            wf.error_message(),
            Some("Internal server error. Please try again later.")
        );
        assert_eq!(wf.drain_notifications().len(), 1);
    }

    #[test]
    fn test_new_id_discards_old_response() {
        let mut wf = ResultWorkflow::new();
        let first = wf.begin_load("first");
        let second = wf.begin_load("second");

        assert!(!wf.complete_load(first, Ok(analysis())));
        assert!(wf.is_loading());

        assert!(wf.complete_load(second, Ok(analysis())));
        assert_eq!(wf.result().unwrap().id, "second");
    }

    #[test]
    fn test_cancel() {
        let mut wf = ResultWorkflow::new();
        let ticket = wf.begin_load("abc");
        assert!(wf.cancel());
        assert!(!wf.complete_load(ticket, Ok(analysis())));
        assert_eq!(wf.state(), &ResultState::Idle);
        assert!(!wf.cancel());
    }
}
