//! Upload and fetch lifecycles as explicit state machines.
//!
//! Each workflow owns its state and is mutated only through its transition
//! methods. Requests are split into `begin_*` (returns a ticket) and
//! `complete_*` (applies the outcome) so a front end can run the request
//! wherever it likes; the async `submit`/`load` drivers do both in one call.
//!
//! A ticket is stamped with the workflow instance and its current
//! generation. Outcomes carrying a stale stamp (another instance, a newer
//! request, or a cancelled one) are dropped.

mod result;
mod upload;

use serde::{Deserialize, Serialize};

pub use result::{LOAD_FAILED_MESSAGE, LoadTicket, ResultState, ResultWorkflow};
pub use upload::{
    SubmitTicket, UPLOAD_FAILED_MESSAGE, UPLOAD_SUCCEEDED_MESSAGE, UploadState, UploadWorkflow,
};

/// Severity of a transient notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    Success,
    Error,
}

/// A transient message for the user (toast, status line, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub text: String,
}

impl Notification {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            text: text.into(),
        }
    }
}

/// Identifies one request of one workflow instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Stamp {
    instance: u64,
    generation: u64,
}

/// Instance identity plus request generation.
#[derive(Debug)]
struct Generation {
    instance: u64,
    current: u64,
}

impl Generation {
    fn new() -> Self {
        Self {
            instance: fastrand::u64(..),
            current: 0,
        }
    }

    /// Start a new request, invalidating all earlier stamps.
    fn advance(&mut self) -> Stamp {
        self.current += 1;
        self.stamp()
    }

    fn stamp(&self) -> Stamp {
        Stamp {
            instance: self.instance,
            generation: self.current,
        }
    }

    fn is_current(&self, stamp: Stamp) -> bool {
        stamp == self.stamp()
    }
}
