//! Events and user-facing notifications
//!
//! Every component reports what happened through one bounded channel.
//! The presentation layer drains it and shows the [`Notification`]s;
//! how they are displayed is not the core's concern.

use tokio::sync::mpsc;
use tracing::warn;

use crate::model::RecordId;

pub const SUBMIT_SUCCESS: &str = "Customer added successfully";
pub const SUBMIT_FAILURE: &str = "Failed to add customer";
pub const PUSH_SUCCESS: &str = "CRM integration successful";
pub const PUSH_FAILURE: &str = "Failed to push to CRM";

/// Events emitted by the intake components
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntakeEvent {
    /// Initial list fetch replaced the local list
    ListLoaded {
        count: usize,
    },

    /// Initial list fetch failed; the list stays as it was
    ListLoadFailed {
        error: String,
    },

    /// Submission blocked locally by validation
    SubmissionRejected {
        error_count: usize,
    },

    /// Create request issued
    SubmissionStarted,

    /// Create request confirmed and appended to the list
    SubmissionSucceeded {
        record_id: RecordId,
    },

    /// Create request failed; the draft is retained
    SubmissionFailed {
        error: String,
    },

    /// Record forwarded to the CRM
    PushSucceeded {
        record_id: RecordId,
    },

    /// CRM push failed; the record is unchanged
    PushFailed {
        record_id: RecordId,
        error: String,
    },
}

/// Discrete message for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Success { message: String },
    Failure { message: String },
}

impl Notification {
    pub fn message(&self) -> &str {
        match self {
            Notification::Success { message } | Notification::Failure { message } => {
                message.as_str()
            }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Notification::Success { .. })
    }
}

impl IntakeEvent {
    /// The notification the user should see for this event, if any
    ///
    /// List loading and validation rejections are not toasted: the former
    /// is only logged, the latter is shown inline next to the fields.
    pub fn notification(&self) -> Option<Notification> {
        let success = |message: &str| Notification::Success {
            message: message.to_string(),
        };
        let failure = |message: &str| Notification::Failure {
            message: message.to_string(),
        };

        match self {
            IntakeEvent::SubmissionSucceeded { .. } => Some(success(SUBMIT_SUCCESS)),
            IntakeEvent::SubmissionFailed { .. } => Some(failure(SUBMIT_FAILURE)),
            IntakeEvent::PushSucceeded { .. } => Some(success(PUSH_SUCCESS)),
            IntakeEvent::PushFailed { .. } => Some(failure(PUSH_FAILURE)),
            IntakeEvent::ListLoaded { .. }
            | IntakeEvent::ListLoadFailed { .. }
            | IntakeEvent::SubmissionRejected { .. }
            | IntakeEvent::SubmissionStarted => None,
        }
    }
}

/// Sending half of the event channel, shared by all components
#[derive(Debug, Clone)]
pub struct EventSink {
    tx: mpsc::Sender<IntakeEvent>,
}

impl EventSink {
    /// Create a sink and the receiver the presentation layer drains
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<IntakeEvent>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }

    /// Emit an event without ever waiting on the receiver
    pub fn emit(&self, event: IntakeEvent) {
        // A full or closed channel drops the event; core state is unaffected
        if let Err(e) = self.tx.try_send(event) {
            warn!("Dropping intake event: {}", e);
        }
    }
}
