//! Submission coordinator
//!
//! Drives one submission attempt through:
//!
//! ```text
//! Idle → Validating ─┬─ invalid ──────────────────────────────→ Idle (ValidationResult)
//!                    └─ valid → Submitting ─┬─ failure ────────→ Idle (draft kept)
//!                                           └─ success → AppendingLocal → Idle (draft cleared)
//! ```
//!
//! Each step fails in isolation: an invalid draft never reaches the
//! store, and a failed create touches neither the draft nor the list.
//! Nothing is retried; the user resubmits explicitly.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::events::{EventSink, IntakeEvent};
use crate::model::CustomerRecord;
use crate::sync::ListSynchronizer;
use crate::traits::RecordStore;
use crate::validation::{DraftForm, ValidationResult};

/// States of a single submission attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionPhase {
    Idle,
    Validating,
    Submitting,
    AppendingLocal,
}

/// Non-error result of a submission attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Blocked locally; no request was issued
    Invalid(ValidationResult),
    /// Accepted by the store and appended to the list
    Submitted(CustomerRecord),
}

impl SubmitOutcome {
    pub fn is_submitted(&self) -> bool {
        matches!(self, SubmitOutcome::Submitted(_))
    }
}

/// Orchestrates validate → create → append → reset
pub struct SubmissionCoordinator {
    store: Arc<dyn RecordStore>,
    list: Arc<ListSynchronizer>,
    events: EventSink,
    attempts: AtomicU64,
}

impl SubmissionCoordinator {
    pub fn new(
        store: Arc<dyn RecordStore>,
        list: Arc<ListSynchronizer>,
        events: EventSink,
    ) -> Self {
        Self {
            store,
            list,
            events,
            attempts: AtomicU64::new(0),
        }
    }

    /// Submit the form's current draft
    ///
    /// # Returns
    ///
    /// - `Ok(SubmitOutcome::Invalid)`: validation failed; nothing was sent
    /// - `Ok(SubmitOutcome::Submitted)`: the confirmed record, already
    ///   appended to the list; the form has been reset
    /// - `Err(Error::Transport)`: the store failed; form and list unchanged
    pub async fn submit(&self, form: &mut DraftForm) -> Result<SubmitOutcome> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;

        self.enter(attempt, SubmissionPhase::Validating);
        let validation = form.revalidate().clone();
        if !validation.is_valid() {
            debug!(
                "Submission #{} blocked by {} validation error(s)",
                attempt,
                validation.error_count()
            );
            self.events.emit(IntakeEvent::SubmissionRejected {
                error_count: validation.error_count(),
            });
            self.enter(attempt, SubmissionPhase::Idle);
            return Ok(SubmitOutcome::Invalid(validation));
        }

        self.enter(attempt, SubmissionPhase::Submitting);
        self.events.emit(IntakeEvent::SubmissionStarted);

        let record = match self.store.create_record(form.draft()).await {
            Ok(record) => record,
            Err(e) => {
                let error = match e {
                    Error::Transport(_) => e,
                    other => Error::transport(other.to_string()),
                };
                warn!(
                    "Submission #{} to {} failed: {}",
                    attempt,
                    self.store.store_name(),
                    error
                );
                self.events.emit(IntakeEvent::SubmissionFailed {
                    error: error.to_string(),
                });
                self.enter(attempt, SubmissionPhase::Idle);
                return Err(error);
            }
        };

        self.enter(attempt, SubmissionPhase::AppendingLocal);
        self.list.append(record.clone()).await;
        form.reset();

        info!("Submission #{} confirmed as record {}", attempt, record.id);
        self.events.emit(IntakeEvent::SubmissionSucceeded {
            record_id: record.id.clone(),
        });
        self.enter(attempt, SubmissionPhase::Idle);

        Ok(SubmitOutcome::Submitted(record))
    }

    fn enter(&self, attempt: u64, phase: SubmissionPhase) {
        debug!("Submission #{} -> {:?}", attempt, phase);
    }
}

impl std::fmt::Debug for SubmissionCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubmissionCoordinator")
            .field("store", &self.store.store_name())
            .field("attempts", &self.attempts.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}
