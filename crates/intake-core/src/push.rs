//! External push action
//!
//! Forwards one confirmed record to the CRM. The action is stateless: it
//! borrows the record immutably, holds no reference to the record list or
//! the draft form, and reports its outcome only through its own return
//! value and event. A failed push is never retried.

use std::sync::Arc;
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::events::{EventSink, IntakeEvent};
use crate::model::CustomerRecord;
use crate::traits::{CrmIntegration, PushReceipt};

pub struct PushAction {
    integration: Arc<dyn CrmIntegration>,
    events: EventSink,
}

impl PushAction {
    pub fn new(integration: Arc<dyn CrmIntegration>, events: EventSink) -> Self {
        Self {
            integration,
            events,
        }
    }

    /// Push `record` to the CRM
    ///
    /// Failures come back as `Error::Integration`; non-integration errors
    /// raised by the implementation are folded into that variant.
    pub async fn push(&self, record: &CustomerRecord) -> Result<PushReceipt> {
        match self.integration.push_record(record).await {
            Ok(receipt) => {
                info!(
                    "Pushed record {} to {}",
                    record.id,
                    self.integration.integration_name()
                );
                self.events.emit(IntakeEvent::PushSucceeded {
                    record_id: record.id.clone(),
                });
                Ok(receipt)
            }
            Err(e) => {
                let error = match e {
                    Error::Integration(_) => e,
                    other => Error::integration(other.to_string()),
                };
                warn!(
                    "Failed to push record {} to {}: {}",
                    record.id,
                    self.integration.integration_name(),
                    error
                );
                self.events.emit(IntakeEvent::PushFailed {
                    record_id: record.id.clone(),
                    error: error.to_string(),
                });
                Err(error)
            }
        }
    }
}

impl std::fmt::Debug for PushAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PushAction")
            .field("integration", &self.integration.integration_name())
            .finish_non_exhaustive()
    }
}
