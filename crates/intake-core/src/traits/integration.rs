// # CRM Integration Trait
//
// Defines the request boundary to the third-party CRM.
//
// Pushing is a side action on an already-confirmed record: it never
// changes the record or the synchronized list, whatever the outcome.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::model::{CustomerRecord, RecordId};

/// Acknowledgement of a successful push
#[derive(Debug, Clone, PartialEq)]
pub struct PushReceipt {
    /// The record that was forwarded
    pub record_id: RecordId,
    /// When the integration acknowledged it
    pub pushed_at: DateTime<Utc>,
    /// Integration-specific response body
    pub response: serde_json::Value,
}

impl PushReceipt {
    pub fn new(record_id: RecordId, response: serde_json::Value) -> Self {
        Self {
            record_id,
            pushed_at: Utc::now(),
            response,
        }
    }
}

/// Trait for CRM integration implementations
///
/// Implementations are single-shot: one request per call, no retry, no
/// caching, no access to the record list.
#[async_trait]
pub trait CrmIntegration: Send + Sync {
    /// Forward a confirmed record to the CRM
    ///
    /// # Returns
    ///
    /// - `Ok(PushReceipt)`: The CRM accepted the record
    /// - `Err(Error::Integration)`: The CRM rejected it or was unreachable
    async fn push_record(&self, record: &CustomerRecord) -> Result<PushReceipt, crate::Error>;

    /// Get the integration name (for logging/debugging)
    fn integration_name(&self) -> &'static str;
}

/// Helper trait for constructing CRM integrations from configuration
pub trait CrmIntegrationFactory: Send + Sync {
    /// Create a CrmIntegration instance from configuration
    fn create(
        &self,
        config: &crate::config::IntegrationConfig,
    ) -> Result<Box<dyn CrmIntegration>, crate::Error>;
}
