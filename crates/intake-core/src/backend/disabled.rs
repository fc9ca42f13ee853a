// # Disabled CRM Integration
//
// Used when no CRM is configured. Every push fails with an integration
// error, which the push action surfaces like any other CRM failure.

use async_trait::async_trait;

use crate::config::IntegrationConfig;
use crate::model::CustomerRecord;
use crate::traits::{CrmIntegration, CrmIntegrationFactory, PushReceipt};
use crate::Error;

#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledIntegration;

#[async_trait]
impl CrmIntegration for DisabledIntegration {
    async fn push_record(&self, record: &CustomerRecord) -> Result<PushReceipt, Error> {
        Err(Error::integration(format!(
            "No CRM integration configured; record {} was not pushed",
            record.id
        )))
    }

    fn integration_name(&self) -> &'static str {
        "disabled"
    }
}

/// Factory for the disabled integration
pub struct DisabledIntegrationFactory;

impl CrmIntegrationFactory for DisabledIntegrationFactory {
    fn create(&self, config: &IntegrationConfig) -> Result<Box<dyn CrmIntegration>, Error> {
        match config {
            IntegrationConfig::Disabled => Ok(Box::new(DisabledIntegration)),
            _ => Err(Error::config("Invalid config for disabled integration")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CustomerDraft, RecordId};

    #[tokio::test]
    async fn test_disabled_push_fails_as_integration_error() {
        let record = CustomerRecord::new(RecordId::new("r1"), CustomerDraft::default());
        let err = DisabledIntegration.push_record(&record).await.unwrap_err();
        assert!(matches!(err, Error::Integration(_)));
        assert!(err.to_string().contains("r1"));
    }
}
