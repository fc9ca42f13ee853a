//! Intake session
//!
//! Wires the workflow components over a single event channel:
//!
//! ```text
//!  user input ──→ DraftForm ──(RecordValidator on every change)
//!                    │
//!               submit intent
//!                    ▼
//!          ┌───────────────────────┐   create   ┌──────────────┐
//!          │ SubmissionCoordinator │──────────→│ RecordStore  │
//!          └───────────────────────┘            └──────────────┘
//!                    │ append                          ▲ list (once)
//!                    ▼                                 │
//!          ┌───────────────────────┐                   │
//!          │   ListSynchronizer    │───────────────────┘
//!          └───────────────────────┘
//!
//!          ┌───────────────────────┐   push     ┌────────────────┐
//!          │      PushAction       │──────────→│ CrmIntegration │
//!          └───────────────────────┘            └────────────────┘
//! ```
//!
//! The push action shares nothing with the other two components except the
//! event channel.
//!
//! ## Lifecycle
//!
//! 1. Create with [`IntakeSession::new()`] (or from a registry)
//! 2. Call [`IntakeSession::start()`] once to load the record list
//! 3. Feed input through [`IntakeSession::form_mut()`], then
//!    [`IntakeSession::submit()`]; push records with [`IntakeSession::push()`]
//! 4. Drain the returned event receiver for notifications

use std::sync::Arc;
use tokio::sync::mpsc;

use crate::config::IntakeConfig;
use crate::error::{Error, Result};
use crate::events::{EventSink, IntakeEvent};
use crate::model::{CustomerRecord, RecordId};
use crate::push::PushAction;
use crate::registry::BackendRegistry;
use crate::rules::PostalCodeRules;
use crate::submission::{SubmissionCoordinator, SubmitOutcome};
use crate::sync::{InitOutcome, ListSynchronizer};
use crate::traits::{CrmIntegration, PushReceipt, RecordStore};
use crate::validation::{DraftForm, RecordValidator};

/// One user's intake workflow: a draft form, the synchronized list and
/// the push action
#[derive(Debug)]
pub struct IntakeSession {
    form: DraftForm,
    list: Arc<ListSynchronizer>,
    coordinator: SubmissionCoordinator,
    push: PushAction,
    default_country: String,
}

impl IntakeSession {
    /// Create a session over the given collaborators
    ///
    /// # Returns
    ///
    /// A tuple of (session, event_receiver) where event_receiver yields
    /// intake events
    pub fn new(
        store: Arc<dyn RecordStore>,
        integration: Arc<dyn CrmIntegration>,
        config: &IntakeConfig,
    ) -> Result<(Self, mpsc::Receiver<IntakeEvent>)> {
        config.validate()?;

        let (events, rx) = EventSink::channel(config.event_channel_capacity);
        let list = Arc::new(ListSynchronizer::new(store.clone(), events.clone()));
        let coordinator = SubmissionCoordinator::new(store, list.clone(), events.clone());
        let push = PushAction::new(integration, events);
        let validator = RecordValidator::with_rules(
            PostalCodeRules::standard(),
            config.default_country.clone(),
        );

        let session = Self {
            form: DraftForm::new(validator),
            list,
            coordinator,
            push,
            default_country: config.default_country.clone(),
        };

        Ok((session, rx))
    }

    /// Create a session whose backends are built by `registry` from `config`
    pub fn from_registry(
        registry: &BackendRegistry,
        config: &IntakeConfig,
    ) -> Result<(Self, mpsc::Receiver<IntakeEvent>)> {
        config.validate()?;
        let store: Arc<dyn RecordStore> = Arc::from(registry.create_store(&config.store)?);
        let integration: Arc<dyn CrmIntegration> =
            Arc::from(registry.create_integration(&config.integration)?);
        Self::new(store, integration, config)
    }

    /// Replace the postal-code table (resets the form)
    pub fn with_postal_rules(mut self, rules: PostalCodeRules) -> Self {
        let validator = RecordValidator::with_rules(rules, self.default_country.clone());
        self.form = DraftForm::new(validator);
        self
    }

    /// Load the record list; only the first call issues a request
    pub async fn start(&self) -> Result<InitOutcome> {
        self.list.initialize().await
    }

    pub fn form(&self) -> &DraftForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut DraftForm {
        &mut self.form
    }

    /// Submit the current draft
    pub async fn submit(&mut self) -> Result<SubmitOutcome> {
        self.coordinator.submit(&mut self.form).await
    }

    /// Push a listed record to the CRM
    ///
    /// # Errors
    ///
    /// `Error::NotFound` if no listed record has `id`; otherwise whatever
    /// the push action reports.
    pub async fn push(&self, id: &RecordId) -> Result<PushReceipt> {
        let record = self
            .list
            .get(id)
            .await
            .ok_or_else(|| Error::not_found(format!("No listed record with id {}", id)))?;
        self.push.push(&record).await
    }

    /// Push an arbitrary confirmed record to the CRM
    pub async fn push_record(&self, record: &CustomerRecord) -> Result<PushReceipt> {
        self.push.push(record).await
    }

    /// Snapshot of the synchronized list
    pub async fn records(&self) -> Vec<CustomerRecord> {
        self.list.records().await
    }

    /// Look up a listed record by id
    pub async fn get(&self, id: &RecordId) -> Option<CustomerRecord> {
        self.list.get(id).await
    }
}
