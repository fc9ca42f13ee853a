// # intake-core
//
// Core library for the customer intake workflow.
//
// ## Architecture Overview
//
// This library captures a customer draft, validates it against
// country-dependent rules, submits it to a remote store and keeps a local,
// append-only view of accepted records:
// - **Field rules**: Required fields, email syntax, per-country postal codes
// - **RecordValidator / DraftForm**: Whole-draft validation on every change
// - **SubmissionCoordinator**: validate → create → append → reset
// - **ListSynchronizer**: One startup fetch, then appends of confirmed records
// - **PushAction**: Independent forwarding of a record to a CRM
// - **RecordStore / CrmIntegration**: Traits at the remote boundaries
// - **BackendRegistry**: Backends chosen by name from configuration
//
// ## Design Principles
//
// 1. **Pure validation**: `(draft) -> ValidationResult`, recomputed wholesale
// 2. **Single owner**: The record list is written only by `ListSynchronizer`
// 3. **Isolated failures**: Invalid drafts never reach the network; remote
//    failures leave the draft and the list untouched
// 4. **No hidden retries**: Every failure is surfaced; the user decides

pub mod backend;
pub mod config;
pub mod error;
pub mod events;
pub mod model;
pub mod push;
pub mod registry;
pub mod rules;
pub mod session;
pub mod submission;
pub mod sync;
pub mod traits;
pub mod validation;

// Re-export core types for convenience
pub use traits::{CrmIntegration, PushReceipt, RecordStore};
pub use config::{IntakeConfig, IntegrationConfig, StoreConfig};
pub use error::{Error, Result};
pub use events::{IntakeEvent, Notification};
pub use model::{Address, CustomerDraft, CustomerRecord, DEFAULT_COUNTRY, FieldPath, RecordId};
pub use push::PushAction;
pub use registry::BackendRegistry;
pub use rules::PostalCodeRules;
pub use session::IntakeSession;
pub use submission::{SubmissionCoordinator, SubmitOutcome};
pub use sync::{InitOutcome, ListSynchronizer};
pub use validation::{DraftForm, FieldView, RecordValidator, ValidationResult};
