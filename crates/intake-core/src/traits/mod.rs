//! Collaborator traits for the intake workflow
//!
//! This module defines the request boundaries the core talks through.
//!
//! - [`RecordStore`]: Remote persistence of customer records (create, list)
//! - [`CrmIntegration`]: Third-party CRM the push action forwards records to

pub mod record_store;
pub mod integration;

pub use record_store::{RecordStore, RecordStoreFactory};
pub use integration::{CrmIntegration, CrmIntegrationFactory, PushReceipt};
