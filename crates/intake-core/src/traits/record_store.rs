// # Record Store Trait
//
// Defines the request boundary to the remote persistence collaborator.
//
// ## Implementations
//
// - HTTP customer API: `intake-http` crate
// - In-process: `MemoryRecordStore`
//
// ## Usage
//
// ```rust,ignore
// use intake_core::RecordStore;
//
// #[tokio::main]
// async fn main() -> intake_core::Result<()> {
//     let store = /* RecordStore implementation */;
//
//     let confirmed = store.create_record(&draft).await?;
//     let all = store.list_records().await?;
//
//     Ok(())
// }
// ```

use async_trait::async_trait;

use crate::model::{CustomerDraft, CustomerRecord};

/// Trait for record store implementations
///
/// # Thread Safety
///
/// Implementations must be thread-safe and usable across async tasks.
///
/// # Responsibilities
///
/// A store executes exactly one remote request per call and reports the
/// outcome. It must not:
/// - retry or back off (a failed submission is re-issued by the user)
/// - cache records (the list is owned by `ListSynchronizer`)
/// - spawn tasks
/// - validate drafts (owned by `RecordValidator`)
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Persist a validated draft
    ///
    /// # Returns
    ///
    /// - `Ok(CustomerRecord)`: The record as confirmed by the store, carrying
    ///   its server-assigned identifier
    /// - `Err(Error::Transport)`: Non-success status or transport failure
    async fn create_record(&self, draft: &CustomerDraft) -> Result<CustomerRecord, crate::Error>;

    /// Fetch every record the store holds, in store order
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<CustomerRecord>)`: The authoritative list
    /// - `Err(Error::Transport)`: Non-success status or transport failure
    async fn list_records(&self) -> Result<Vec<CustomerRecord>, crate::Error>;

    /// Get the store name (for logging/debugging)
    fn store_name(&self) -> &'static str;
}

/// Helper trait for constructing record stores from configuration
pub trait RecordStoreFactory: Send + Sync {
    /// Create a RecordStore instance from configuration
    fn create(
        &self,
        config: &crate::config::StoreConfig,
    ) -> Result<Box<dyn RecordStore>, crate::Error>;
}
