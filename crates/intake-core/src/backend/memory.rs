// # Memory Record Store
//
// In-memory implementation of RecordStore.
//
// ## Purpose
//
// Stands in for the customer API in tests, demos and local dry runs.
// Records are lost when the process exits.
//
// Identifiers are assigned sequentially (`mem-1`, `mem-2`, ...), mirroring
// the way the real store assigns one on successful creation.

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

use crate::config::StoreConfig;
use crate::model::{CustomerDraft, CustomerRecord, RecordId};
use crate::traits::{RecordStore, RecordStoreFactory};
use crate::Error;

/// In-memory record store implementation
///
/// # Example
///
/// ```rust,no_run
/// use intake_core::backend::MemoryRecordStore;
/// use intake_core::traits::RecordStore;
/// use intake_core::CustomerDraft;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = MemoryRecordStore::new();
///
///     let record = store.create_record(&CustomerDraft::default()).await?;
///     assert_eq!(record.id.as_str(), "mem-1");
///     assert_eq!(store.list_records().await?.len(), 1);
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryRecordStore {
    records: Arc<RwLock<Vec<CustomerRecord>>>,
    next_id: Arc<AtomicU64>,
}

impl MemoryRecordStore {
    /// Create a new empty memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds `records`
    ///
    /// Numbering continues after the highest `mem-N` id among them.
    pub fn with_records(records: Vec<CustomerRecord>) -> Self {
        let next_id = records
            .iter()
            .filter_map(|record| record.id.as_str().strip_prefix("mem-"))
            .filter_map(|n| n.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        Self {
            records: Arc::new(RwLock::new(records)),
            next_id: Arc::new(AtomicU64::new(next_id)),
        }
    }

    /// Get the number of records in the store
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Check if the store is empty
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn create_record(&self, draft: &CustomerDraft) -> Result<CustomerRecord, Error> {
        let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let record = CustomerRecord::new(RecordId::new(format!("mem-{}", n)), draft.clone());
        self.records.write().await.push(record.clone());
        Ok(record)
    }

    async fn list_records(&self) -> Result<Vec<CustomerRecord>, Error> {
        Ok(self.records.read().await.clone())
    }

    fn store_name(&self) -> &'static str {
        "memory"
    }
}

/// Factory for creating memory stores
pub struct MemoryStoreFactory;

impl RecordStoreFactory for MemoryStoreFactory {
    fn create(&self, config: &StoreConfig) -> Result<Box<dyn RecordStore>, Error> {
        match config {
            StoreConfig::Memory => Ok(Box::new(MemoryRecordStore::new())),
            _ => Err(Error::config("Invalid config for memory record store")),
        }
    }
}
