//! List synchronizer
//!
//! Owns the local, append-only view of confirmed records. The list has
//! exactly two mutation entry points:
//!
//! 1. [`ListSynchronizer::initialize`]: one fetch at startup that replaces
//!    the local list with the store's authoritative list
//! 2. [`ListSynchronizer::append`]: one server-confirmed record at a time
//!
//! ## Fetch / append ordering
//!
//! The list lock is held for the whole duration of the initial fetch, so
//! an append requested while the fetch is in flight lands *after* the
//! replacement instead of being overwritten by it. Records appended before
//! `initialize` was ever called survive the replacement unless the fetched
//! list already contains their id, and an append that queued behind the
//! fetch is dropped when the fetch already delivered its record. Appends
//! issued once the fetch has finished are never deduplicated.
//!
//! Appends are otherwise applied in completion order: two racing
//! submissions are listed in the order their create calls resolved.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use crate::error::Result;
use crate::events::{EventSink, IntakeEvent};
use crate::model::{CustomerRecord, RecordId};
use crate::traits::RecordStore;

/// Result of [`ListSynchronizer::initialize`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    /// The fetch succeeded; the list now holds `count` records
    Loaded { count: usize },
    /// A previous call already issued the fetch; nothing was requested
    AlreadyInitialized,
}

#[derive(Debug, Default)]
struct ListState {
    records: Vec<CustomerRecord>,
    /// Ids delivered by the initial fetch
    fetched: HashSet<RecordId>,
    initialized: bool,
}

/// Owner of the synchronized record list
pub struct ListSynchronizer {
    store: Arc<dyn RecordStore>,
    state: Mutex<ListState>,
    /// Set while `initialize` holds the lock across its fetch
    fetch_in_flight: AtomicBool,
    events: EventSink,
}

impl ListSynchronizer {
    pub fn new(store: Arc<dyn RecordStore>, events: EventSink) -> Self {
        Self {
            store,
            state: Mutex::new(ListState::default()),
            fetch_in_flight: AtomicBool::new(false),
            events,
        }
    }

    /// Fetch the authoritative list once and replace the local one
    ///
    /// Only the first completed call issues a request. A failed fetch is
    /// not retried: the list keeps whatever it held (empty at startup) and
    /// the error is returned after being logged and emitted.
    pub async fn initialize(&self) -> Result<InitOutcome> {
        let mut state = self.state.lock().await;
        if state.initialized {
            debug!("Record list already initialized, skipping fetch");
            return Ok(InitOutcome::AlreadyInitialized);
        }

        self.fetch_in_flight.store(true, Ordering::SeqCst);
        let fetched = self.store.list_records().await;
        state.initialized = true;
        self.fetch_in_flight.store(false, Ordering::SeqCst);

        match fetched {
            Ok(records) => {
                state.fetched = records.iter().map(|r| r.id.clone()).collect();
                let early = std::mem::replace(&mut state.records, records);
                for record in early {
                    if !state.records.iter().any(|r| r.id == record.id) {
                        state.records.push(record);
                    }
                }

                let count = state.records.len();
                info!("Loaded {} record(s) from {}", count, self.store.store_name());
                self.events.emit(IntakeEvent::ListLoaded { count });
                Ok(InitOutcome::Loaded { count })
            }
            Err(e) => {
                error!("Failed to fetch records from {}: {}", self.store.store_name(), e);
                self.events.emit(IntakeEvent::ListLoadFailed {
                    error: e.to_string(),
                });
                Err(e)
            }
        }
    }

    /// Add one confirmed record to the end of the list
    ///
    /// Never reorders. The only record ever skipped is one that waited for
    /// the in-flight initial fetch and was already listed by it.
    pub async fn append(&self, record: CustomerRecord) {
        // The lock is fair, so an append that queues after `initialize`
        // took it observes the flag.
        let queued_behind_fetch = self.fetch_in_flight.load(Ordering::SeqCst);
        let mut state = self.state.lock().await;
        if queued_behind_fetch && state.fetched.contains(&record.id) {
            debug!("Record {} already delivered by the initial fetch", record.id);
            return;
        }
        debug!("Appending record {} at position {}", record.id, state.records.len());
        state.records.push(record);
    }

    /// Snapshot of the list, in display order
    pub async fn records(&self) -> Vec<CustomerRecord> {
        self.state.lock().await.records.clone()
    }

    pub async fn get(&self, id: &RecordId) -> Option<CustomerRecord> {
        self.state
            .lock()
            .await
            .records
            .iter()
            .find(|record| &record.id == id)
            .cloned()
    }

    pub async fn len(&self) -> usize {
        self.state.lock().await.records.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.lock().await.records.is_empty()
    }

    /// Whether the initial fetch has completed (successfully or not)
    pub async fn is_initialized(&self) -> bool {
        self.state.lock().await.initialized
    }
}

impl std::fmt::Debug for ListSynchronizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListSynchronizer")
            .field("store", &self.store.store_name())
            .finish_non_exhaustive()
    }
}
