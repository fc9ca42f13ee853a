//! Test doubles and common utilities for workflow contract tests
//!
//! The doubles count every call so tests can assert on what did, and did
//! not, reach the remote boundaries.

#![allow(dead_code)]

use intake_core::error::{Error, Result};
use intake_core::model::{CustomerDraft, CustomerRecord, FieldPath, RecordId};
use intake_core::traits::{CrmIntegration, PushReceipt, RecordStore};
use intake_core::validation::{DraftForm, RecordValidator};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::Notify;

/// A record store that counts calls and can be told to fail
pub struct MockRecordStore {
    create_call_count: Arc<AtomicUsize>,
    list_call_count: Arc<AtomicUsize>,
    fail_create: Arc<AtomicBool>,
    fail_list: Arc<AtomicBool>,
    /// Records returned by list_records()
    remote: Arc<Mutex<Vec<CustomerRecord>>>,
    /// When set, list_records() waits for a notification before answering
    list_gate: Option<Arc<Notify>>,
    /// create_record() for a draft with a gated first name waits for that
    /// gate before answering
    create_gates: Arc<Mutex<HashMap<String, Arc<Notify>>>>,
}

impl MockRecordStore {
    pub fn new() -> Self {
        Self {
            create_call_count: Arc::new(AtomicUsize::new(0)),
            list_call_count: Arc::new(AtomicUsize::new(0)),
            fail_create: Arc::new(AtomicBool::new(false)),
            fail_list: Arc::new(AtomicBool::new(false)),
            remote: Arc::new(Mutex::new(Vec::new())),
            list_gate: None,
            create_gates: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Store whose list already holds `records`
    pub fn with_remote(records: Vec<CustomerRecord>) -> Self {
        let store = Self::new();
        *store.remote.lock().unwrap() = records;
        store
    }

    /// Hold every list_records() call until `gate` is notified
    pub fn with_list_gate(mut self, gate: Arc<Notify>) -> Self {
        self.list_gate = Some(gate);
        self
    }

    /// Hold create_record() calls for drafts named `first_name` until
    /// `gate` is notified
    pub fn gate_create_for(&self, first_name: &str, gate: Arc<Notify>) {
        self.create_gates
            .lock()
            .unwrap()
            .insert(first_name.to_string(), gate);
    }

    pub fn set_fail_create(&self, fail: bool) {
        self.fail_create.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_list(&self, fail: bool) {
        self.fail_list.store(fail, Ordering::SeqCst);
    }

    /// Get the number of times create_record() was called
    pub fn create_call_count(&self) -> usize {
        self.create_call_count.load(Ordering::SeqCst)
    }

    /// Get the number of times list_records() was called
    pub fn list_call_count(&self) -> usize {
        self.list_call_count.load(Ordering::SeqCst)
    }

    /// Create a new MockRecordStore that shares counters and data with an existing one
    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            create_call_count: Arc::clone(&other.create_call_count),
            list_call_count: Arc::clone(&other.list_call_count),
            fail_create: Arc::clone(&other.fail_create),
            fail_list: Arc::clone(&other.fail_list),
            remote: Arc::clone(&other.remote),
            list_gate: other.list_gate.clone(),
            create_gates: Arc::clone(&other.create_gates),
        }
    }
}

#[async_trait::async_trait]
impl RecordStore for MockRecordStore {
    async fn create_record(&self, draft: &CustomerDraft) -> Result<CustomerRecord> {
        let n = self.create_call_count.fetch_add(1, Ordering::SeqCst) + 1;
        let gate = self.create_gates.lock().unwrap().get(&draft.first_name).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(Error::transport("create failed: 500 Internal Server Error"));
        }

        let record = CustomerRecord::new(RecordId::new(format!("srv-{}", n)), draft.clone());
        self.remote.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn list_records(&self) -> Result<Vec<CustomerRecord>> {
        self.list_call_count.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.list_gate {
            gate.notified().await;
        }
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(Error::transport("list failed: connection refused"));
        }
        Ok(self.remote.lock().unwrap().clone())
    }

    fn store_name(&self) -> &'static str {
        "mock"
    }
}

/// A CRM integration that counts calls and can be told to fail
pub struct MockIntegration {
    push_call_count: Arc<AtomicUsize>,
    fail: Arc<AtomicBool>,
    pushed: Arc<Mutex<Vec<RecordId>>>,
}

impl MockIntegration {
    pub fn new() -> Self {
        Self {
            push_call_count: Arc::new(AtomicUsize::new(0)),
            fail: Arc::new(AtomicBool::new(false)),
            pushed: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing() -> Self {
        let integration = Self::new();
        integration.fail.store(true, Ordering::SeqCst);
        integration
    }

    pub fn push_call_count(&self) -> usize {
        self.push_call_count.load(Ordering::SeqCst)
    }

    /// Ids of records that were accepted
    pub fn pushed(&self) -> Vec<RecordId> {
        self.pushed.lock().unwrap().clone()
    }

    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            push_call_count: Arc::clone(&other.push_call_count),
            fail: Arc::clone(&other.fail),
            pushed: Arc::clone(&other.pushed),
        }
    }
}

#[async_trait::async_trait]
impl CrmIntegration for MockIntegration {
    async fn push_record(&self, record: &CustomerRecord) -> Result<PushReceipt> {
        self.push_call_count.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(Error::integration("CRM returned 502 Bad Gateway"));
        }
        self.pushed.lock().unwrap().push(record.id.clone());
        Ok(PushReceipt::new(
            record.id.clone(),
            serde_json::json!({ "status": "queued" }),
        ))
    }

    fn integration_name(&self) -> &'static str {
        "mock-crm"
    }
}

/// The reference draft: valid for India
pub fn scenario_draft() -> CustomerDraft {
    let mut draft = CustomerDraft::default();
    draft.set(FieldPath::PhoneNumber, "9999999999");
    draft.set(FieldPath::FirstName, "A");
    draft.set(FieldPath::LastName, "B");
    draft.set(FieldPath::Email, "a@b.com");
    draft.set(FieldPath::Street, "S");
    draft.set(FieldPath::City, "C");
    draft.set(FieldPath::State, "ST");
    draft.set(FieldPath::ZipCode, "560001");
    draft.set(FieldPath::Country, "IN");
    draft
}

/// A form already holding [`scenario_draft`]
pub fn filled_form() -> DraftForm {
    let mut form = DraftForm::new(RecordValidator::new());
    form.load(scenario_draft());
    form
}

/// A confirmed record with the scenario fields
pub fn confirmed(id: &str) -> CustomerRecord {
    CustomerRecord::new(RecordId::new(id), scenario_draft())
}
