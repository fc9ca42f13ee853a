//! Minimal embedding example for intake-core
//!
//! This example drives the intake workflow from a custom application with
//! its own in-process collaborators and an extra postal-code rule.

use intake_core::model::{CustomerDraft, CustomerRecord, FieldPath, RecordId};
use intake_core::traits::{CrmIntegration, PushReceipt, RecordStore};
use intake_core::{IntakeConfig, IntakeSession, PostalCodeRules, Result, SubmitOutcome};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Custom record store keeping everything in a vector
struct EmbeddedStore {
    records: Mutex<Vec<CustomerRecord>>,
    next_id: AtomicUsize,
}

impl EmbeddedStore {
    fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            next_id: AtomicUsize::new(1),
        }
    }
}

#[async_trait::async_trait]
impl RecordStore for EmbeddedStore {
    async fn create_record(&self, draft: &CustomerDraft) -> Result<CustomerRecord> {
        let id = format!("emb-{:04}", self.next_id.fetch_add(1, Ordering::SeqCst));
        let record = CustomerRecord::new(RecordId::new(id), draft.clone());
        println!("[Embedded] Stored {}", record.display_name());
        self.records
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(record.clone());
        Ok(record)
    }

    async fn list_records(&self) -> Result<Vec<CustomerRecord>> {
        Ok(self
            .records
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone())
    }

    fn store_name(&self) -> &'static str {
        "embedded"
    }
}

/// Custom CRM integration that only prints what it would send
struct EmbeddedCrm;

#[async_trait::async_trait]
impl CrmIntegration for EmbeddedCrm {
    async fn push_record(&self, record: &CustomerRecord) -> Result<PushReceipt> {
        println!("[Embedded] CRM <- {}", serde_json::to_string(record)?);
        Ok(PushReceipt::new(
            record.id.clone(),
            serde_json::json!({ "accepted": true }),
        ))
    }

    fn integration_name(&self) -> &'static str {
        "embedded-crm"
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

    println!("=== Embedded intake-core Example ===\n");

    // Netherlands is not a built-in country; register it
    let rules = PostalCodeRules::standard().with_pattern("NL", r"^\d{4} ?[A-Z]{2}$")?;

    println!("1. Creating session...");
    let (session, mut events) = IntakeSession::new(
        Arc::new(EmbeddedStore::new()),
        Arc::new(EmbeddedCrm),
        &IntakeConfig::new(),
    )?;
    let mut session = session.with_postal_rules(rules);

    println!("2. Loading record list...");
    session.start().await?;

    println!("3. Filling the form field by field...");
    for (field, value) in [
        (FieldPath::PhoneNumber, "+31 20 123 4567"),
        (FieldPath::FirstName, "Anna"),
        (FieldPath::LastName, "de Vries"),
        (FieldPath::Email, "anna@example.nl"),
        (FieldPath::Street, "Damrak 1"),
        (FieldPath::City, "Amsterdam"),
        (FieldPath::State, "NH"),
        (FieldPath::ZipCode, "1012 LG"),
    ] {
        session.form_mut().set_field(field, value);
    }
    println!(
        "   zip with default country: {:?}",
        session.form().field(FieldPath::ZipCode).error
    );
    session.form_mut().set_field(FieldPath::Country, "NL");
    println!(
        "   zip after selecting NL:    {:?}",
        session.form().field(FieldPath::ZipCode).error
    );

    println!("4. Submitting...");
    let record = match session.submit().await? {
        SubmitOutcome::Submitted(record) => record,
        SubmitOutcome::Invalid(result) => {
            for (field, message) in result.errors() {
                println!("   {}: {}", field, message);
            }
            return Ok(());
        }
    };

    println!("5. Pushing {} to the CRM...", record.id);
    session.push(&record.id).await?;

    println!("\n6. Notifications:");
    while let Ok(event) = events.try_recv() {
        if let Some(notification) = event.notification() {
            println!("   {}", notification.message());
        }
    }

    println!("\n=== Embedding Successful ===");
    println!("Listed records: {}", session.records().await.len());

    Ok(())
}
