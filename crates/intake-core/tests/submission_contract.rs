// # Submission Contract Tests
//
// These tests pin down the isolation guarantees of the submit workflow:
// invalid drafts never reach the store, failures leave draft and list
// untouched, and a confirmed record lands exactly once at the end of the
// list.

mod common;

use common::{MockIntegration, MockRecordStore, confirmed, scenario_draft};
use intake_core::config::IntakeConfig;
use intake_core::error::Error;
use intake_core::events::{EventSink, IntakeEvent, SUBMIT_FAILURE, SUBMIT_SUCCESS};
use intake_core::model::FieldPath;
use intake_core::session::IntakeSession;
use intake_core::submission::{SubmissionCoordinator, SubmitOutcome};
use intake_core::sync::ListSynchronizer;
use intake_core::traits::RecordStore;
use intake_core::validation::{DraftForm, RecordValidator};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Notify, mpsc};

fn session_over(
    store: &MockRecordStore,
) -> (IntakeSession, mpsc::Receiver<IntakeEvent>) {
    IntakeSession::new(
        Arc::new(MockRecordStore::sharing_counters_with(store)),
        Arc::new(MockIntegration::new()),
        &IntakeConfig::new(),
    )
    .unwrap()
}

fn drain(rx: &mut mpsc::Receiver<IntakeEvent>) -> Vec<IntakeEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

#[tokio::test]
async fn test_invalid_draft_issues_no_create_call() {
    let store = MockRecordStore::new();
    let (mut session, mut rx) = session_over(&store);
    session.start().await.unwrap();

    let mut draft = scenario_draft();
    draft.set(FieldPath::Email, "broken");
    session.form_mut().load(draft.clone());

    let outcome = session.submit().await.unwrap();
    match outcome {
        SubmitOutcome::Invalid(result) => {
            assert_eq!(result.error_count(), 1);
            assert!(result.error(FieldPath::Email).is_some());
        }
        other => panic!("expected Invalid, got {:?}", other),
    }

    assert_eq!(store.create_call_count(), 0);
    assert_eq!(session.form().draft(), &draft);
    assert!(session.records().await.is_empty());

    let events = drain(&mut rx);
    assert!(events.contains(&IntakeEvent::SubmissionRejected { error_count: 1 }));
    assert!(events.iter().all(|event| event.notification().is_none()));
}

#[tokio::test]
async fn test_scenario_draft_is_confirmed_appended_and_cleared() {
    let store = MockRecordStore::with_remote(vec![confirmed("existing-1")]);
    let (mut session, mut rx) = session_over(&store);
    session.start().await.unwrap();

    session.form_mut().load(scenario_draft());
    assert!(session.form().is_valid());

    let outcome = session.submit().await.unwrap();
    let record = match outcome {
        SubmitOutcome::Submitted(record) => record,
        other => panic!("expected Submitted, got {:?}", other),
    };

    assert_eq!(store.create_call_count(), 1);
    assert_eq!(record.details, scenario_draft());

    let records = session.records().await;
    assert_eq!(records.len(), 2);
    assert_eq!(records.last(), Some(&record));
    assert_eq!(
        records.iter().filter(|r| r.id == record.id).count(),
        1,
        "confirmed record must be listed exactly once"
    );

    assert!(session.form().is_pristine());
    assert_eq!(session.form().field(FieldPath::FirstName).value, "");
    assert_eq!(session.form().field(FieldPath::Country).value, "IN");

    let notifications: Vec<_> = drain(&mut rx)
        .iter()
        .filter_map(IntakeEvent::notification)
        .collect();
    assert_eq!(notifications.len(), 1);
    assert!(notifications[0].is_success());
    assert_eq!(notifications[0].message(), SUBMIT_SUCCESS);
}

#[tokio::test]
async fn test_failed_create_leaves_list_and_draft_unchanged() {
    let store = MockRecordStore::with_remote(vec![confirmed("existing-1")]);
    store.set_fail_create(true);
    let (mut session, mut rx) = session_over(&store);
    session.start().await.unwrap();

    session.form_mut().load(scenario_draft());
    let before = session.records().await;

    let err = session.submit().await.unwrap_err();
    assert!(matches!(err, Error::Transport(_)));

    assert_eq!(store.create_call_count(), 1);
    assert_eq!(session.records().await, before);
    assert_eq!(session.form().draft(), &scenario_draft());

    let notifications: Vec<_> = drain(&mut rx)
        .iter()
        .filter_map(IntakeEvent::notification)
        .collect();
    assert_eq!(notifications.len(), 1);
    assert!(!notifications[0].is_success());
    assert_eq!(notifications[0].message(), SUBMIT_FAILURE);
}

#[tokio::test]
async fn test_resubmit_after_failure_is_explicit() {
    let store = MockRecordStore::new();
    store.set_fail_create(true);
    let (mut session, _rx) = session_over(&store);
    session.start().await.unwrap();
    session.form_mut().load(scenario_draft());

    assert!(session.submit().await.is_err());
    assert_eq!(store.create_call_count(), 1, "no hidden retry");

    store.set_fail_create(false);
    let outcome = session.submit().await.unwrap();
    assert!(outcome.is_submitted());
    assert_eq!(store.create_call_count(), 2);
    assert_eq!(session.records().await.len(), 1);
}

#[tokio::test]
async fn test_submissions_append_in_completion_order() {
    let store = MockRecordStore::new();
    let ann_gate = Arc::new(Notify::new());
    let bob_gate = Arc::new(Notify::new());
    store.gate_create_for("Ann", ann_gate.clone());
    store.gate_create_for("Bob", bob_gate.clone());

    let (events, _rx) = EventSink::channel(32);
    let shared: Arc<dyn RecordStore> = Arc::new(MockRecordStore::sharing_counters_with(&store));
    let list = Arc::new(ListSynchronizer::new(shared.clone(), events.clone()));
    let coordinator = Arc::new(SubmissionCoordinator::new(shared, list.clone(), events));
    list.initialize().await.unwrap();

    let submit_as = |first_name: &'static str| {
        let coordinator = coordinator.clone();
        tokio::spawn(async move {
            let mut draft = scenario_draft();
            draft.set(FieldPath::FirstName, first_name);
            let mut form = DraftForm::new(RecordValidator::new());
            form.load(draft);
            coordinator.submit(&mut form).await
        })
    };

    // Ann's create is issued first, Bob's second; Bob's resolves first
    let ann = submit_as("Ann");
    wait_until(|| store.create_call_count() == 1).await;
    let bob = submit_as("Bob");
    wait_until(|| store.create_call_count() == 2).await;

    bob_gate.notify_one();
    assert!(bob.await.unwrap().unwrap().is_submitted());
    assert_eq!(list.len().await, 1);

    ann_gate.notify_one();
    assert!(ann.await.unwrap().unwrap().is_submitted());

    let names: Vec<_> = list
        .records()
        .await
        .into_iter()
        .map(|record| record.details.first_name)
        .collect();
    assert_eq!(names, vec!["Bob", "Ann"]);
}

/// Yield until `condition` holds, failing after five seconds
async fn wait_until(condition: impl Fn() -> bool) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while !condition() {
            tokio::task::yield_now().await;
        }
    })
    .await
    .expect("condition never became true");
}
