use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use shared::{domain::Employee, protocol::SaveAck};

use super::*;
use crate::{
    fake_service::{employee, FakeRecordService},
    RecordService, TransportError,
    workspace::{WorkspaceMode, DRAFT_SAVED, NO_EMPLOYEES_FOUND},
};

/// Backend whose fetch stays in flight long enough to observe the store.
struct SlowRecordService {
    delay: Duration,
}

#[async_trait]
impl RecordService for SlowRecordService {
    async fn fetch_employees(&self) -> Result<Vec<Employee>, TransportError> {
        tokio::time::sleep(self.delay).await;
        Ok(vec![employee("Ann")])
    }

    async fn save_employees(&self, _records: &[Employee]) -> Result<SaveAck, TransportError> {
        Ok(SaveAck::Null)
    }
}

fn spawn_store(service: &Arc<FakeRecordService>) -> WorkspaceStore {
    WorkspaceStore::spawn(RecordWorkspace::new(service.clone()))
}

fn draft_field(field: EmployeeField, value: &str) -> WorkspaceCommand {
    WorkspaceCommand::UpdateDraftField {
        field,
        value: value.to_string(),
    }
}

#[tokio::test]
async fn dispatch_returns_state_after_command() {
    let service = Arc::new(FakeRecordService::with_records(vec![employee("Ann")]));
    let store = spawn_store(&service);

    let outcome = store.dispatch(WorkspaceCommand::Update).await.expect("store");

    assert!(outcome.result.is_ok());
    assert_eq!(outcome.state.mode, WorkspaceMode::Editing);
    assert_eq!(store.snapshot(), outcome.state);
}

#[tokio::test]
async fn empty_load_outcome_carries_message() {
    let service = Arc::new(FakeRecordService::default());
    let store = spawn_store(&service);

    let outcome = store.dispatch(WorkspaceCommand::Load).await.expect("store");

    assert!(outcome.result.is_ok());
    assert_eq!(outcome.state.last_error.as_deref(), Some(NO_EMPLOYEES_FOUND));
}

#[tokio::test]
async fn concurrent_dispatches_are_applied_one_at_a_time() {
    let service = Arc::new(FakeRecordService::default());
    let store = spawn_store(&service);
    store
        .dispatch(WorkspaceCommand::OpenDraft)
        .await
        .expect("open");

    let mut handles = Vec::new();
    for name in ["Dee", "Cal", "Bea", "Abe"] {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            let commands = [
                draft_field(EmployeeField::Name, name),
                draft_field(EmployeeField::DateOfBirth, "1980-01-01"),
                draft_field(EmployeeField::Address, "Main St"),
            ];
            for command in commands {
                store.dispatch(command).await.expect("draft field");
            }
        }));
    }
    for handle in handles {
        handle.await.expect("join");
    }

    let outcome = store
        .dispatch(WorkspaceCommand::CommitDraft)
        .await
        .expect("store");
    assert!(outcome.result.is_ok());
    assert_eq!(outcome.state.employees.len(), 1);
    assert_eq!(outcome.state.last_message.as_deref(), Some(DRAFT_SAVED));
    assert_eq!(service.saved().len(), 1);
}

#[tokio::test]
async fn subscribers_are_notified_after_backend_commands() {
    let service = Arc::new(FakeRecordService::with_records(vec![employee("Ann")]));
    let store = spawn_store(&service);
    let mut states = store.subscribe();
    states.borrow_and_update();

    let outcome = store.dispatch(WorkspaceCommand::Load).await.expect("store");

    assert!(!outcome.state.loading);
    assert!(states.has_changed().expect("store alive"));
    assert!(!states.borrow_and_update().loading);
}

#[tokio::test]
async fn loading_snapshot_is_published_before_fetch_completes() {
    let store = WorkspaceStore::spawn(RecordWorkspace::new(Arc::new(SlowRecordService {
        delay: Duration::from_millis(200),
    })));
    let mut states = store.subscribe();
    states.borrow_and_update();

    let dispatcher = store.clone();
    let pending = tokio::spawn(async move { dispatcher.dispatch(WorkspaceCommand::Load).await });

    states.changed().await.expect("store alive");
    assert!(states.borrow_and_update().loading);
    assert!(!pending.is_finished());

    let outcome = pending.await.expect("join").expect("store");
    assert!(outcome.result.is_ok());
    assert!(!outcome.state.loading);
    assert_eq!(outcome.state.employees.len(), 1);
    assert!(!states.borrow_and_update().loading);
}

#[tokio::test]
async fn rejected_draft_does_not_publish_loading() {
    let service = Arc::new(FakeRecordService::default());
    let store = spawn_store(&service);

    let outcome = store
        .dispatch(WorkspaceCommand::CommitDraft)
        .await
        .expect("store");

    let errors = outcome
        .result
        .as_ref()
        .expect_err("invalid draft")
        .validation_errors()
        .expect("validation");
    assert_eq!(errors.len(), 3);
    assert!(!outcome.state.loading);
    assert!(service.saved().is_empty());
}

#[tokio::test]
async fn edited_field_command_targets_row_by_position() {
    let service = Arc::new(FakeRecordService::with_records(vec![
        employee("Ann"),
        employee("Ben"),
    ]));
    let store = spawn_store(&service);
    store.dispatch(WorkspaceCommand::Load).await.expect("load");

    let outcome = store
        .dispatch(WorkspaceCommand::UpdateEditedField {
            row: 0,
            field: EmployeeField::Name,
            value: "Anya".to_string(),
        })
        .await
        .expect("edit");
    assert_eq!(outcome.state.edited_employees[0].name, "Anya");
    assert_eq!(outcome.state.employees[0].name, "Ann");

    let outcome = store
        .dispatch(WorkspaceCommand::CommitEdits)
        .await
        .expect("commit");
    assert_eq!(outcome.state.employees[0].name, "Anya");
    assert_eq!(outcome.state.mode, WorkspaceMode::Browsing);
}

#[test]
fn command_names_are_stable() {
    assert_eq!(WorkspaceCommand::Update.name(), "update");
    assert_eq!(
        draft_field(EmployeeField::Name, "x").name(),
        "update_draft_field"
    );
}
