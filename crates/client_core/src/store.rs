//! Single-writer store around a [`RecordWorkspace`].
//!
//! The workspace lives in one task. Commands are queued and applied one at a
//! time, so overlapping user actions are serialized instead of racing.

use shared::domain::EmployeeField;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::debug;

use crate::{
    error::{StoreClosed, WorkspaceError},
    workspace::{RecordWorkspace, WorkspaceState},
};

const COMMAND_QUEUE_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkspaceCommand {
    Load,
    Update,
    OpenDraft,
    UpdateDraftField {
        field: EmployeeField,
        value: String,
    },
    UpdateEditedField {
        row: usize,
        field: EmployeeField,
        value: String,
    },
    CommitDraft,
    CommitEdits,
}

impl WorkspaceCommand {
    pub fn name(&self) -> &'static str {
        match self {
            WorkspaceCommand::Load => "load",
            WorkspaceCommand::Update => "update",
            WorkspaceCommand::OpenDraft => "open_draft",
            WorkspaceCommand::UpdateDraftField { .. } => "update_draft_field",
            WorkspaceCommand::UpdateEditedField { .. } => "update_edited_field",
            WorkspaceCommand::CommitDraft => "commit_draft",
            WorkspaceCommand::CommitEdits => "commit_edits",
        }
    }

    fn reaches_backend(&self, workspace: &RecordWorkspace) -> bool {
        match self {
            WorkspaceCommand::Load
            | WorkspaceCommand::Update
            | WorkspaceCommand::CommitEdits => true,
            WorkspaceCommand::CommitDraft => workspace.validate_draft().is_valid(),
            WorkspaceCommand::OpenDraft
            | WorkspaceCommand::UpdateDraftField { .. }
            | WorkspaceCommand::UpdateEditedField { .. } => false,
        }
    }
}

/// State after a command ran, plus what the command reported.
#[derive(Debug)]
pub struct CommandOutcome {
    pub state: WorkspaceState,
    pub result: Result<(), WorkspaceError>,
}

struct QueuedCommand {
    command: WorkspaceCommand,
    reply: oneshot::Sender<CommandOutcome>,
}

#[derive(Clone)]
pub struct WorkspaceStore {
    commands: mpsc::Sender<QueuedCommand>,
    state: watch::Receiver<WorkspaceState>,
}

impl WorkspaceStore {
    /// Moves `workspace` into a background task. Must be called inside a
    /// tokio runtime.
    pub fn spawn(workspace: RecordWorkspace) -> Self {
        let (commands, command_rx) = mpsc::channel(COMMAND_QUEUE_CAPACITY);
        let (state_tx, state) = watch::channel(workspace.state().clone());
        tokio::spawn(run(workspace, command_rx, state_tx));
        Self { commands, state }
    }

    pub async fn dispatch(&self, command: WorkspaceCommand) -> Result<CommandOutcome, StoreClosed> {
        let name = command.name();
        let (reply, reply_rx) = oneshot::channel();
        self.commands
            .send(QueuedCommand { command, reply })
            .await
            .map_err(|_| StoreClosed)?;
        debug!(command = name, "queued workspace command");
        reply_rx.await.map_err(|_| StoreClosed)
    }

    pub fn snapshot(&self) -> WorkspaceState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<WorkspaceState> {
        self.state.clone()
    }
}

async fn run(
    mut workspace: RecordWorkspace,
    mut commands: mpsc::Receiver<QueuedCommand>,
    state_tx: watch::Sender<WorkspaceState>,
) {
    while let Some(QueuedCommand { command, reply }) = commands.recv().await {
        let name = command.name();

        if command.reaches_backend(&workspace) {
            let mut pending = workspace.state().clone();
            pending.loading = true;
            state_tx.send_replace(pending);
        }

        let result = apply(&mut workspace, command).await;
        let state = workspace.state().clone();
        state_tx.send_replace(state.clone());

        if reply.send(CommandOutcome { state, result }).is_err() {
            debug!(command = name, "caller dropped before workspace command finished");
        }
    }
    debug!("workspace store stopped");
}

async fn apply(
    workspace: &mut RecordWorkspace,
    command: WorkspaceCommand,
) -> Result<(), WorkspaceError> {
    match command {
        WorkspaceCommand::Load => workspace.load().await,
        WorkspaceCommand::Update => workspace.update().await,
        WorkspaceCommand::OpenDraft => {
            workspace.open_draft();
            Ok(())
        }
        WorkspaceCommand::UpdateDraftField { field, value } => {
            workspace.update_draft_field(field, &value);
            Ok(())
        }
        WorkspaceCommand::UpdateEditedField { row, field, value } => {
            if workspace.update_edited_field(row, field, &value).is_none() {
                debug!(row, %field, "edit ignored; no editable row at position");
            }
            Ok(())
        }
        WorkspaceCommand::CommitDraft => workspace.commit_draft().await,
        WorkspaceCommand::CommitEdits => workspace.commit_edits().await,
    }
}

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod tests;
