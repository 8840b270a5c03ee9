//! User-driven task actions
//!
//! Which actions a task offers depends on its stored state and on whether
//! it is blocked. Applying an action returns a new snapshot; the caller
//! reconciles it afterwards and forwards the action to whatever backend
//! owns the tasks.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use super::blocking::is_blocked;
use super::id::TaskId;
use super::snapshot::{Snapshot, SnapshotError};
use super::task::{StoredState, Task};

#[derive(Debug, Error, PartialEq)]
pub enum ActionError {
    #[error("Task not found: {0}")]
    TaskNotFound(TaskId),

    #[error("Cannot {action} task {id}: {reason}")]
    NotAllowed {
        id: TaskId,
        action: TaskAction,
        reason: &'static str,
    },

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}

/// An action a user can take on a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskAction {
    /// Begin work (`IN_PROGRESS`)
    Start,
    /// Mark as finished (`DONE`)
    Complete,
    /// Remove the task
    Delete,
}

impl TaskAction {
    /// Returns a display label
    pub fn label(&self) -> &'static str {
        match self {
            TaskAction::Start => "start",
            TaskAction::Complete => "complete",
            TaskAction::Delete => "delete",
        }
    }

    /// Returns the stored state the action leads to, or None for `Delete`
    pub fn target_state(&self) -> Option<StoredState> {
        match self {
            TaskAction::Start => Some(StoredState::InProgress),
            TaskAction::Complete => Some(StoredState::Done),
            TaskAction::Delete => None,
        }
    }
}

impl fmt::Display for TaskAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Returns the actions currently offered for a task
///
/// - start: not blocked, and in `BACKLOG` or `TODO`
/// - complete: not blocked, and `IN_PROGRESS`
/// - delete: anything not `DONE`
///
/// Start is offered from `TODO` as well as `BACKLOG`. Boards that only
/// start backlog tasks would leave a released task with no way forward,
/// since release is exactly the move into `TODO`.
pub fn available_actions(task: &Task, snapshot: &Snapshot) -> Vec<TaskAction> {
    let mut actions = Vec::new();

    if check(task, snapshot, TaskAction::Start).is_ok() {
        actions.push(TaskAction::Start);
    }
    if check(task, snapshot, TaskAction::Complete).is_ok() {
        actions.push(TaskAction::Complete);
    }
    if check(task, snapshot, TaskAction::Delete).is_ok() {
        actions.push(TaskAction::Delete);
    }

    actions
}

/// Applies an action to a task, returning the new (unreconciled) snapshot
pub fn apply_action(
    snapshot: &Snapshot,
    id: TaskId,
    action: TaskAction,
) -> Result<Snapshot, ActionError> {
    let task = snapshot.get(id).ok_or(ActionError::TaskNotFound(id))?;

    check(task, snapshot, action).map_err(|reason| ActionError::NotAllowed {
        id,
        action,
        reason,
    })?;

    let next = match action.target_state() {
        Some(state) => snapshot.with_state(id, state)?,
        None => snapshot.without(id)?,
    };

    tracing::debug!(task = %id, action = action.label(), "action applied");
    Ok(next)
}

fn check(task: &Task, snapshot: &Snapshot, action: TaskAction) -> Result<(), &'static str> {
    match action {
        TaskAction::Start | TaskAction::Complete if is_blocked(task, snapshot) => {
            Err("blocked by unfinished dependencies")
        }
        TaskAction::Start => match task.state {
            StoredState::Backlog | StoredState::Todo => Ok(()),
            StoredState::InProgress => Err("already in progress"),
            StoredState::Done => Err("already done"),
        },
        TaskAction::Complete => match task.state {
            StoredState::InProgress => Ok(()),
            StoredState::Done => Err("already done"),
            StoredState::Backlog | StoredState::Todo => Err("not started"),
        },
        TaskAction::Delete if task.state.is_complete() => Err("completed tasks are kept"),
        TaskAction::Delete => Ok(()),
    }
}
