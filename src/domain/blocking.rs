//! Blocking evaluation and effective state resolution

use super::id::TaskId;
use super::snapshot::Snapshot;
use super::task::{EffectiveState, StoredState, Task};

/// Returns true if any blocker present in the snapshot is not done
///
/// A task without blockers is never blocked. Blocker ids missing from the
/// snapshot do not block. A task listing itself blocks on itself until it
/// is done.
pub fn is_blocked(task: &Task, snapshot: &Snapshot) -> bool {
    is_blocked_by(task, |id| snapshot.get(id).map(|t| t.state))
}

/// Returns `Blocked` for blocked tasks, the stored state otherwise
pub fn effective_state(task: &Task, snapshot: &Snapshot) -> EffectiveState {
    if is_blocked(task, snapshot) {
        EffectiveState::Blocked
    } else {
        task.state.into()
    }
}

/// Returns the blockers currently holding a task back, in blocker order
pub fn unfinished_blockers<'a>(task: &Task, snapshot: &'a Snapshot) -> Vec<&'a Task> {
    task.blockers
        .iter()
        .filter_map(|id| snapshot.get(id))
        .filter(|blocker| !blocker.state.is_complete())
        .collect()
}

/// Blocking check against an arbitrary state lookup
///
/// `state_of` returns None for ids that are not part of the snapshot.
pub(crate) fn is_blocked_by<F>(task: &Task, state_of: F) -> bool
where
    F: Fn(TaskId) -> Option<StoredState>,
{
    if task.blockers.is_empty() {
        return false;
    }

    task.blockers
        .iter()
        .any(|id| state_of(id).is_some_and(|state| !state.is_complete()))
}
