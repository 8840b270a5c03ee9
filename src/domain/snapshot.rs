//! Task snapshots
//!
//! A snapshot is the full task collection as seen by one engine call. It
//! keeps the caller's order and an id index; ids are unique.
//!
//! Snapshots are values: every operation that "changes" one returns a new
//! snapshot and leaves the original untouched.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::id::TaskId;
use super::task::{ParseStateError, StoredState, Task};

#[derive(Debug, Error, PartialEq)]
pub enum SnapshotError {
    #[error("Duplicate task ID in snapshot: {0}")]
    DuplicateId(TaskId),

    #[error("Task not found: {0}")]
    TaskNotFound(TaskId),

    #[error("Task title must not be empty")]
    EmptyTitle,
}

/// An id-addressable collection of tasks
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Task>", into = "Vec<Task>")]
pub struct Snapshot {
    tasks: Vec<Task>,
    index: HashMap<TaskId, usize>,
}

impl Snapshot {
    /// Creates an empty snapshot
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a snapshot, rejecting duplicate ids
    pub fn from_tasks(tasks: impl IntoIterator<Item = Task>) -> Result<Self, SnapshotError> {
        let tasks: Vec<Task> = tasks.into_iter().collect();
        let mut index = HashMap::with_capacity(tasks.len());

        for (position, task) in tasks.iter().enumerate() {
            if index.insert(task.id, position).is_some() {
                return Err(SnapshotError::DuplicateId(task.id));
            }
        }

        Ok(Self { tasks, index })
    }

    /// Returns the task with the given id
    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.index.get(&id).and_then(|&pos| self.tasks.get(pos))
    }

    /// Returns the position of a task in snapshot order
    pub fn position(&self, id: TaskId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    /// Returns true if the snapshot contains the task
    pub fn contains(&self, id: TaskId) -> bool {
        self.index.contains_key(&id)
    }

    /// Returns the number of tasks
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Returns true if the snapshot is empty
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Iterates over tasks in snapshot order
    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    /// Returns the tasks as a slice
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Consumes the snapshot, returning its tasks
    pub fn into_tasks(self) -> Vec<Task> {
        self.tasks
    }

    /// Returns a snapshot with a new backlog task appended
    ///
    /// The title is trimmed and must not be empty. Blockers may name tasks
    /// that are not in the snapshot.
    pub fn create(
        &self,
        id: TaskId,
        title: &str,
        blockers: impl IntoIterator<Item = TaskId>,
    ) -> Result<Self, SnapshotError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(SnapshotError::EmptyTitle);
        }
        if self.contains(id) {
            return Err(SnapshotError::DuplicateId(id));
        }

        let mut next = self.clone();
        next.index.insert(id, next.tasks.len());
        next.tasks.push(Task::new(id, title).with_blockers(blockers));
        Ok(next)
    }

    /// Returns a snapshot without the given task
    ///
    /// References to the removed id from other tasks' blockers are left in
    /// place; they are dangling and treated as non-blocking.
    pub fn without(&self, id: TaskId) -> Result<Self, SnapshotError> {
        if !self.contains(id) {
            return Err(SnapshotError::TaskNotFound(id));
        }

        let remaining = self.tasks.iter().filter(|t| t.id != id).cloned();
        Self::from_tasks(remaining)
    }

    /// Returns a snapshot with one task's stored state replaced
    pub fn with_state(&self, id: TaskId, state: StoredState) -> Result<Self, SnapshotError> {
        let pos = self.position(id).ok_or(SnapshotError::TaskNotFound(id))?;

        let mut next = self.clone();
        if let Some(task) = next.tasks.get_mut(pos) {
            task.state = state;
        }
        Ok(next)
    }

    /// Returns a copy with every task's state taken from `states`, by position
    pub(crate) fn with_states(&self, states: &[StoredState]) -> Self {
        let tasks = self
            .tasks
            .iter()
            .zip(states)
            .map(|(task, &state)| Task {
                state,
                ..task.clone()
            })
            .collect();

        Self {
            tasks,
            index: self.index.clone(),
        }
    }

    /// Returns the tasks whose stored state passes the filter
    pub fn filter(&self, filter: StateFilter) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(move |t| filter.matches(t.state))
    }
}

impl TryFrom<Vec<Task>> for Snapshot {
    type Error = SnapshotError;

    fn try_from(tasks: Vec<Task>) -> Result<Self, Self::Error> {
        Self::from_tasks(tasks)
    }
}

impl From<Snapshot> for Vec<Task> {
    fn from(snapshot: Snapshot) -> Self {
        snapshot.tasks
    }
}

impl<'a> IntoIterator for &'a Snapshot {
    type Item = &'a Task;
    type IntoIter = std::slice::Iter<'a, Task>;

    fn into_iter(self) -> Self::IntoIter {
        self.tasks.iter()
    }
}

/// Filter over stored states, as offered by task lists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StateFilter {
    #[default]
    All,
    Only(StoredState),
}

impl StateFilter {
    /// Returns true if a task in `state` passes the filter
    pub fn matches(&self, state: StoredState) -> bool {
        match self {
            StateFilter::All => true,
            StateFilter::Only(wanted) => *wanted == state,
        }
    }
}

impl fmt::Display for StateFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateFilter::All => f.write_str("ALL"),
            StateFilter::Only(state) => write!(f, "{}", state),
        }
    }
}

impl FromStr for StateFilter {
    type Err = ParseStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(StateFilter::All)
        } else {
            s.parse().map(StateFilter::Only)
        }
    }
}
