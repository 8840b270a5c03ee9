//! Task domain model
//!
//! A task carries the state persisted by the backend plus the ids of the
//! tasks blocking it. The UI-facing state is derived separately (see
//! [`EffectiveState`]) and is never stored.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::id::TaskId;

#[derive(Debug, Error, PartialEq)]
#[error("Invalid task state '{0}': expected one of BACKLOG, TODO, IN_PROGRESS, DONE")]
pub struct ParseStateError(pub String);

/// Persisted state of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StoredState {
    #[default]
    Backlog,
    Todo,
    InProgress,
    Done,
}

impl StoredState {
    /// All stored states, in workflow order
    pub const ALL: [StoredState; 4] = [
        StoredState::Backlog,
        StoredState::Todo,
        StoredState::InProgress,
        StoredState::Done,
    ];

    /// Returns the wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            StoredState::Backlog => "BACKLOG",
            StoredState::Todo => "TODO",
            StoredState::InProgress => "IN_PROGRESS",
            StoredState::Done => "DONE",
        }
    }

    /// Returns true if this state represents completion
    pub fn is_complete(&self) -> bool {
        matches!(self, StoredState::Done)
    }

    /// Returns true if the task has not been released from the backlog
    pub fn is_backlog(&self) -> bool {
        matches!(self, StoredState::Backlog)
    }
}

impl fmt::Display for StoredState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for StoredState {
    type Err = ParseStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace('-', "_");
        match normalized.as_str() {
            "BACKLOG" => Ok(StoredState::Backlog),
            "TODO" | "TO_DO" => Ok(StoredState::Todo),
            "IN_PROGRESS" => Ok(StoredState::InProgress),
            "DONE" => Ok(StoredState::Done),
            _ => Err(ParseStateError(s.to_string())),
        }
    }
}

/// State shown to users and acted upon
///
/// Either the stored state or the derived `Blocked`. Only
/// [`effective_state`](super::effective_state) produces values of this
/// type from a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EffectiveState {
    Backlog,
    Todo,
    InProgress,
    Done,
    Blocked,
}

impl EffectiveState {
    /// Returns the wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            EffectiveState::Backlog => "BACKLOG",
            EffectiveState::Todo => "TODO",
            EffectiveState::InProgress => "IN_PROGRESS",
            EffectiveState::Done => "DONE",
            EffectiveState::Blocked => "BLOCKED",
        }
    }
}

impl From<StoredState> for EffectiveState {
    fn from(state: StoredState) -> Self {
        match state {
            StoredState::Backlog => EffectiveState::Backlog,
            StoredState::Todo => EffectiveState::Todo,
            StoredState::InProgress => EffectiveState::InProgress,
            StoredState::Done => EffectiveState::Done,
        }
    }
}

impl fmt::Display for EffectiveState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Ids of the tasks that must be done before a task is actionable
///
/// Insertion order is kept and duplicates are dropped, so a backend list
/// like `[3, 1, 3]` becomes `[3, 1]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<TaskId>", into = "Vec<TaskId>")]
pub struct Blockers(Vec<TaskId>);

impl Blockers {
    /// Creates an empty blocker set
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Adds a blocker, returning false if it was already present
    pub fn add(&mut self, id: TaskId) -> bool {
        if self.0.contains(&id) {
            false
        } else {
            self.0.push(id);
            true
        }
    }

    /// Returns true if `id` is one of the blockers
    pub fn contains(&self, id: TaskId) -> bool {
        self.0.contains(&id)
    }

    /// Returns true if empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of blockers
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates over blocker ids in insertion order
    pub fn iter(&self) -> impl Iterator<Item = TaskId> + '_ {
        self.0.iter().copied()
    }
}

impl From<Vec<TaskId>> for Blockers {
    fn from(ids: Vec<TaskId>) -> Self {
        ids.into_iter().collect()
    }
}

impl From<Blockers> for Vec<TaskId> {
    fn from(blockers: Blockers) -> Self {
        blockers.0
    }
}

impl FromIterator<TaskId> for Blockers {
    fn from_iter<I: IntoIterator<Item = TaskId>>(iter: I) -> Self {
        let mut blockers = Blockers::new();
        for id in iter {
            blockers.add(id);
        }
        blockers
    }
}

impl<'a> IntoIterator for &'a Blockers {
    type Item = &'a TaskId;
    type IntoIter = std::slice::Iter<'a, TaskId>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// A unit of work
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier, assigned by the backend
    pub id: TaskId,

    /// Human-readable title
    pub title: String,

    /// Optional description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Persisted state
    pub state: StoredState,

    /// Tasks that must be done first
    #[serde(default)]
    pub blockers: Blockers,

    /// Tasks listing this one as a blocker, as reported by the backend.
    /// May be stale; use [`direct_dependents`](super::direct_dependents).
    #[serde(default)]
    pub dependents: Vec<TaskId>,
}

impl Task {
    /// Creates a new task in the backlog with no blockers
    pub fn new(id: TaskId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            description: None,
            state: StoredState::Backlog,
            blockers: Blockers::new(),
            dependents: Vec::new(),
        }
    }

    /// Sets the stored state (builder form)
    pub fn with_state(mut self, state: StoredState) -> Self {
        self.state = state;
        self
    }

    /// Adds blockers (builder form)
    pub fn with_blockers(mut self, blockers: impl IntoIterator<Item = TaskId>) -> Self {
        for id in blockers {
            self.blockers.add(id);
        }
        self
    }

    /// Returns true if this task was ever gated on another task
    pub fn has_blockers(&self) -> bool {
        !self.blockers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: u64) -> TaskId {
        TaskId::new(n)
    }

    #[test]
    fn new_task_is_in_backlog() {
        let task = Task::new(id(1), "Write docs");
        assert_eq!(task.state, StoredState::Backlog);
        assert!(!task.has_blockers());
        assert!(task.dependents.is_empty());
    }

    #[test]
    fn blockers_are_deduplicated_in_order() {
        let blockers: Blockers = vec![id(3), id(1), id(3), id(2)].into();
        let ids: Vec<_> = blockers.iter().collect();
        assert_eq!(ids, vec![id(3), id(1), id(2)]);
    }

    #[test]
    fn stored_state_parsing() {
        assert_eq!("backlog".parse::<StoredState>().unwrap(), StoredState::Backlog);
        assert_eq!("in-progress".parse::<StoredState>().unwrap(), StoredState::InProgress);
        assert_eq!("IN_PROGRESS".parse::<StoredState>().unwrap(), StoredState::InProgress);
        assert_eq!(" Done ".parse::<StoredState>().unwrap(), StoredState::Done);
        assert!(matches!("blocked".parse::<StoredState>(), Err(ParseStateError(_))));
    }

    #[test]
    fn effective_state_mirrors_stored() {
        for state in StoredState::ALL {
            let effective = EffectiveState::from(state);
            assert_eq!(effective.as_str(), state.as_str());
        }
        assert_eq!(EffectiveState::Blocked.as_str(), "BLOCKED");
    }

    #[test]
    fn deserializes_backend_payload() {
        let json = r#"{
            "id": 4,
            "title": "Wire up API",
            "description": "REST endpoints",
            "state": "IN_PROGRESS",
            "blockers": [1, 2],
            "dependents": [7]
        }"#;

        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.id, id(4));
        assert_eq!(task.state, StoredState::InProgress);
        assert_eq!(task.blockers.len(), 2);
        assert_eq!(task.dependents, vec![id(7)]);
        assert_eq!(task.description.as_deref(), Some("REST endpoints"));
    }

    #[test]
    fn missing_blockers_default_to_empty() {
        let task: Task =
            serde_json::from_str(r#"{"id": 1, "title": "Solo", "state": "TODO"}"#).unwrap();
        assert!(task.blockers.is_empty());
    }

    #[test]
    fn serialization_uses_wire_names() {
        let task = Task::new(id(9), "Release")
            .with_state(StoredState::InProgress)
            .with_blockers([id(8)]);

        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(value["state"], "IN_PROGRESS");
        assert_eq!(value["blockers"], serde_json::json!([8]));
        assert_eq!(value["dependents"], serde_json::json!([]));
        assert!(value.get("description").is_none());
    }
}
