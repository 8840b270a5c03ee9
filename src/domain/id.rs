//! Task identifiers
//!
//! Ids are plain integers assigned by whatever backend owns the tasks.
//! They are stable for a task's lifetime and unique within a snapshot.
//!
//! Textual form is the bare number (`42`); a leading `#` is accepted when
//! parsing so ids copied from a listing (`#42`) work too.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum IdError {
    #[error("Invalid task ID: expected a non-negative integer, got '{0}'")]
    InvalidTaskId(String),
}

/// Identifier of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(u64);

impl TaskId {
    /// Creates a task ID from its numeric value
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the numeric value
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for TaskId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<TaskId> for u64 {
    fn from(id: TaskId) -> Self {
        id.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for TaskId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);

        digits
            .parse::<u64>()
            .map(Self)
            .map_err(|_| IdError::InvalidTaskId(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_plain_number() {
        let id: TaskId = "42".parse().unwrap();
        assert_eq!(id, TaskId::new(42));
    }

    #[test]
    fn parse_accepts_hash_prefix_and_whitespace() {
        let id: TaskId = " #7 ".parse().unwrap();
        assert_eq!(id.get(), 7);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(matches!("t-123".parse::<TaskId>(), Err(IdError::InvalidTaskId(_))));
        assert!("-1".parse::<TaskId>().is_err());
        assert!("".parse::<TaskId>().is_err());
    }

    #[test]
    fn display_is_bare_number() {
        assert_eq!(TaskId::new(1001).to_string(), "1001");
    }

    #[test]
    fn serializes_as_plain_integer() {
        let json = serde_json::to_string(&TaskId::new(5)).unwrap();
        assert_eq!(json, "5");

        let parsed: TaskId = serde_json::from_str("12").unwrap();
        assert_eq!(parsed, TaskId::new(12));
    }
}
