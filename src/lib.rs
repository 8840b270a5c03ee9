//! taskgate - dependency-aware task state reconciliation
//!
//! Tasks list the tasks blocking them. taskgate decides whether a task is
//! blocked, which state it should show, and corrects stored states across
//! the whole blocker graph: blocked tasks go back to the backlog, released
//! tasks move to todo. All of it is pure computation over a [`Snapshot`].

pub mod domain;
pub mod storage;
pub mod cli;

pub use domain::{
    direct_dependents, effective_state, is_blocked, reconcile, EffectiveState, Snapshot,
    StoredState, Task, TaskId,
};
