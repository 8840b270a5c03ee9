//! Domain models for taskgate
//!
//! Contains the core business logic without any I/O concerns: the task
//! model, blocking evaluation, dependent lookup and the reconciliation
//! engine. Everything here is a pure function over a [`Snapshot`].

mod id;
mod task;
mod snapshot;
mod blocking;
mod graph;
mod reconcile;
mod action;

pub use id::{TaskId, IdError};
pub use task::{Blockers, EffectiveState, ParseStateError, StoredState, Task};
pub use snapshot::{Snapshot, SnapshotError, StateFilter};
pub use blocking::{effective_state, is_blocked, unfinished_blockers};
pub use graph::{direct_dependents, DependencyGraph};
pub use reconcile::{reconcile, reconcile_with, Reconciliation, ReconcilePolicy, Rule, StateChange};
pub use action::{apply_action, available_actions, ActionError, TaskAction};
