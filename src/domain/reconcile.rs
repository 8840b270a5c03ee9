//! Reconciliation engine
//!
//! Brings every task's stored state in line with its blockers:
//!
//! - **Demote**: a blocked task that is not in the backlog goes back to
//!   `BACKLOG`. This includes `IN_PROGRESS` and `DONE` tasks.
//! - **Release**: an unblocked `BACKLOG` task that has blockers moves to
//!   `TODO`. A backlog task that never had blockers stays put; moving it
//!   forward is a user decision.
//!
//! Corrections propagate through dependents. The engine works on a
//! worklist seeded with every task; when a task's state changes, its
//! direct dependents are queued again because their blocking status may
//! have changed with it. A task is never queued twice at once.
//!
//! `DONE` is only ever taken away, never granted, so a task that becomes
//! blocked stays blocked for the rest of the pass. Each task therefore
//! changes at most twice (release, then demote) and the pass terminates on
//! any graph, cycles included. The result is a fixpoint of both rules, so
//! reconciling it again changes nothing, and it does not depend on the
//! order of the input.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::{debug, trace};

use super::blocking::is_blocked_by;
use super::graph::DependencyGraph;
use super::id::TaskId;
use super::snapshot::Snapshot;
use super::task::StoredState;

/// Tunables for a reconciliation pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcilePolicy {
    /// Demote `DONE` tasks that are blocked (e.g. a blocker was added after
    /// completion). When false, completed tasks are left alone.
    pub demote_completed: bool,
}

impl Default for ReconcilePolicy {
    fn default() -> Self {
        Self {
            demote_completed: true,
        }
    }
}

/// The automatic transition that changed a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    /// Blocked task forced back to the backlog
    Demote,
    /// Previously gated backlog task released to todo
    Release,
}

impl Rule {
    /// Returns a display label
    pub fn label(&self) -> &'static str {
        match self {
            Rule::Demote => "demote",
            Rule::Release => "release",
        }
    }
}

/// Net state change of one task over a pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateChange {
    pub id: TaskId,
    pub from: StoredState,
    pub to: StoredState,
    /// Last rule applied to the task
    pub rule: Rule,
}

/// Outcome of a reconciliation pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    /// Corrected snapshot, in input order
    pub snapshot: Snapshot,

    /// Tasks whose stored state differs from the input, in input order
    pub changes: Vec<StateChange>,

    /// Number of task visits the pass needed
    pub visits: usize,
}

impl Reconciliation {
    /// Returns true if any task changed state
    ///
    /// Callers use this to skip re-rendering or re-persisting an unchanged
    /// snapshot, which would otherwise trigger another pass.
    pub fn is_changed(&self) -> bool {
        !self.changes.is_empty()
    }
}

/// Reconciles a snapshot with the default policy
pub fn reconcile(snapshot: &Snapshot) -> Snapshot {
    reconcile_with(snapshot, &ReconcilePolicy::default()).snapshot
}

/// Reconciles a snapshot, reporting what changed
pub fn reconcile_with(snapshot: &Snapshot, policy: &ReconcilePolicy) -> Reconciliation {
    let tasks = snapshot.tasks();
    let graph = DependencyGraph::from_snapshot(snapshot);

    let mut states: Vec<StoredState> = tasks.iter().map(|t| t.state).collect();
    let mut applied: Vec<Option<Rule>> = vec![None; tasks.len()];

    let mut queue: VecDeque<usize> = (0..tasks.len()).collect();
    let mut queued = vec![true; tasks.len()];
    let mut visits = 0;

    while let Some(pos) = queue.pop_front() {
        queued[pos] = false;
        visits += 1;

        let task = &tasks[pos];
        let blocked = is_blocked_by(task, |id| snapshot.position(id).map(|p| states[p]));
        let current = states[pos];

        let Some((next, rule)) = transition(current, blocked, task.has_blockers(), policy) else {
            trace!(task = %task.id, state = %current, blocked, "consistent");
            continue;
        };

        debug!(task = %task.id, from = %current, to = %next, rule = rule.label(), "state corrected");
        states[pos] = next;
        applied[pos] = Some(rule);

        for dependent in graph.dependents_at(pos) {
            if !queued[dependent] {
                queued[dependent] = true;
                queue.push_back(dependent);
            }
        }
    }

    let changes: Vec<StateChange> = tasks
        .iter()
        .zip(&states)
        .zip(&applied)
        .filter(|((task, state), _)| task.state != **state)
        .filter_map(|((task, state), rule)| {
            rule.map(|rule| StateChange {
                id: task.id,
                from: task.state,
                to: *state,
                rule,
            })
        })
        .collect();

    debug!(
        tasks = tasks.len(),
        edges = graph.edge_count(),
        visits,
        changed = changes.len(),
        "reconciliation finished"
    );

    Reconciliation {
        snapshot: snapshot.with_states(&states),
        changes,
        visits,
    }
}

/// Applies the demote/release rules to one task
fn transition(
    state: StoredState,
    blocked: bool,
    gated: bool,
    policy: &ReconcilePolicy,
) -> Option<(StoredState, Rule)> {
    if blocked {
        let exempt = state.is_complete() && !policy.demote_completed;
        (!state.is_backlog() && !exempt).then_some((StoredState::Backlog, Rule::Demote))
    } else {
        (state.is_backlog() && gated).then_some((StoredState::Todo, Rule::Release))
    }
}
