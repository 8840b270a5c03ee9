//! Property tests for the reconciliation engine
//!
//! Snapshots are generated with arbitrary blocker graphs, including cycles,
//! self-blocking and ids that point outside the snapshot.

use proptest::prelude::*;
use std::collections::HashMap;
use taskgate::domain::{
    effective_state, is_blocked, reconcile, reconcile_with, EffectiveState, ReconcilePolicy,
    Snapshot, StoredState, Task, TaskId,
};

fn state_strategy() -> impl Strategy<Value = StoredState> {
    prop_oneof![
        Just(StoredState::Backlog),
        Just(StoredState::Todo),
        Just(StoredState::InProgress),
        Just(StoredState::Done),
    ]
}

/// Up to 12 tasks; blocker ids range slightly past the last task so some dangle
fn snapshot_strategy() -> impl Strategy<Value = Snapshot> {
    (1usize..12).prop_flat_map(|n| {
        let max_id = n as u64 + 2;
        prop::collection::vec(
            (state_strategy(), prop::collection::vec(0..max_id, 0..4)),
            n,
        )
        .prop_map(|specs| {
            let tasks = specs.into_iter().enumerate().map(|(i, (state, blockers))| {
                Task::new(TaskId::new(i as u64), format!("Task {}", i))
                    .with_state(state)
                    .with_blockers(blockers.into_iter().map(TaskId::new))
            });
            Snapshot::from_tasks(tasks).unwrap()
        })
    })
}

fn states_by_id(snapshot: &Snapshot) -> HashMap<TaskId, StoredState> {
    snapshot.iter().map(|t| (t.id, t.state)).collect()
}

proptest! {
    #[test]
    fn reconcile_is_idempotent(snapshot in snapshot_strategy()) {
        let once = reconcile(&snapshot);
        let twice = reconcile_with(&once, &ReconcilePolicy::default());

        prop_assert!(!twice.is_changed());
        prop_assert_eq!(twice.snapshot, once);
    }

    #[test]
    fn reconcile_ignores_input_order(
        (snapshot, shuffled) in snapshot_strategy().prop_flat_map(|snapshot| {
            let tasks = snapshot.clone().into_tasks();
            (Just(snapshot), Just(tasks).prop_shuffle())
        })
    ) {
        let shuffled = Snapshot::from_tasks(shuffled).unwrap();

        prop_assert_eq!(
            states_by_id(&reconcile(&snapshot)),
            states_by_id(&reconcile(&shuffled))
        );
    }

    #[test]
    fn reconcile_only_changes_state(snapshot in snapshot_strategy()) {
        let result = reconcile(&snapshot);

        prop_assert_eq!(result.len(), snapshot.len());
        for (before, after) in snapshot.iter().zip(result.iter()) {
            prop_assert_eq!(before.id, after.id);
            prop_assert_eq!(&before.title, &after.title);
            prop_assert_eq!(&before.blockers, &after.blockers);
            prop_assert_eq!(&before.dependents, &after.dependents);
        }
    }

    #[test]
    fn reconciled_snapshot_is_consistent(snapshot in snapshot_strategy()) {
        let result = reconcile(&snapshot);

        for task in result.iter() {
            if is_blocked(task, &result) {
                prop_assert_eq!(task.state, StoredState::Backlog);
            } else if task.has_blockers() {
                prop_assert_ne!(task.state, StoredState::Backlog);
            }
        }
    }

    #[test]
    fn completed_tasks_kept_when_policy_says_so(snapshot in snapshot_strategy()) {
        let policy = ReconcilePolicy { demote_completed: false };
        let result = reconcile_with(&snapshot, &policy).snapshot;

        for (before, after) in snapshot.iter().zip(result.iter()) {
            if before.state == StoredState::Done {
                prop_assert_eq!(after.state, StoredState::Done);
            }
        }
    }

    #[test]
    fn visits_stay_linear(snapshot in snapshot_strategy()) {
        let outcome = reconcile_with(&snapshot, &ReconcilePolicy::default());
        let edges: usize = snapshot.iter().map(|t| t.blockers.len()).sum();

        // Each task is seeded once. A task changes state at most twice and
        // each change re-queues its direct dependents.
        prop_assert!(outcome.visits <= snapshot.len() + 2 * edges);
    }

    #[test]
    fn changes_report_net_differences(snapshot in snapshot_strategy()) {
        let outcome = reconcile_with(&snapshot, &ReconcilePolicy::default());

        let differing: Vec<TaskId> = snapshot
            .iter()
            .zip(outcome.snapshot.iter())
            .filter(|(before, after)| before.state != after.state)
            .map(|(before, _)| before.id)
            .collect();
        let reported: Vec<TaskId> = outcome.changes.iter().map(|c| c.id).collect();

        prop_assert_eq!(reported, differing);
    }

    #[test]
    fn effective_state_matches_blocking(snapshot in snapshot_strategy()) {
        for task in snapshot.iter() {
            let effective = effective_state(task, &snapshot);
            if is_blocked(task, &snapshot) {
                prop_assert_eq!(effective, EffectiveState::Blocked);
            } else {
                prop_assert_eq!(effective, EffectiveState::from(task.state));
            }
        }
    }

    #[test]
    fn unblocked_without_present_blockers(snapshot in snapshot_strategy()) {
        for task in snapshot.iter() {
            let any_present = task.blockers.iter().any(|b| snapshot.contains(b));
            if !any_present {
                prop_assert!(!is_blocked(task, &snapshot));
            }
        }
    }
}
