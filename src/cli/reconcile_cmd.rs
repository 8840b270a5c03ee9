//! Reconcile command

use anyhow::Result;

use super::app::{emit_snapshot, EmitFormat};
use super::output::Output;
use crate::domain::{reconcile_with, Reconciliation, Snapshot};
use crate::storage::Config;

/// Reconciles a snapshot and reports or emits the result
pub fn run(
    output: &Output,
    config: &Config,
    snapshot: &Snapshot,
    emit: Option<EmitFormat>,
    check: bool,
) -> Result<()> {
    let outcome = reconcile_with(snapshot, &config.policy());
    output.verbose_ctx(
        "reconcile",
        &format!(
            "{} tasks, {} visits, {} changed",
            snapshot.len(),
            outcome.visits,
            outcome.changes.len()
        ),
    );

    if check && outcome.is_changed() {
        if !output.is_json() {
            output.changes(snapshot, &outcome.changes);
        }
        anyhow::bail!(
            "Snapshot is not reconciled: {} task(s) would change",
            outcome.changes.len()
        );
    }

    match emit {
        Some(format) => emit_snapshot(&outcome.snapshot, format)?,
        None if output.is_json() => output.data(&report(&outcome)),
        None => {
            if outcome.is_changed() {
                println!(
                    "Reconciled {} task(s): {} changed",
                    snapshot.len(),
                    outcome.changes.len()
                );
                output.changes(snapshot, &outcome.changes);
            } else {
                println!("All {} task(s) consistent; nothing to change.", snapshot.len());
            }
        }
    }

    Ok(())
}

/// JSON shape shared by `reconcile` and the task commands
pub(super) fn report(outcome: &Reconciliation) -> serde_json::Value {
    serde_json::json!({
        "changed": outcome.is_changed(),
        "changes": outcome.changes,
        "visits": outcome.visits,
        "tasks": outcome.snapshot,
    })
}
