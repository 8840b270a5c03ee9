//! Query commands (list, blocked, dependents, show)
//!
//! Read-only views over a snapshot. Effective states are computed against
//! the snapshot as given unless `list --reconcile` is used.

use anyhow::Result;

use super::output::Output;
use crate::domain::{
    available_actions, direct_dependents, effective_state, is_blocked, reconcile_with,
    unfinished_blockers, DependencyGraph, Snapshot, StateFilter, Task, TaskId,
};
use crate::storage::Config;

/// List tasks with stored and effective state
pub fn list(
    output: &Output,
    config: &Config,
    snapshot: &Snapshot,
    filter: StateFilter,
    reconcile_first: bool,
) -> Result<()> {
    let reconciled;
    let snapshot = if reconcile_first {
        reconciled = reconcile_with(snapshot, &config.policy());
        output.verbose_ctx(
            "list",
            &format!("Reconciled: {} task(s) changed", reconciled.changes.len()),
        );
        &reconciled.snapshot
    } else {
        snapshot
    };

    if output.is_verbose() {
        report_cycles(output, snapshot);
    }

    let tasks: Vec<&Task> = snapshot.filter(filter).collect();
    output.verbose_ctx("list", &format!("{} task(s) match {}", tasks.len(), filter));

    if output.is_json() {
        let items: Vec<_> = tasks
            .iter()
            .map(|t| {
                serde_json::json!({
                    "id": t.id,
                    "title": t.title,
                    "state": t.state,
                    "effective_state": effective_state(t, snapshot),
                    "blockers": t.blockers,
                    "actions": available_actions(t, snapshot),
                })
            })
            .collect();
        output.data(&items);
    } else if tasks.is_empty() {
        match filter {
            StateFilter::All => println!("No tasks."),
            StateFilter::Only(state) => println!("No tasks in \"{}\" state.", state),
        }
    } else {
        output.header(&[("ID", 8), ("STATE", 12), ("EFFECTIVE", 12)], "TITLE");
        for task in tasks {
            println!(
                "{:<8} {:<12} {:<12} {}",
                task.id,
                task.state,
                effective_state(task, snapshot),
                task.title
            );
        }
    }

    Ok(())
}

/// Show blocked tasks
pub fn blocked(output: &Output, snapshot: &Snapshot) -> Result<()> {
    if output.is_verbose() {
        report_cycles(output, snapshot);
    }

    let blocked_tasks: Vec<(&Task, Vec<TaskId>)> = snapshot
        .iter()
        .filter(|t| is_blocked(t, snapshot))
        .map(|t| {
            let holding = unfinished_blockers(t, snapshot).iter().map(|b| b.id).collect();
            (t, holding)
        })
        .collect();

    output.verbose_ctx(
        "blocked",
        &format!("Found {} blocked tasks", blocked_tasks.len()),
    );

    if output.is_json() {
        let items: Vec<_> = blocked_tasks
            .iter()
            .map(|(task, blockers)| {
                serde_json::json!({
                    "id": task.id,
                    "title": task.title,
                    "state": task.state,
                    "blocked_by": blockers,
                })
            })
            .collect();
        output.data(&items);
    } else if blocked_tasks.is_empty() {
        println!("No blocked tasks.");
    } else {
        println!("Blocked tasks ({}):", blocked_tasks.len());
        output.header(&[("ID", 8), ("TITLE", 30)], "BLOCKED BY");
        for (task, blockers) in blocked_tasks {
            println!("{:<8} {:<30} {}", task.id, task.title, join_ids(&blockers));
        }
    }

    Ok(())
}

/// Show the direct dependents of a task
pub fn dependents(output: &Output, snapshot: &Snapshot, id: TaskId) -> Result<()> {
    if !snapshot.contains(id) {
        output.verbose_ctx("dependents", &format!("Task {} is not in the snapshot", id));
    }

    let dependents = direct_dependents(id, snapshot);

    if output.is_json() {
        let items: Vec<_> = dependents
            .iter()
            .map(|t| {
                serde_json::json!({
                    "id": t.id,
                    "title": t.title,
                    "state": t.state,
                    "effective_state": effective_state(t, snapshot),
                })
            })
            .collect();
        output.data(&items);
    } else if dependents.is_empty() {
        println!("No tasks depend on {}.", id);
    } else {
        println!("Tasks waiting on {} ({}):", id, dependents.len());
        output.header(&[("ID", 8), ("EFFECTIVE", 12)], "TITLE");
        for task in dependents {
            println!("{:<8} {:<12} {}", task.id, effective_state(task, snapshot), task.title);
        }
    }

    Ok(())
}

/// Show task details
pub fn show(output: &Output, snapshot: &Snapshot, id: TaskId) -> Result<()> {
    let task = snapshot
        .get(id)
        .ok_or_else(|| anyhow::anyhow!("Task not found: {}", id))?;

    let effective = effective_state(task, snapshot);
    let dependents: Vec<TaskId> = direct_dependents(id, snapshot).iter().map(|t| t.id).collect();
    let actions = available_actions(task, snapshot);

    if output.is_json() {
        let blockers: Vec<_> = task
            .blockers
            .iter()
            .map(|b| {
                serde_json::json!({
                    "id": b,
                    "state": snapshot.get(b).map(|t| t.state),
                })
            })
            .collect();

        output.data(&serde_json::json!({
            "id": task.id,
            "title": task.title,
            "description": task.description,
            "state": task.state,
            "effective_state": effective,
            "blockers": blockers,
            "dependents": dependents,
            "actions": actions,
        }));
    } else {
        println!("Task: {}", task.id);
        println!("Title: {}", task.title);
        println!("State: {}", task.state);
        println!("Effective: {}", effective);

        if let Some(desc) = &task.description {
            println!();
            println!("{}", desc);
        }

        if task.has_blockers() {
            println!();
            println!("Blockers:");
            for blocker in task.blockers.iter() {
                match snapshot.get(blocker) {
                    Some(b) => println!("  {} [{}] {}", b.id, b.state, b.title),
                    None => println!("  {} (missing, ignored)", blocker),
                }
            }
        }

        if !dependents.is_empty() {
            println!();
            println!("Dependents: {}", join_ids(&dependents));
        }

        if !actions.is_empty() {
            println!();
            let labels: Vec<_> = actions.iter().map(|a| a.label()).collect();
            println!("Actions: {}", labels.join(", "));
        }
    }

    Ok(())
}

fn report_cycles(output: &Output, snapshot: &Snapshot) {
    for cycle in DependencyGraph::from_snapshot(snapshot).cycles() {
        output.verbose_ctx("graph", &format!("Blocker cycle: {}", join_ids(&cycle)));
    }
}

fn join_ids(ids: &[TaskId]) -> String {
    ids.iter().map(|id| id.to_string()).collect::<Vec<_>>().join(", ")
}
