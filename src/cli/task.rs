//! Task CLI commands
//!
//! Each command applies one user action to the snapshot, reconciles the
//! result and prints it. The snapshot file itself is not modified; use
//! `--emit` and redirect to keep the result.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Subcommand;

use super::app::{emit_snapshot, load_snapshot, EmitFormat};
use super::output::Output;
use super::reconcile_cmd::report;
use crate::domain::{apply_action, reconcile_with, Snapshot, TaskAction, TaskId};
use crate::storage::Config;

#[derive(Subcommand)]
pub enum TaskCommands {
    /// Add a backlog task
    ///
    /// Examples:
    ///   taskgate task add tasks.json 7 "Write release notes"
    ///   taskgate task add tasks.json 8 "Publish" --blocker 7
    Add {
        /// Snapshot file (`-` for JSON on stdin)
        snapshot: PathBuf,

        /// ID for the new task
        id: TaskId,

        /// Task title
        title: String,

        /// Task that must be done first (repeatable)
        #[arg(long = "blocker", short = 'b')]
        blockers: Vec<TaskId>,

        /// Print the resulting snapshot in this encoding
        #[arg(long)]
        emit: Option<EmitFormat>,
    },

    /// Mark task as in progress
    Start {
        /// Snapshot file (`-` for JSON on stdin)
        snapshot: PathBuf,

        /// Task ID
        id: TaskId,

        /// Print the resulting snapshot in this encoding
        #[arg(long)]
        emit: Option<EmitFormat>,
    },

    /// Mark task as done
    Done {
        /// Snapshot file (`-` for JSON on stdin)
        snapshot: PathBuf,

        /// Task ID
        id: TaskId,

        /// Print the resulting snapshot in this encoding
        #[arg(long)]
        emit: Option<EmitFormat>,
    },

    /// Delete a task
    Delete {
        /// Snapshot file (`-` for JSON on stdin)
        snapshot: PathBuf,

        /// Task ID
        id: TaskId,

        /// Print the resulting snapshot in this encoding
        #[arg(long)]
        emit: Option<EmitFormat>,
    },
}

pub fn run(cmd: TaskCommands, output: &Output, config: &Config) -> Result<()> {
    match cmd {
        TaskCommands::Add {
            snapshot,
            id,
            title,
            blockers,
            emit,
        } => {
            let snap = load_snapshot(&snapshot, output)?;
            let next = snap.create(id, &title, blockers)?;
            let message = match next.get(id) {
                Some(task) => format!("Created task: {} - {}", task.id, task.title),
                None => format!("Created task: {}", id),
            };
            finish(output, config, &next, &message, emit)
        }
        TaskCommands::Start { snapshot, id, emit } => {
            act(output, config, &snapshot, id, TaskAction::Start, emit)
        }
        TaskCommands::Done { snapshot, id, emit } => {
            act(output, config, &snapshot, id, TaskAction::Complete, emit)
        }
        TaskCommands::Delete { snapshot, id, emit } => {
            act(output, config, &snapshot, id, TaskAction::Delete, emit)
        }
    }
}

fn act(
    output: &Output,
    config: &Config,
    path: &Path,
    id: TaskId,
    action: TaskAction,
    emit: Option<EmitFormat>,
) -> Result<()> {
    let snap = load_snapshot(path, output)?;
    let title = snap.get(id).map(|t| t.title.clone()).unwrap_or_default();

    output.verbose_ctx("task", &format!("Applying {} to {}", action, id));
    let next = apply_action(&snap, id, action)?;

    let verb = match action {
        TaskAction::Start => "Started",
        TaskAction::Complete => "Completed",
        TaskAction::Delete => "Deleted",
    };
    finish(output, config, &next, &format!("{} task: {} - {}", verb, id, title), emit)
}

/// Reconciles the post-action snapshot and prints it
fn finish(
    output: &Output,
    config: &Config,
    snapshot: &Snapshot,
    message: &str,
    emit: Option<EmitFormat>,
) -> Result<()> {
    let outcome = reconcile_with(snapshot, &config.policy());
    output.verbose_ctx(
        "task",
        &format!("Reconciled: {} task(s) changed", outcome.changes.len()),
    );

    match emit {
        Some(format) => emit_snapshot(&outcome.snapshot, format)?,
        None if output.is_json() => {
            let mut data = report(&outcome);
            data["message"] = serde_json::Value::String(message.to_string());
            output.data(&data);
        }
        None => {
            output.success(message);
            if outcome.is_changed() {
                println!("Dependent tasks updated:");
                output.changes(&outcome.snapshot, &outcome.changes);
            }
        }
    }

    Ok(())
}
