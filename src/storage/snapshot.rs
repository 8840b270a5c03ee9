//! Snapshot files
//!
//! Snapshots are read from a JSON array, JSON Lines (one task per line) or
//! YAML, chosen by file extension. Unknown extensions are read as JSON.

use std::fs;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use anyhow::{Context, Result};

use crate::domain::{Snapshot, Task};

/// On-disk encoding of a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SnapshotFormat {
    /// A JSON array of tasks
    #[default]
    Json,
    /// One JSON task per line
    JsonLines,
    /// A YAML sequence of tasks
    Yaml,
}

impl SnapshotFormat {
    /// Picks a format from a file extension
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("jsonl") | Some("ndjson") => SnapshotFormat::JsonLines,
            Some("yaml") | Some("yml") => SnapshotFormat::Yaml,
            _ => SnapshotFormat::Json,
        }
    }
}

/// Loads a snapshot from a file
pub fn load(path: &Path) -> Result<Snapshot> {
    let file = fs::File::open(path)
        .with_context(|| format!("Failed to open snapshot: {}", path.display()))?;

    read(file, SnapshotFormat::from_path(path))
        .with_context(|| format!("Failed to load snapshot: {}", path.display()))
}

/// Reads a snapshot in the given format
pub fn read(reader: impl Read, format: SnapshotFormat) -> Result<Snapshot> {
    let tasks = match format {
        SnapshotFormat::Json => {
            serde_json::from_reader::<_, Vec<Task>>(reader).context("Failed to parse JSON tasks")?
        }
        SnapshotFormat::Yaml => {
            serde_yaml::from_reader::<_, Vec<Task>>(reader).context("Failed to parse YAML tasks")?
        }
        SnapshotFormat::JsonLines => read_lines(reader)?,
    };

    Ok(Snapshot::from_tasks(tasks)?)
}

fn read_lines(reader: impl Read) -> Result<Vec<Task>> {
    let reader = BufReader::new(reader);
    let mut tasks = Vec::new();

    for (line_num, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read line {}", line_num + 1))?;

        if line.trim().is_empty() {
            continue;
        }

        let task: Task = serde_json::from_str(&line)
            .with_context(|| format!("Failed to parse task at line {}", line_num + 1))?;
        tasks.push(task);
    }

    Ok(tasks)
}

/// Encodes a snapshot in the given format
pub fn to_string(snapshot: &Snapshot, format: SnapshotFormat) -> Result<String> {
    match format {
        SnapshotFormat::Json => {
            serde_json::to_string_pretty(snapshot).context("Failed to serialize snapshot")
        }
        SnapshotFormat::Yaml => {
            serde_yaml::to_string(snapshot).context("Failed to serialize snapshot")
        }
        SnapshotFormat::JsonLines => {
            let mut out = String::new();
            for task in snapshot {
                let line = serde_json::to_string(task).context("Failed to serialize task")?;
                out.push_str(&line);
                out.push('\n');
            }
            Ok(out)
        }
    }
}
