//! Main CLI application structure

use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use super::output::{Output, OutputFormat};
use super::{query, reconcile_cmd, task};
use crate::domain::{Snapshot, StateFilter, TaskId};
use crate::storage::{self, Config, SnapshotFormat};

#[derive(Parser)]
#[command(name = "taskgate")]
#[command(author, version, about = "Dependency-aware task state reconciliation")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (defaults to the configured format)
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Project config file (defaults to the nearest .taskgate.toml)
    #[arg(long, global = true, env = "TASKGATE_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Correct task states against their blockers
    Reconcile {
        /// Snapshot file (`-` for JSON on stdin)
        snapshot: PathBuf,

        /// Print the corrected snapshot in this encoding instead of a summary
        #[arg(long)]
        emit: Option<EmitFormat>,

        /// Fail if any task would change
        #[arg(long)]
        check: bool,
    },

    /// List tasks with their effective states
    List {
        /// Snapshot file (`-` for JSON on stdin)
        snapshot: PathBuf,

        /// Only tasks in this stored state (ALL, BACKLOG, TODO, IN_PROGRESS, DONE)
        #[arg(long, short = 's', default_value = "ALL")]
        state: StateFilter,

        /// Reconcile before listing
        #[arg(long, short = 'r')]
        reconcile: bool,
    },

    /// Show blocked tasks and what blocks them
    Blocked {
        /// Snapshot file (`-` for JSON on stdin)
        snapshot: PathBuf,
    },

    /// Show the tasks directly waiting on a task
    Dependents {
        /// Snapshot file (`-` for JSON on stdin)
        snapshot: PathBuf,

        /// Task ID
        id: TaskId,
    },

    /// Show task details
    Show {
        /// Snapshot file (`-` for JSON on stdin)
        snapshot: PathBuf,

        /// Task ID
        id: TaskId,
    },

    /// Apply a task action and reconcile
    #[command(subcommand)]
    Task(task::TaskCommands),
}

/// Encoding for snapshots written to stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EmitFormat {
    Json,
    Jsonl,
    Yaml,
}

impl From<EmitFormat> for SnapshotFormat {
    fn from(format: EmitFormat) -> Self {
        match format {
            EmitFormat::Json => SnapshotFormat::Json,
            EmitFormat::Jsonl => SnapshotFormat::JsonLines,
            EmitFormat::Yaml => SnapshotFormat::Yaml,
        }
    }
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match &cli.config {
        Some(path) => Config::from_path(path)?,
        None => Config::load()?,
    };
    let format = cli
        .format
        .unwrap_or_else(|| config.global.default_format.into());
    let output = Output::new(format, cli.verbose);

    output.verbose_ctx("taskgate", "Starting");
    if let Some(path) = &config.project_path {
        output.verbose_ctx("config", &format!("Using project config: {}", path.display()));
    }
    output.verbose_ctx("config", &format!("Policy: {:?}", config.policy()));

    match cli.command {
        Commands::Reconcile { snapshot, emit, check } => {
            let snap = load_snapshot(&snapshot, &output)?;
            reconcile_cmd::run(&output, &config, &snap, emit, check)?
        }
        Commands::List { snapshot, state, reconcile } => {
            output.verbose_ctx("list", &format!("State filter: {}, reconcile: {}", state, reconcile));
            let snap = load_snapshot(&snapshot, &output)?;
            query::list(&output, &config, &snap, state, reconcile)?
        }
        Commands::Blocked { snapshot } => {
            let snap = load_snapshot(&snapshot, &output)?;
            query::blocked(&output, &snap)?
        }
        Commands::Dependents { snapshot, id } => {
            let snap = load_snapshot(&snapshot, &output)?;
            query::dependents(&output, &snap, id)?
        }
        Commands::Show { snapshot, id } => {
            let snap = load_snapshot(&snapshot, &output)?;
            query::show(&output, &snap, id)?
        }
        Commands::Task(cmd) => task::run(cmd, &output, &config)?,
    }

    output.verbose_ctx("taskgate", "Command completed successfully");
    Ok(())
}

/// Installs the tracing subscriber; `--verbose` turns on engine debug events
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("taskgate=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    // A subscriber may already be installed when embedded; keep it.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

/// Reads a snapshot from a path, or JSON from stdin for `-`
pub(super) fn load_snapshot(path: &Path, output: &Output) -> Result<Snapshot> {
    let snapshot = if path == Path::new("-") {
        output.verbose_ctx("snapshot", "Reading JSON snapshot from stdin");
        storage::snapshot::read(io::stdin().lock(), SnapshotFormat::Json)
            .context("Failed to load snapshot from stdin")?
    } else {
        output.verbose_ctx(
            "snapshot",
            &format!(
                "Reading {:?} snapshot from {}",
                SnapshotFormat::from_path(path),
                path.display()
            ),
        );
        storage::snapshot::load(path)?
    };

    output.verbose_ctx("snapshot", &format!("Loaded {} tasks", snapshot.len()));
    Ok(snapshot)
}

/// Writes a snapshot to stdout in the requested encoding
pub(super) fn emit_snapshot(snapshot: &Snapshot, format: EmitFormat) -> Result<()> {
    let encoded = storage::snapshot::to_string(snapshot, format.into())?;
    if encoded.ends_with('\n') {
        print!("{}", encoded);
    } else {
        println!("{}", encoded);
    }
    Ok(())
}
