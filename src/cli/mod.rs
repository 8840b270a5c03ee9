//! # Command-Line Interface
//!
//! User-facing CLI commands and output formatting.
//!
//! ## Commands
//!
//! | Command | Purpose |
//! |---------|---------|
//! | `reconcile` | Correct stored states against blockers |
//! | `list` | Tasks with stored and effective state |
//! | `blocked` | Blocked tasks and what holds them |
//! | `dependents` | Tasks directly waiting on a task |
//! | `show` | One task in detail |
//! | `task add/start/done/delete` | Apply an action, then reconcile |
//!
//! Every command reads a snapshot file (JSON, JSONL or YAML by extension,
//! `-` for JSON on stdin) and writes to stdout only.
//!
//! ## Output Formats
//!
//! All commands support `--format` flag:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! ## Verbose Mode
//!
//! Use `--verbose` (or `-v`) for debug output, including engine events:
//! ```bash
//! taskgate --verbose reconcile tasks.json
//! ```
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod output;
mod query;
mod reconcile_cmd;
mod task;

pub use app::{run, Cli, Commands, EmitFormat};
pub use task::TaskCommands;
pub use output::{Output, OutputFormat};
