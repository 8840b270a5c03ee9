//! # Storage Layer
//!
//! File formats for snapshots and configuration. Nothing here writes task
//! data back; snapshots are read, reconciled in memory and printed.
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Snapshot | JSON array, JSONL or YAML | any path, `-` for stdin |
//! | Project config | TOML | `.taskgate.toml` (nearest ancestor) |
//! | Global config | TOML | `~/.config/taskgate/config.toml` |

mod config;
pub mod snapshot;

pub use config::{Config, ConfigError, GlobalConfig, OutputFormat, ProjectConfig, PROJECT_CONFIG_FILE};
pub use snapshot::SnapshotFormat;
