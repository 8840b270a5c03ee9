//! Configuration handling for taskgate
//!
//! Configuration is read from `.taskgate.toml` (project, found by walking
//! up from the working directory) and `~/.config/taskgate/config.toml`
//! (global). An explicit `--config` path replaces the project lookup.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::ReconcilePolicy;

/// File name of the project configuration
pub const PROJECT_CONFIG_FILE: &str = ".taskgate.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Default output format
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Project-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct ProjectConfig {
    /// Reconciliation policy
    pub reconcile: ReconcilePolicy,
}

/// Global user configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct GlobalConfig {
    /// Default output format (text or json)
    pub default_format: OutputFormat,
}

/// Configuration in effect for one invocation
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub project: ProjectConfig,
    pub global: GlobalConfig,
    /// Where the project configuration came from, if anywhere
    pub project_path: Option<PathBuf>,
}

impl Config {
    /// Reads the global config and the nearest `.taskgate.toml` above the
    /// working directory
    pub fn load() -> Result<Self> {
        let project_path = std::env::current_dir()
            .ok()
            .and_then(|cwd| Self::find_project_config(&cwd));

        Self::assemble(project_path)
    }

    /// Like [`Config::load`], with an explicit project config file
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(ConfigError::Invalid(format!(
                "config file not found: {}",
                path.display()
            )))
            .context("Failed to load config");
        }

        Self::assemble(Some(path.to_path_buf()))
    }

    fn assemble(project_path: Option<PathBuf>) -> Result<Self> {
        let global = match Self::global_config_dir().map(|dir| dir.join("config.toml")) {
            Some(path) if path.is_file() => read_toml(&path, "global")?,
            _ => GlobalConfig::default(),
        };

        let project = match &project_path {
            Some(path) => read_toml(path, "project")?,
            None => ProjectConfig::default(),
        };

        Ok(Self {
            project,
            global,
            project_path,
        })
    }

    /// `~/.config/taskgate` on Linux, the platform equivalent elsewhere
    pub fn global_config_dir() -> Option<PathBuf> {
        ProjectDirs::from("dev", "taskgate", "taskgate").map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Finds `.taskgate.toml` in `start` or its nearest ancestor
    pub fn find_project_config(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join(PROJECT_CONFIG_FILE))
            .find(|candidate| candidate.is_file())
    }

    /// Returns the reconciliation policy in effect
    pub fn policy(&self) -> ReconcilePolicy {
        self.project.reconcile
    }
}

fn read_toml<T: DeserializeOwned>(path: &Path, scope: &str) -> Result<T> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {} config: {}", scope, path.display()))?;

    toml::from_str(&content)
        .map_err(|e| ConfigError::Parse(e.to_string()))
        .with_context(|| format!("Failed to parse {} config: {}", scope, path.display()))
}
