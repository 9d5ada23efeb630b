//! Configuration type definitions.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::dialect::Dialect;
use crate::resolver::ScriptNaming;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Migration behavior configuration.
    pub migration: MigrationConfig,

    /// Where applied scripts are written.
    pub target: TargetConfig,
}

/// Migration behavior configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationConfig {
    /// Run migrations at all (default: true).
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Directories containing versioned SQL scripts.
    pub locations: Vec<PathBuf>,

    /// Dialect translation applied to every script (default: none).
    #[serde(default)]
    pub dialect: Dialect,

    /// Clean the target before migrating (default: false).
    #[serde(default)]
    pub clean_before_migrate: bool,

    /// Refuse to clean the target (default: false).
    #[serde(default)]
    pub clean_disabled: bool,

    /// Values for `${key}` placeholders when no dialect is configured.
    #[serde(default)]
    pub placeholders: BTreeMap<String, String>,

    /// Placeholder prefix (default: "${").
    #[serde(default = "default_placeholder_prefix")]
    pub placeholder_prefix: String,

    /// Placeholder suffix (default: "}").
    #[serde(default = "default_placeholder_suffix")]
    pub placeholder_suffix: String,

    /// Script file prefix (default: "V").
    #[serde(default = "default_sql_migration_prefix")]
    pub sql_migration_prefix: String,

    /// Version/description separator (default: "__").
    #[serde(default = "default_sql_migration_separator")]
    pub sql_migration_separator: String,

    /// Script file suffix (default: ".sql").
    #[serde(default = "default_sql_migration_suffix")]
    pub sql_migration_suffix: String,
}

impl MigrationConfig {
    /// Configuration for `locations` with every other field defaulted.
    pub fn new<I, P>(locations: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            enabled: true,
            locations: locations.into_iter().map(Into::into).collect(),
            dialect: Dialect::default(),
            clean_before_migrate: false,
            clean_disabled: false,
            placeholders: BTreeMap::new(),
            placeholder_prefix: default_placeholder_prefix(),
            placeholder_suffix: default_placeholder_suffix(),
            sql_migration_prefix: default_sql_migration_prefix(),
            sql_migration_separator: default_sql_migration_separator(),
            sql_migration_suffix: default_sql_migration_suffix(),
        }
    }

    /// Script naming convention.
    pub fn naming(&self) -> ScriptNaming {
        ScriptNaming {
            prefix: self.sql_migration_prefix.clone(),
            separator: self.sql_migration_separator.clone(),
            suffix: self.sql_migration_suffix.clone(),
        }
    }
}

/// Migration target configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetConfig {
    /// Directory applied scripts are written to.
    pub output_dir: PathBuf,

    /// History file name inside `output_dir` (default: "schema_history.json").
    #[serde(default = "default_history_file")]
    pub history_file: String,
}

impl TargetConfig {
    /// Target writing to `output_dir` with the default history file.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            history_file: default_history_file(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_placeholder_prefix() -> String {
    "${".to_string()
}

fn default_placeholder_suffix() -> String {
    "}".to_string()
}

fn default_sql_migration_prefix() -> String {
    "V".to_string()
}

fn default_sql_migration_separator() -> String {
    "__".to_string()
}

fn default_sql_migration_suffix() -> String {
    ".sql".to_string()
}

fn default_history_file() -> String {
    "schema_history.json".to_string()
}
