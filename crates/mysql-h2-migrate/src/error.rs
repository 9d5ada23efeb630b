//! Error types for the migration library.

use thiserror::Error;

/// Exit code for configuration errors.
pub const EXIT_CONFIG_ERROR: u8 = 1;
/// Exit code for an unrecognised resolver tree.
pub const EXIT_RESOLVER_ERROR: u8 = 2;
/// Exit code for checksum/history validation failures.
pub const EXIT_VALIDATION_ERROR: u8 = 3;
/// Exit code for script or target failures.
pub const EXIT_TARGET_ERROR: u8 = 4;
/// Exit code for IO errors.
pub const EXIT_IO_ERROR: u8 = 7;

/// Main error type for migration operations.
#[derive(Error, Debug)]
pub enum MigrateError {
    /// Configuration error (invalid YAML, missing fields, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// A rewrite rule pattern failed to compile
    #[error("Invalid rewrite rule pattern {pattern:?}: {source}")]
    InvalidRule {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// The resolver tree does not have the shape rewiring expects
    #[error("Unsupported resolver structure: {0}")]
    UnsupportedResolver(String),

    /// A migration script could not be read or named
    #[error("Script {script}: {message}")]
    Script { script: String, message: String },

    /// Applied history does not match the scripts on disk
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The migration target rejected a script
    #[error("Target error: {0}")]
    Target(String),

    /// Clean was requested while disabled in the configuration
    #[error("Clean is disabled by configuration (migration.clean_disabled)")]
    CleanDisabled,

    /// IO error (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MigrateError {
    /// Create a Script error
    pub fn script(script: impl Into<String>, message: impl Into<String>) -> Self {
        MigrateError::Script {
            script: script.into(),
            message: message.into(),
        }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            MigrateError::Config(_)
            | MigrateError::InvalidRule { .. }
            | MigrateError::CleanDisabled
            | MigrateError::Yaml(_) => EXIT_CONFIG_ERROR,
            MigrateError::UnsupportedResolver(_) => EXIT_RESOLVER_ERROR,
            MigrateError::Validation(_) => EXIT_VALIDATION_ERROR,
            MigrateError::Script { .. } | MigrateError::Target(_) | MigrateError::Json(_) => {
                EXIT_TARGET_ERROR
            }
            MigrateError::Io(_) => EXIT_IO_ERROR,
        }
    }

    /// Format error with full details including error chain
    pub fn format_detailed(&self) -> String {
        let mut output = format!("Error: {}\n", self);

        let mut source = std::error::Error::source(self);
        let mut depth = 1;
        while let Some(err) = source {
            output.push_str(&format!("\nCaused by:\n  {}: {}", depth, err));
            source = err.source();
            depth += 1;
        }

        output
    }
}

/// Result type alias for migration operations.
pub type Result<T> = std::result::Result<T, MigrateError>;
