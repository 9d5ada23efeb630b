//! Configuration validation.

use super::Config;
use crate::error::{MigrateError, Result};

/// Validate the configuration.
pub fn validate(config: &Config) -> Result<()> {
    let migration = &config.migration;

    // Migration validation
    if migration.locations.is_empty() {
        return Err(MigrateError::Config(
            "migration.locations must list at least one directory".into(),
        ));
    }
    if migration.locations.iter().any(|l| l.as_os_str().is_empty()) {
        return Err(MigrateError::Config(
            "migration.locations cannot contain an empty path".into(),
        ));
    }
    if migration.placeholder_prefix.is_empty() || migration.placeholder_suffix.is_empty() {
        return Err(MigrateError::Config(
            "migration.placeholder_prefix and placeholder_suffix are required".into(),
        ));
    }
    if migration.sql_migration_prefix.is_empty()
        || migration.sql_migration_separator.is_empty()
        || migration.sql_migration_suffix.is_empty()
    {
        return Err(MigrateError::Config(
            "migration.sql_migration_prefix, separator and suffix are required".into(),
        ));
    }

    // Target validation
    if config.target.output_dir.as_os_str().is_empty() {
        return Err(MigrateError::Config("target.output_dir is required".into()));
    }
    if config.target.history_file.is_empty() {
        return Err(MigrateError::Config("target.history_file is required".into()));
    }
    if config.target.history_file.ends_with(&migration.sql_migration_suffix) {
        return Err(MigrateError::Config(format!(
            "target.history_file cannot end with the script suffix '{}'",
            migration.sql_migration_suffix
        )));
    }

    // Cannot write translated scripts over their sources
    if migration
        .locations
        .iter()
        .any(|l| l == &config.target.output_dir)
    {
        return Err(MigrateError::Config(
            "target.output_dir cannot be one of migration.locations".into(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MigrationConfig, TargetConfig};

    fn valid_config() -> Config {
        Config {
            migration: MigrationConfig::new(["db/migration"]),
            target: TargetConfig::new("build/h2"),
        }
    }

    #[test]
    fn test_valid_config() {
        let config = valid_config();
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_missing_locations() {
        let mut config = valid_config();
        config.migration.locations.clear();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_empty_location() {
        let mut config = valid_config();
        config.migration.locations.push("".into());
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_missing_output_dir() {
        let mut config = valid_config();
        config.target.output_dir = "".into();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_output_dir_same_as_location() {
        let mut config = valid_config();
        config.target.output_dir = "db/migration".into();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_empty_placeholder_delimiters() {
        let mut config = valid_config();
        config.migration.placeholder_suffix.clear();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_empty_naming() {
        let mut config = valid_config();
        config.migration.sql_migration_separator.clear();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_history_file_looks_like_script() {
        let mut config = valid_config();
        config.target.history_file = "history.sql".into();
        assert!(validate(&config).is_err());
    }
}
