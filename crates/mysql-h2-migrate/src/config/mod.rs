//! Configuration loading and validation.

mod types;
mod validation;

pub use types::*;

use crate::error::Result;
use std::path::Path;

impl Config {
    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        validation::validate(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::Dialect;
    use crate::error::MigrateError;
    use std::path::PathBuf;

    #[test]
    fn test_from_yaml_with_defaults() {
        let config = Config::from_yaml(
            "migration:\n  locations: [db/migration]\ntarget:\n  output_dir: build/h2\n",
        )
        .unwrap();

        assert!(config.migration.enabled);
        assert_eq!(config.migration.locations, vec![PathBuf::from("db/migration")]);
        assert_eq!(config.migration.dialect, Dialect::None);
        assert!(!config.migration.clean_before_migrate);
        assert_eq!(config.migration.placeholder_prefix, "${");
        assert_eq!(config.migration.placeholder_suffix, "}");
        assert_eq!(config.migration.naming().prefix, "V");
        assert_eq!(config.target.history_file, "schema_history.json");
    }

    #[test]
    fn test_from_yaml_full() {
        let yaml = r#"
migration:
  locations: [db/a, db/b]
  dialect: mysql_to_h2
  clean_before_migrate: true
  placeholders:
    schema: app
  sql_migration_separator: "--"
target:
  output_dir: out
  history_file: history.json
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.migration.dialect, Dialect::MysqlToH2);
        assert!(config.migration.clean_before_migrate);
        assert_eq!(config.migration.placeholders.get("schema").unwrap(), "app");
        assert_eq!(config.migration.naming().separator, "--");
        assert_eq!(config.target.history_file, "history.json");
    }

    #[test]
    fn test_unknown_dialect_is_yaml_error() {
        let err = Config::from_yaml(
            "migration:\n  locations: [db]\n  dialect: oracle\ntarget:\n  output_dir: out\n",
        )
        .unwrap_err();
        assert!(matches!(err, MigrateError::Yaml(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = Config::load("definitely/not/here.yaml").unwrap_err();
        assert!(matches!(err, MigrateError::Io(_)));
    }
}
