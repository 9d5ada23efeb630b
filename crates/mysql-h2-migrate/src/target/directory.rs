//! Directory-backed migration target.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info_span, Span};

use crate::config::TargetConfig;
use crate::error::{MigrateError, Result};
use crate::resolver::ResolvedMigration;

use super::{AppliedMigration, MigrationTarget};

/// Writes each applied script to `<output_dir>/<script>` and records the
/// history in `<output_dir>/<history_file>`.
#[derive(Debug, Clone)]
pub struct DirectoryTarget {
    output_dir: PathBuf,
    history_file: String,
    span: Span,
}

impl DirectoryTarget {
    /// Create a target from configuration under a `target` span.
    pub fn new(config: &TargetConfig) -> Self {
        Self::with_span(config, info_span!("target"))
    }

    /// Create a target that logs under `span`.
    pub fn with_span(config: &TargetConfig, span: Span) -> Self {
        Self {
            output_dir: config.output_dir.clone(),
            history_file: config.history_file.clone(),
            span,
        }
    }

    /// Span events are logged under.
    pub fn span(&self) -> &Span {
        &self.span
    }

    /// Output directory.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn history_path(&self) -> PathBuf {
        self.output_dir.join(&self.history_file)
    }

    fn ensure_dir(&self) -> Result<()> {
        if self.output_dir.exists() && !self.output_dir.is_dir() {
            return Err(MigrateError::Target(format!(
                "output path {:?} exists and is not a directory",
                self.output_dir
            )));
        }
        fs::create_dir_all(&self.output_dir)?;
        Ok(())
    }

    /// Write the history atomically via a temp file.
    fn save_history(&self, history: &[AppliedMigration]) -> Result<()> {
        let path = self.history_path();
        let temp_path = path.with_extension("tmp");
        let content = serde_json::to_string_pretty(history)?;
        fs::write(&temp_path, &content)?;
        fs::rename(&temp_path, &path)?;
        Ok(())
    }
}

impl MigrationTarget for DirectoryTarget {
    fn describe(&self) -> String {
        format!("directory({})", self.output_dir.display())
    }

    fn applied(&self) -> Result<Vec<AppliedMigration>> {
        let path = self.history_path();
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn apply(&mut self, migration: &ResolvedMigration) -> Result<AppliedMigration> {
        if migration.script == self.history_file {
            return Err(MigrateError::Target(format!(
                "script {} collides with the history file",
                migration.script
            )));
        }
        self.ensure_dir()?;

        fs::write(self.output_dir.join(&migration.script), &migration.sql)?;

        let entry = AppliedMigration::from_resolved(migration);
        let mut history = self.applied()?;
        history.push(entry.clone());
        self.save_history(&history)?;

        debug!(parent: &self.span, "Wrote {} to {:?}", migration.script, self.output_dir);
        Ok(entry)
    }

    fn clean(&mut self) -> Result<usize> {
        let history = self.applied()?;
        for entry in &history {
            let path = self.output_dir.join(&entry.script);
            if path.exists() {
                fs::remove_file(path)?;
            }
        }

        let history_path = self.history_path();
        if history_path.exists() {
            fs::remove_file(history_path)?;
        }
        debug!(parent: &self.span, removed = history.len(), "Cleaned {:?}", self.output_dir);
        Ok(history.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::MigrationVersion;

    fn migration(version: &str, sql: &str) -> ResolvedMigration {
        ResolvedMigration {
            version: MigrationVersion::parse(version).unwrap(),
            description: "test".to_string(),
            script: format!("V{}__test.sql", version),
            location: PathBuf::from("db"),
            sql: sql.to_string(),
            checksum: format!("sum-{}", version),
        }
    }

    fn target(dir: &Path) -> DirectoryTarget {
        DirectoryTarget::new(&TargetConfig::new(dir.join("out")))
    }

    #[test]
    fn test_apply_writes_script_and_history() {
        let dir = tempfile::tempdir().unwrap();
        let mut target = target(dir.path());
        assert!(target.applied().unwrap().is_empty());

        target.apply(&migration("1", "CREATE TABLE a (x INT);")).unwrap();
        target.apply(&migration("2", "CREATE TABLE b (x INT);")).unwrap();

        let written = fs::read_to_string(dir.path().join("out/V1__test.sql")).unwrap();
        assert_eq!(written, "CREATE TABLE a (x INT);");

        let history = target.applied().unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].version.to_string(), "2");
        assert_eq!(history[0].checksum, "sum-1");
        assert!(!dir.path().join("out/schema_history.tmp").exists());
    }

    #[test]
    fn test_clean_removes_scripts_and_history() {
        let dir = tempfile::tempdir().unwrap();
        let mut target = target(dir.path());
        target.apply(&migration("1", "SELECT 1;")).unwrap();
        fs::write(dir.path().join("out/keep.txt"), "unrelated").unwrap();

        assert_eq!(target.clean().unwrap(), 1);
        assert!(target.applied().unwrap().is_empty());
        assert!(!dir.path().join("out/V1__test.sql").exists());
        assert!(dir.path().join("out/keep.txt").exists());
    }

    #[test]
    fn test_clean_on_fresh_target() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(target(dir.path()).clean().unwrap(), 0);
    }

    #[test]
    fn test_output_path_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("out"), "not a dir").unwrap();
        let err = target(dir.path())
            .apply(&migration("1", "SELECT 1;"))
            .unwrap_err();
        assert!(matches!(err, MigrateError::Target(_)));
    }

    #[test]
    fn test_with_span_keeps_span() {
        let dir = tempfile::tempdir().unwrap();
        let config = TargetConfig::new(dir.path().join("out"));
        let mut target = DirectoryTarget::with_span(&config, Span::none());
        assert!(target.span().is_none());

        target.apply(&migration("1", "SELECT 1;")).unwrap();
        assert_eq!(target.clean().unwrap(), 1);
    }

    #[test]
    fn test_corrupt_history_is_json_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("out")).unwrap();
        fs::write(dir.path().join("out/schema_history.json"), "{not json").unwrap();
        let err = target(dir.path()).applied().unwrap_err();
        assert!(matches!(err, MigrateError::Json(_)));
    }
}
