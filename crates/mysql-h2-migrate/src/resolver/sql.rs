//! Leaf resolver reading versioned SQL files from one directory.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, warn, Span};

use crate::error::{MigrateError, Result};
use crate::placeholder::PlaceholderReplacer;

use super::{MigrationResolver, MigrationVersion, ReplacerSlot, ResolvedMigration, ResolverNode};

/// File naming convention: `<prefix><version><separator><description><suffix>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptNaming {
    /// Leading marker, default `V`.
    pub prefix: String,
    /// Version/description separator, default `__`.
    pub separator: String,
    /// File extension, default `.sql`.
    pub suffix: String,
}

impl Default for ScriptNaming {
    fn default() -> Self {
        Self {
            prefix: "V".to_string(),
            separator: "__".to_string(),
            suffix: ".sql".to_string(),
        }
    }
}

impl ScriptNaming {
    /// Split a file name into version and description.
    ///
    /// Returns `None` for files that are not migration scripts at all.
    pub fn parse(&self, file_name: &str) -> Option<Result<(MigrationVersion, String)>> {
        let stem = file_name
            .strip_prefix(&self.prefix)?
            .strip_suffix(&self.suffix)?;

        let parsed = match stem.split_once(&self.separator) {
            Some((version, description)) => MigrationVersion::parse(version)
                .map(|version| (version, description.replace('_', " ")))
                .map_err(|e| MigrateError::script(file_name, e)),
            None => Err(MigrateError::script(
                file_name,
                format!("missing '{}' between version and description", self.separator),
            )),
        };
        Some(parsed)
    }
}

/// Reads migration scripts from a single location.
pub struct SqlMigrationResolver {
    location: PathBuf,
    naming: ScriptNaming,
    replacer: ReplacerSlot,
    span: Span,
}

impl SqlMigrationResolver {
    /// Create a resolver for `location` using `replacer` for every script.
    pub fn new(
        location: impl Into<PathBuf>,
        naming: ScriptNaming,
        replacer: Arc<dyn PlaceholderReplacer>,
        span: Span,
    ) -> Self {
        Self {
            location: location.into(),
            naming,
            replacer: ReplacerSlot::new(replacer),
            span,
        }
    }

    /// Directory this resolver scans.
    pub fn location(&self) -> &Path {
        &self.location
    }

    /// The engine slot scripts pass through.
    pub fn replacer(&self) -> &ReplacerSlot {
        &self.replacer
    }
}

impl MigrationResolver for SqlMigrationResolver {
    fn describe(&self) -> String {
        format!("sql({})", self.location.display())
    }

    fn resolve(&self) -> Result<Vec<ResolvedMigration>> {
        if !self.location.is_dir() {
            warn!(
                parent: &self.span,
                "Skipping migration location {:?}: not a directory", self.location
            );
            return Ok(Vec::new());
        }

        let mut entries = fs::read_dir(&self.location)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<std::io::Result<Vec<_>>>()?;
        entries.sort();

        let replacer = self.replacer.get()?;
        let mut migrations = Vec::new();

        for path in entries {
            if !path.is_file() {
                continue;
            }
            let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let Some(parsed) = self.naming.parse(file_name) else {
                debug!(parent: &self.span, "Ignoring non-migration file {}", file_name);
                continue;
            };
            let (version, description) = parsed?;

            let raw = fs::read_to_string(&path)?;
            let raw = raw.strip_prefix('\u{feff}').unwrap_or(&raw);
            let checksum = format!("{:x}", Sha256::digest(raw.as_bytes()));
            let sql = replacer.substitute(raw);

            debug!(
                parent: &self.span,
                version = %version,
                script = file_name,
                engine = replacer.name(),
                "Resolved migration"
            );

            migrations.push(ResolvedMigration {
                version,
                description,
                script: file_name.to_string(),
                location: self.location.clone(),
                sql,
                checksum,
            });
        }

        Ok(migrations)
    }

    fn node(&self) -> ResolverNode<'_> {
        ResolverNode::Leaf(&self.replacer)
    }
}
