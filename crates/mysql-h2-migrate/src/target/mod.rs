//! Migration targets.
//!
//! A [`MigrationTarget`] is where resolved scripts end up, together with the
//! history of what has already been applied.
//!
//! - [`DirectoryTarget`]: writes scripts into a directory and keeps the
//!   history as a JSON file next to them

mod directory;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::resolver::{MigrationVersion, ResolvedMigration};

pub use directory::DirectoryTarget;

/// History entry for an applied migration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedMigration {
    /// Applied version.
    pub version: MigrationVersion,

    /// Description at the time it was applied.
    pub description: String,

    /// Script file name.
    pub script: String,

    /// Checksum of the script source when applied.
    pub checksum: String,

    /// When it was applied.
    pub applied_at: DateTime<Utc>,
}

impl AppliedMigration {
    /// History entry for `migration`, applied now.
    pub fn from_resolved(migration: &ResolvedMigration) -> Self {
        Self {
            version: migration.version.clone(),
            description: migration.description.clone(),
            script: migration.script.clone(),
            checksum: migration.checksum.clone(),
            applied_at: Utc::now(),
        }
    }
}

/// Destination for migration scripts.
pub trait MigrationTarget {
    /// Short description for logs.
    fn describe(&self) -> String;

    /// Migrations already applied, in application order.
    fn applied(&self) -> Result<Vec<AppliedMigration>>;

    /// Apply one migration and record it in the history.
    fn apply(&mut self, migration: &ResolvedMigration) -> Result<AppliedMigration>;

    /// Remove everything applied so far, including the history.
    ///
    /// Returns the number of migrations removed.
    fn clean(&mut self) -> Result<usize>;
}
