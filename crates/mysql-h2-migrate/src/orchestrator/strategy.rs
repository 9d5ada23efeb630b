//! Migration strategies.
//!
//! A strategy decides what a single `migrate` run does: whether the target is
//! cleaned first and which placeholder engine the resolver tree uses.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::config::MigrationConfig;
use crate::dialect::{Dialect, DialectTranslator};
use crate::error::Result;
use crate::placeholder::DialectPlaceholderReplacer;
use crate::target::MigrationTarget;

use super::{MigrationReport, Migrator};

/// Runs a migration with a [`Migrator`].
pub trait MigrationStrategy {
    /// Strategy name, recorded in the report.
    fn name(&self) -> &'static str;

    /// Run the migration.
    fn run(
        &self,
        migrator: &mut Migrator,
        target: &mut dyn MigrationTarget,
    ) -> Result<MigrationReport>;
}

/// Migrate with the engine the migrator was built with.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultMigrationStrategy {
    /// Clean the target first.
    pub clean: bool,
}

impl MigrationStrategy for DefaultMigrationStrategy {
    fn name(&self) -> &'static str {
        "default"
    }

    fn run(
        &self,
        migrator: &mut Migrator,
        target: &mut dyn MigrationTarget,
    ) -> Result<MigrationReport> {
        run_migration(self.name(), self.clean, migrator, target)
    }
}

/// Translate MySQL scripts to H2 while migrating.
#[derive(Debug, Clone, Copy, Default)]
pub struct MysqlH2MigrationStrategy {
    /// Clean the target first.
    pub clean: bool,
}

impl MigrationStrategy for MysqlH2MigrationStrategy {
    fn name(&self) -> &'static str {
        "mysql_h2"
    }

    fn run(
        &self,
        migrator: &mut Migrator,
        target: &mut dyn MigrationTarget,
    ) -> Result<MigrationReport> {
        let translator = DialectTranslator::mysql_to_h2()?;
        let engine = DialectPlaceholderReplacer::new(translator, migrator.span().clone());
        migrator.set_placeholder_replacer(Arc::new(engine));
        run_migration(self.name(), self.clean, migrator, target)
    }
}

/// Pick the strategy for `config`.
pub fn strategy_for(config: &MigrationConfig) -> Box<dyn MigrationStrategy> {
    let clean = config.clean_before_migrate;
    match config.dialect {
        Dialect::None => Box::new(DefaultMigrationStrategy { clean }),
        Dialect::MysqlToH2 => Box::new(MysqlH2MigrationStrategy { clean }),
    }
}

fn run_migration(
    strategy: &str,
    clean: bool,
    migrator: &Migrator,
    target: &mut dyn MigrationTarget,
) -> Result<MigrationReport> {
    let started_at = Utc::now();
    let run_id = uuid::Uuid::new_v4().to_string();

    info!(
        parent: migrator.span(),
        run_id = %run_id,
        strategy,
        "Starting migration of {}",
        target.describe()
    );

    let cleaned = if clean {
        Some(migrator.clean(target)?.output)
    } else {
        None
    };

    let migrated = migrator.migrate(target)?;

    let completed_at = Utc::now();
    let duration = (completed_at - started_at).num_milliseconds() as f64 / 1000.0;

    let report = MigrationReport {
        run_id,
        strategy: strategy.to_string(),
        dialect: migrator.config().dialect,
        started_at,
        completed_at,
        duration_seconds: duration,
        cleaned,
        scripts_resolved: migrated.output.resolved,
        scripts_applied: migrated.output.applied.len(),
        applied_versions: migrated
            .output
            .applied
            .iter()
            .map(|entry| entry.version.to_string())
            .collect(),
        rewired_resolvers: migrated.rewired,
    };

    info!(
        parent: migrator.span(),
        "Migration completed: {} of {} scripts applied in {:.1}s",
        report.scripts_applied,
        report.scripts_resolved,
        report.duration_seconds
    );

    Ok(report)
}
