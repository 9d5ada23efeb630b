//! Migration runner - builds the resolver tree and executes commands.
//!
//! A [`Migrator`] builds its resolver tree once, at construction, with the
//! default template engine captured in every leaf. An override engine set
//! later with [`Migrator::set_placeholder_replacer`] is pushed into the tree
//! by [`RewiringCommand`] before each command runs.

mod command;
mod strategy;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info_span, Span};

use crate::config::MigrationConfig;
use crate::dialect::Dialect;
use crate::error::Result;
use crate::placeholder::{PlaceholderReplacer, TemplatePlaceholderReplacer};
use crate::resolver::{CompositeResolver, MigrationResolver, SqlMigrationResolver};
use crate::target::MigrationTarget;

pub use command::{
    CleanCommand, Command, CommandContext, InfoCommand, MigrateCommand, MigrateOutcome,
    MigrationInfo, MigrationStatus, Rewired, RewiringCommand,
};
pub use strategy::{
    strategy_for, DefaultMigrationStrategy, MigrationStrategy, MysqlH2MigrationStrategy,
};

/// Runs migration commands.
pub struct Migrator {
    config: MigrationConfig,
    resolver: Box<dyn MigrationResolver>,
    replacer: Option<Arc<dyn PlaceholderReplacer>>,
    span: Span,
}

/// Result of a migration run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationReport {
    /// Unique run identifier.
    pub run_id: String,

    /// Strategy that produced this run.
    pub strategy: String,

    /// Configured dialect.
    pub dialect: Dialect,

    /// When the run started.
    pub started_at: DateTime<Utc>,

    /// When the run completed.
    pub completed_at: DateTime<Utc>,

    /// Total duration in seconds.
    pub duration_seconds: f64,

    /// Migrations removed by a clean, when one ran.
    pub cleaned: Option<usize>,

    /// Scripts found across all locations.
    pub scripts_resolved: usize,

    /// Scripts applied by this run.
    pub scripts_applied: usize,

    /// Versions applied by this run, in order.
    pub applied_versions: Vec<String>,

    /// Resolvers whose placeholder engine was replaced.
    pub rewired_resolvers: usize,
}

impl MigrationReport {
    /// Convert the report to JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Migrator {
    /// Create a migrator for `config` under a `migrator` span.
    pub fn new(config: MigrationConfig) -> Self {
        Self::with_span(config, info_span!("migrator"))
    }

    /// Create a migrator that logs under `span`.
    ///
    /// Builds one [`SqlMigrationResolver`] per location, each with the
    /// configured `${key}` engine.
    pub fn with_span(config: MigrationConfig, span: Span) -> Self {
        let engine: Arc<dyn PlaceholderReplacer> = Arc::new(TemplatePlaceholderReplacer::new(
            config.placeholders.clone(),
            config.placeholder_prefix.clone(),
            config.placeholder_suffix.clone(),
            span.clone(),
        ));

        let naming = config.naming();
        let children: Vec<Box<dyn MigrationResolver>> = config
            .locations
            .iter()
            .map(|location| {
                Box::new(SqlMigrationResolver::new(
                    location.clone(),
                    naming.clone(),
                    Arc::clone(&engine),
                    span.clone(),
                )) as Box<dyn MigrationResolver>
            })
            .collect();

        debug!(parent: &span, locations = children.len(), "Built resolver tree");
        Self::with_resolver(config, Box::new(CompositeResolver::new(children)), span)
    }

    /// Create a migrator over an existing resolver tree.
    pub fn with_resolver(
        config: MigrationConfig,
        resolver: Box<dyn MigrationResolver>,
        span: Span,
    ) -> Self {
        Self {
            config,
            resolver,
            replacer: None,
            span,
        }
    }

    /// Migration settings.
    pub fn config(&self) -> &MigrationConfig {
        &self.config
    }

    /// Root of the resolver tree.
    pub fn resolver(&self) -> &dyn MigrationResolver {
        self.resolver.as_ref()
    }

    /// Span events are logged under.
    pub fn span(&self) -> &Span {
        &self.span
    }

    /// Engine installed into the tree before each command.
    pub fn set_placeholder_replacer(&mut self, engine: Arc<dyn PlaceholderReplacer>) {
        self.replacer = Some(engine);
    }

    /// The override engine, if any.
    pub fn placeholder_replacer(&self) -> Option<&Arc<dyn PlaceholderReplacer>> {
        self.replacer.as_ref()
    }

    /// Run `command` against `target`, rewiring the tree first.
    pub fn execute<C: Command>(
        &self,
        command: C,
        target: &mut dyn MigrationTarget,
    ) -> Result<Rewired<C::Output>> {
        let command = RewiringCommand::new(command, self.replacer.clone());
        let span = info_span!(parent: &self.span, "command", name = command.name());
        let mut ctx = CommandContext {
            resolver: self.resolver.as_ref(),
            target,
            config: &self.config,
            span: &span,
        };
        command.execute(&mut ctx)
    }

    /// Apply pending migrations.
    pub fn migrate(&self, target: &mut dyn MigrationTarget) -> Result<Rewired<MigrateOutcome>> {
        self.execute(MigrateCommand, target)
    }

    /// Remove everything applied to `target`.
    pub fn clean(&self, target: &mut dyn MigrationTarget) -> Result<Rewired<usize>> {
        self.execute(CleanCommand, target)
    }

    /// List migrations and their status.
    pub fn info(&self, target: &mut dyn MigrationTarget) -> Result<Rewired<Vec<MigrationInfo>>> {
        self.execute(InfoCommand, target)
    }
}
