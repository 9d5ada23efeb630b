//! Commands executed against a resolver tree and a target.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn, Span};

use crate::config::MigrationConfig;
use crate::error::{MigrateError, Result};
use crate::placeholder::PlaceholderReplacer;
use crate::resolver::{install_replacer, MigrationResolver, MigrationVersion};
use crate::target::{AppliedMigration, MigrationTarget};

/// Everything a command runs against.
pub struct CommandContext<'a> {
    /// Root of the resolver tree.
    pub resolver: &'a dyn MigrationResolver,
    /// Where scripts are applied.
    pub target: &'a mut dyn MigrationTarget,
    /// Migration settings.
    pub config: &'a MigrationConfig,
    /// Parent span for events.
    pub span: &'a Span,
}

/// A unit of work run by the [`Migrator`](super::Migrator).
pub trait Command {
    /// Result of a successful run.
    type Output;

    /// Command name for logs.
    fn name(&self) -> &'static str;

    /// Run the command.
    fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<Self::Output>;
}

/// Output of a command run through [`RewiringCommand`].
#[derive(Debug, Clone, PartialEq)]
pub struct Rewired<T> {
    /// Leaves whose engine was replaced before the command ran.
    pub rewired: usize,
    /// The wrapped command's output.
    pub output: T,
}

/// Installs an override engine in the resolver tree, then runs `inner`.
///
/// Without an override the tree is left as built and `inner` runs as is.
pub struct RewiringCommand<C> {
    inner: C,
    replacer: Option<Arc<dyn PlaceholderReplacer>>,
}

impl<C: Command> RewiringCommand<C> {
    /// Wrap `inner`.
    pub fn new(inner: C, replacer: Option<Arc<dyn PlaceholderReplacer>>) -> Self {
        Self { inner, replacer }
    }
}

impl<C: Command> Command for RewiringCommand<C> {
    type Output = Rewired<C::Output>;

    fn name(&self) -> &'static str {
        self.inner.name()
    }

    fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<Self::Output> {
        let rewired = match &self.replacer {
            Some(engine) => install_replacer(ctx.resolver, engine, ctx.span)?,
            None => 0,
        };
        let output = self.inner.execute(ctx)?;
        Ok(Rewired { rewired, output })
    }
}

/// Outcome of [`MigrateCommand`].
#[derive(Debug, Clone, Default)]
pub struct MigrateOutcome {
    /// Scripts found by the resolver tree.
    pub resolved: usize,
    /// Migrations applied by this run, in order.
    pub applied: Vec<AppliedMigration>,
}

/// Apply every pending migration.
#[derive(Debug, Clone, Copy, Default)]
pub struct MigrateCommand;

impl Command for MigrateCommand {
    type Output = MigrateOutcome;

    fn name(&self) -> &'static str {
        "migrate"
    }

    fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<Self::Output> {
        let resolved = ctx.resolver.resolve()?;
        let history = ctx.target.applied()?;
        let applied: BTreeMap<&MigrationVersion, &AppliedMigration> =
            history.iter().map(|entry| (&entry.version, entry)).collect();

        for migration in &resolved {
            if let Some(entry) = applied.get(&migration.version) {
                if entry.checksum != migration.checksum {
                    return Err(MigrateError::Validation(format!(
                        "Migration checksum mismatch for version {} ({}): applied {}, resolved {}",
                        migration.version, migration.script, entry.checksum, migration.checksum
                    )));
                }
            }
        }

        for entry in &history {
            if !resolved.iter().any(|m| m.version == entry.version) {
                warn!(
                    parent: ctx.span,
                    version = %entry.version,
                    script = %entry.script,
                    "Applied migration not found in any location"
                );
            }
        }

        let latest = applied.keys().next_back().copied().cloned();
        let pending: Vec<_> = resolved
            .iter()
            .filter(|m| !applied.contains_key(&m.version))
            .collect();

        if let Some(latest) = &latest {
            if let Some(late) = pending.iter().find(|m| &m.version < latest) {
                return Err(MigrateError::Validation(format!(
                    "Resolved migration {} ({}) is older than the latest applied version {}",
                    late.version, late.script, latest
                )));
            }
        }

        let mut outcome = MigrateOutcome {
            resolved: resolved.len(),
            applied: Vec::with_capacity(pending.len()),
        };

        for migration in pending {
            let entry = ctx.target.apply(migration)?;
            info!(
                parent: ctx.span,
                version = %entry.version,
                script = %entry.script,
                "Applied migration"
            );
            outcome.applied.push(entry);
        }

        if outcome.applied.is_empty() {
            info!(parent: ctx.span, "{} is up to date", ctx.target.describe());
        }
        Ok(outcome)
    }
}

/// Remove everything applied to the target.
#[derive(Debug, Clone, Copy, Default)]
pub struct CleanCommand;

impl Command for CleanCommand {
    type Output = usize;

    fn name(&self) -> &'static str {
        "clean"
    }

    fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<Self::Output> {
        if ctx.config.clean_disabled {
            return Err(MigrateError::CleanDisabled);
        }
        let removed = ctx.target.clean()?;
        info!(parent: ctx.span, removed, "Cleaned {}", ctx.target.describe());
        Ok(removed)
    }
}

/// State of a migration relative to the target history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MigrationStatus {
    /// Resolved and recorded in the history.
    Applied,
    /// Resolved, not applied yet.
    Pending,
    /// Recorded in the history, no longer resolved.
    Missing,
}

impl std::fmt::Display for MigrationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MigrationStatus::Applied => write!(f, "applied"),
            MigrationStatus::Pending => write!(f, "pending"),
            MigrationStatus::Missing => write!(f, "missing"),
        }
    }
}

/// One row of [`InfoCommand`] output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MigrationInfo {
    /// Migration version.
    pub version: MigrationVersion,

    /// Description from the script name, or from the history when missing.
    pub description: String,

    /// Script file name.
    pub script: String,

    /// Whether the migration is applied, pending or missing.
    pub status: MigrationStatus,

    /// When it was applied, if it was.
    pub applied_at: Option<DateTime<Utc>>,
}

/// List migrations with their status, in version order.
#[derive(Debug, Clone, Copy, Default)]
pub struct InfoCommand;

impl Command for InfoCommand {
    type Output = Vec<MigrationInfo>;

    fn name(&self) -> &'static str {
        "info"
    }

    fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<Self::Output> {
        let resolved = ctx.resolver.resolve()?;
        let history = ctx.target.applied()?;

        let mut rows: Vec<MigrationInfo> = resolved
            .iter()
            .map(|migration| {
                let entry = history.iter().find(|e| e.version == migration.version);
                MigrationInfo {
                    version: migration.version.clone(),
                    description: migration.description.clone(),
                    script: migration.script.clone(),
                    status: if entry.is_some() {
                        MigrationStatus::Applied
                    } else {
                        MigrationStatus::Pending
                    },
                    applied_at: entry.map(|e| e.applied_at),
                }
            })
            .collect();

        rows.extend(
            history
                .iter()
                .filter(|entry| !resolved.iter().any(|m| m.version == entry.version))
                .map(|entry| MigrationInfo {
                    version: entry.version.clone(),
                    description: entry.description.clone(),
                    script: entry.script.clone(),
                    status: MigrationStatus::Missing,
                    applied_at: Some(entry.applied_at),
                }),
        );
        rows.sort_by(|a, b| a.version.cmp(&b.version));
        Ok(rows)
    }
}
