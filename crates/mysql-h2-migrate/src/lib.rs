//! # mysql-h2-migrate
//!
//! Run MySQL-flavoured migration scripts against H2.
//!
//! This library provides:
//!
//! - **Dialect translation** of MySQL scripts through an ordered list of
//!   case-insensitive rewrite rules
//! - **Placeholder engines** that scripts pass through as they are resolved,
//!   including one that performs the translation
//! - **Resolver rewiring** that swaps the engine inside an already-built
//!   resolver tree, failing loudly on shapes it does not recognise
//! - **Migration runs** against a directory target with a JSON history
//!
//! ## Example
//!
//! ```rust,no_run
//! use mysql_h2_migrate::{strategy_for, Config, DirectoryTarget, Migrator};
//!
//! fn main() -> mysql_h2_migrate::Result<()> {
//!     let config = Config::load("migrate.yaml")?;
//!     let mut migrator = Migrator::new(config.migration.clone());
//!     let mut target = DirectoryTarget::new(&config.target);
//!     let report = strategy_for(&config.migration).run(&mut migrator, &mut target)?;
//!     println!("Applied {} scripts", report.scripts_applied);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod dialect;
pub mod error;
pub mod orchestrator;
pub mod placeholder;
pub mod resolver;
pub mod rewrite;
pub mod target;

// Re-exports for convenient access
pub use config::{Config, MigrationConfig, TargetConfig};
pub use dialect::{Dialect, DialectTranslator};
pub use error::{MigrateError, Result};
pub use orchestrator::{
    strategy_for, DefaultMigrationStrategy, MigrationReport, MigrationStrategy, Migrator,
    MysqlH2MigrationStrategy,
};
pub use placeholder::{DialectPlaceholderReplacer, PlaceholderReplacer, TemplatePlaceholderReplacer};
pub use resolver::{install_replacer, rewire, MigrationResolver, ResolverNode};
pub use rewrite::{RewritePipeline, RewriteRule};
pub use target::{DirectoryTarget, MigrationTarget};
