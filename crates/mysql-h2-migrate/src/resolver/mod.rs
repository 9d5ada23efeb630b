//! Migration script resolvers.
//!
//! Resolvers discover migration scripts and pass their text through a
//! placeholder engine. They form a tree that is built once by the
//! [`Migrator`](crate::Migrator):
//!
//! - [`CompositeResolver`]: groups child resolvers
//! - [`SqlMigrationResolver`]: a leaf that reads `V<version>__<desc>.sql`
//!   files from one location and owns a swappable engine in a [`ReplacerSlot`]
//!
//! Resolvers expose their shape through [`MigrationResolver::node`] so that
//! [`rewire`] can swap every leaf's engine after the tree exists. Shapes it
//! does not recognise report [`ResolverNode::Unknown`] and are skipped.

mod composite;
mod rewire;
mod sql;
mod version;

use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use crate::error::{MigrateError, Result};
use crate::placeholder::PlaceholderReplacer;

pub use composite::CompositeResolver;
pub use rewire::{install_replacer, rewire};
pub use sql::{ScriptNaming, SqlMigrationResolver};
pub use version::MigrationVersion;

/// A migration script ready to apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMigration {
    /// Parsed version.
    pub version: MigrationVersion,
    /// Human-readable description from the file name.
    pub description: String,
    /// Script file name.
    pub script: String,
    /// Location the script was read from.
    pub location: PathBuf,
    /// Script text after placeholder substitution.
    pub sql: String,
    /// SHA-256 of the script as stored on disk (hex).
    pub checksum: String,
}

/// Structural view of a resolver, used by rewiring.
pub enum ResolverNode<'a> {
    /// Groups children in resolution order.
    Composite(&'a [Box<dyn MigrationResolver>]),
    /// Owns the engine used for its scripts.
    Leaf(&'a ReplacerSlot),
    /// Any other resolver; left untouched.
    Unknown,
}

/// Discovers migration scripts.
pub trait MigrationResolver: Send + Sync {
    /// Short description for logs and errors.
    fn describe(&self) -> String;

    /// Resolve all scripts this resolver is responsible for.
    fn resolve(&self) -> Result<Vec<ResolvedMigration>>;

    /// Expose this resolver's shape.
    fn node(&self) -> ResolverNode<'_> {
        ResolverNode::Unknown
    }
}

/// A leaf's swappable placeholder engine.
#[derive(Debug)]
pub struct ReplacerSlot {
    engine: RwLock<Arc<dyn PlaceholderReplacer>>,
}

impl ReplacerSlot {
    /// Create a slot holding `engine`.
    pub fn new(engine: Arc<dyn PlaceholderReplacer>) -> Self {
        Self {
            engine: RwLock::new(engine),
        }
    }

    /// The currently installed engine.
    pub fn get(&self) -> Result<Arc<dyn PlaceholderReplacer>> {
        self.engine
            .read()
            .map(|engine| Arc::clone(&engine))
            .map_err(|_| {
                MigrateError::UnsupportedResolver("placeholder engine slot is poisoned".into())
            })
    }

    /// Install a new engine.
    pub fn set(&self, engine: Arc<dyn PlaceholderReplacer>) -> Result<()> {
        let mut slot = self.engine.write().map_err(|_| {
            MigrateError::UnsupportedResolver("placeholder engine slot is poisoned".into())
        })?;
        *slot = engine;
        Ok(())
    }
}

#[cfg(test)]
impl ReplacerSlot {
    /// Panic while holding the write lock.
    pub(crate) fn poison_for_test(&self) {
        let _guard = self.engine.write().unwrap();
        panic!("poisoning placeholder engine slot");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placeholder::TemplatePlaceholderReplacer;

    #[test]
    fn test_slot_get_and_set() {
        let slot = ReplacerSlot::new(Arc::new(TemplatePlaceholderReplacer::empty()));
        assert_eq!(slot.get().unwrap().name(), "template");

        let translator = crate::DialectTranslator::mysql_to_h2().unwrap();
        let engine = crate::DialectPlaceholderReplacer::new(translator, tracing::Span::none());
        slot.set(Arc::new(engine)).unwrap();
        assert_eq!(slot.get().unwrap().name(), "mysql_to_h2");
    }

    #[test]
    fn test_poisoned_slot_is_unsupported_resolver() {
        let slot = Arc::new(ReplacerSlot::new(Arc::new(
            TemplatePlaceholderReplacer::empty(),
        )));
        let poisoner = Arc::clone(&slot);
        let _ = std::thread::spawn(move || poisoner.poison_for_test()).join();

        assert!(matches!(
            slot.get(),
            Err(MigrateError::UnsupportedResolver(_))
        ));
        assert!(matches!(
            slot.set(Arc::new(TemplatePlaceholderReplacer::empty())),
            Err(MigrateError::UnsupportedResolver(_))
        ));
    }
}
