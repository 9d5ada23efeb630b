//! Swapping placeholder engines inside an existing resolver tree.
//!
//! The tree is built before any override is known, and each leaf captured
//! its engine at construction. Rewiring walks the tree and overwrites every
//! leaf's [`ReplacerSlot`](super::ReplacerSlot) in place.
//!
//! Precondition: one rewiring, then one command execution, strictly
//! sequential, per tree instance.

use std::sync::Arc;

use tracing::{debug, info, trace, Span};

use crate::error::{MigrateError, Result};
use crate::placeholder::PlaceholderReplacer;

use super::{MigrationResolver, ResolverNode};

/// Install `engine` in every leaf reachable from `node`.
///
/// Returns the number of leaves rewired. Unknown nodes are skipped.
pub fn rewire(
    node: &dyn MigrationResolver,
    engine: &Arc<dyn PlaceholderReplacer>,
    span: &Span,
) -> Result<usize> {
    match node.node() {
        ResolverNode::Composite(children) => {
            let mut rewired = 0;
            for child in children {
                rewired += rewire(child.as_ref(), engine, span)?;
            }
            Ok(rewired)
        }
        ResolverNode::Leaf(slot) => {
            if let Err(e) = slot.set(Arc::clone(engine)) {
                let reason = match e {
                    MigrateError::UnsupportedResolver(reason) => reason,
                    other => other.to_string(),
                };
                return Err(MigrateError::UnsupportedResolver(format!(
                    "cannot replace placeholder engine of {}: {}",
                    node.describe(),
                    reason
                )));
            }
            debug!(
                parent: span,
                resolver = %node.describe(),
                engine = engine.name(),
                "Rewired resolver"
            );
            Ok(1)
        }
        ResolverNode::Unknown => {
            trace!(parent: span, resolver = %node.describe(), "Skipping unrecognised resolver");
            Ok(0)
        }
    }
}

/// Rewire `root` and require that at least one leaf was found.
///
/// Finding no leaf means the tree does not look the way rewiring expects;
/// running the command anyway would execute untranslated scripts.
pub fn install_replacer(
    root: &dyn MigrationResolver,
    engine: &Arc<dyn PlaceholderReplacer>,
    span: &Span,
) -> Result<usize> {
    let rewired = rewire(root, engine, span)?;
    if rewired == 0 {
        return Err(MigrateError::UnsupportedResolver(format!(
            "no SQL migration resolver found under {}",
            root.describe()
        )));
    }

    info!(
        parent: span,
        rewired,
        engine = engine.name(),
        "Installed placeholder engine"
    );
    Ok(rewired)
}
