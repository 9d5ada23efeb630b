//! Dialect translation.
//!
//! A [`DialectTranslator`] is a named [`RewritePipeline`]: it has no behaviour
//! of its own beyond running its ordered rules. New dialect pairs are new
//! rule lists, not new types.
//!
//! # Available Translators
//!
//! - [`DialectTranslator::mysql_to_h2`]: MySQL migration scripts → H2
//!
//! # Usage
//!
//! ```rust
//! use mysql_h2_migrate::DialectTranslator;
//!
//! let translator = DialectTranslator::mysql_to_h2()?;
//! assert_eq!(
//!     translator.translate("CREATE TABLE `foo` (a INT) COMMENT='demo';\n"),
//!     "CREATE TABLE \"foo\" (a INT);\n"
//! );
//! # Ok::<(), mysql_h2_migrate::MigrateError>(())
//! ```

mod mysql_h2;

use std::sync::Arc;

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::rewrite::RewritePipeline;

pub use mysql_h2::mysql_to_h2_pipeline;

/// Source/target dialect pair a migration run translates between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dialect {
    /// Scripts run as written.
    #[default]
    None,
    /// MySQL scripts rewritten for H2.
    MysqlToH2,
}

impl Dialect {
    /// The translator for this dialect pair, if any.
    pub fn translator(&self) -> Result<Option<Arc<DialectTranslator>>> {
        match self {
            Dialect::None => Ok(None),
            Dialect::MysqlToH2 => DialectTranslator::mysql_to_h2().map(Some),
        }
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dialect::None => write!(f, "none"),
            Dialect::MysqlToH2 => write!(f, "mysql_to_h2"),
        }
    }
}

/// A stateless, shareable script translator.
#[derive(Debug, Clone)]
pub struct DialectTranslator {
    name: String,
    pipeline: RewritePipeline,
}

impl DialectTranslator {
    /// Create a translator from a rule pipeline.
    pub fn new(name: impl Into<String>, pipeline: RewritePipeline) -> Self {
        Self {
            name: name.into(),
            pipeline,
        }
    }

    /// The shared MySQL → H2 translator.
    ///
    /// Rules are compiled on first use; later calls return the same instance.
    pub fn mysql_to_h2() -> Result<Arc<Self>> {
        static MYSQL_TO_H2: OnceCell<Arc<DialectTranslator>> = OnceCell::new();

        MYSQL_TO_H2
            .get_or_try_init(|| {
                mysql_to_h2_pipeline().map(|pipeline| Arc::new(Self::new("mysql_to_h2", pipeline)))
            })
            .cloned()
    }

    /// Translator name, e.g. `mysql_to_h2`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The underlying rule pipeline.
    pub fn pipeline(&self) -> &RewritePipeline {
        &self.pipeline
    }

    /// Translate one script.
    pub fn translate(&self, text: &str) -> String {
        self.pipeline.apply(text)
    }
}
