//! Placeholder substitution engines.
//!
//! Every SQL resolver passes script text through a [`PlaceholderReplacer`]
//! before handing it to the target. Two engines exist:
//!
//! - [`TemplatePlaceholderReplacer`]: the default `${key}` substitution
//! - [`DialectPlaceholderReplacer`]: ignores placeholders and instead runs a
//!   whole-script [`DialectTranslator`](crate::DialectTranslator)

mod dialect;
mod template;

pub use dialect::DialectPlaceholderReplacer;
pub use template::TemplatePlaceholderReplacer;

/// Anything that can rewrite script text before execution.
pub trait PlaceholderReplacer: Send + Sync + std::fmt::Debug {
    /// Engine name for logs and reports.
    fn name(&self) -> &str;

    /// Rewrite one script.
    fn substitute(&self, text: &str) -> String;
}
