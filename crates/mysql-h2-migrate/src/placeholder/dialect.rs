//! Whole-script dialect translation behind the placeholder interface.

use std::sync::Arc;

use tracing::{debug, Span};

use crate::dialect::DialectTranslator;

use super::PlaceholderReplacer;

/// Presents a [`DialectTranslator`] as a placeholder engine.
///
/// Configured placeholder values are deliberately not consulted: installing
/// this engine trades `${key}` substitution for dialect translation.
#[derive(Debug, Clone)]
pub struct DialectPlaceholderReplacer {
    translator: Arc<DialectTranslator>,
    span: Span,
}

impl DialectPlaceholderReplacer {
    /// Wrap a translator.
    pub fn new(translator: Arc<DialectTranslator>, span: Span) -> Self {
        Self { translator, span }
    }

    /// The wrapped translator.
    pub fn translator(&self) -> &Arc<DialectTranslator> {
        &self.translator
    }
}

impl PlaceholderReplacer for DialectPlaceholderReplacer {
    fn name(&self) -> &str {
        self.translator.name()
    }

    fn substitute(&self, text: &str) -> String {
        if text.trim().is_empty() {
            return text.to_string();
        }

        let translated = self.translator.translate(text);
        debug!(
            parent: &self.span,
            translator = self.translator.name(),
            input_bytes = text.len(),
            output_bytes = translated.len(),
            "Translated script"
        );
        translated
    }
}
