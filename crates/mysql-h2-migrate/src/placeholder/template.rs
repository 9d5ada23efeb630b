//! Default `${key}` substitution.

use std::collections::BTreeMap;

use tracing::{warn, Span};

use super::PlaceholderReplacer;

/// Replaces `<prefix>key<suffix>` tokens with configured values.
///
/// Unknown keys are left in place and logged.
#[derive(Debug)]
pub struct TemplatePlaceholderReplacer {
    placeholders: BTreeMap<String, String>,
    prefix: String,
    suffix: String,
    span: Span,
}

impl TemplatePlaceholderReplacer {
    /// Create an engine with the given map and delimiters.
    pub fn new(
        placeholders: BTreeMap<String, String>,
        prefix: impl Into<String>,
        suffix: impl Into<String>,
        span: Span,
    ) -> Self {
        Self {
            placeholders,
            prefix: prefix.into(),
            suffix: suffix.into(),
            span,
        }
    }

    /// An engine with no placeholders and `${`/`}` delimiters.
    pub fn empty() -> Self {
        Self::new(BTreeMap::new(), "${", "}", Span::none())
    }

    /// Configured placeholder values.
    pub fn placeholders(&self) -> &BTreeMap<String, String> {
        &self.placeholders
    }
}

impl PlaceholderReplacer for TemplatePlaceholderReplacer {
    fn name(&self) -> &str {
        "template"
    }

    fn substitute(&self, text: &str) -> String {
        if text.trim().is_empty() || self.prefix.is_empty() || self.suffix.is_empty() {
            return text.to_string();
        }

        let mut output = String::with_capacity(text.len());
        let mut rest = text;
        while let Some(start) = rest.find(&self.prefix) {
            let after_prefix = &rest[start + self.prefix.len()..];
            let Some(end) = after_prefix.find(&self.suffix) else {
                break;
            };
            let key = &after_prefix[..end];
            output.push_str(&rest[..start]);
            match self.placeholders.get(key) {
                Some(value) => output.push_str(value),
                None => {
                    warn!(parent: &self.span, placeholder = key, "No value provided for placeholder");
                    output.push_str(&rest[start..start + self.prefix.len() + end + self.suffix.len()]);
                }
            }
            rest = &after_prefix[end + self.suffix.len()..];
        }
        output.push_str(rest);
        output
    }
}
