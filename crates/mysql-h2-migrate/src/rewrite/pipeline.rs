//! Ordered rule application.

use std::borrow::Cow;
use std::sync::Arc;

use crate::error::Result;

use super::rule::RewriteRule;

/// An immutable, ordered sequence of rewrite rules.
///
/// Order is part of the pipeline's identity: later rules see the output of
/// earlier ones. Cloning is cheap and clones share the compiled rules.
#[derive(Debug, Clone)]
pub struct RewritePipeline {
    rules: Arc<[RewriteRule]>,
}

impl RewritePipeline {
    /// Create a pipeline from already-compiled rules.
    pub fn new(rules: Vec<RewriteRule>) -> Self {
        Self {
            rules: rules.into(),
        }
    }

    /// Start building a pipeline from pattern strings.
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    /// The rules in application order.
    pub fn rules(&self) -> &[RewriteRule] {
        &self.rules
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// True when the pipeline has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Run every rule over `text`, in order.
    ///
    /// Blank input is returned unchanged without touching any rule.
    pub fn apply(&self, text: &str) -> String {
        if text.trim().is_empty() {
            return text.to_string();
        }

        let mut current = text.to_string();
        for rule in self.rules.iter() {
            let rewritten = match rule.apply(&current) {
                Cow::Borrowed(_) => continue,
                Cow::Owned(rewritten) => rewritten,
            };
            current = rewritten;
        }
        current
    }
}

impl Default for RewritePipeline {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

/// Collects rules for a [`RewritePipeline`], keeping the first compile error.
#[derive(Debug, Default)]
pub struct PipelineBuilder {
    rules: Vec<RewriteRule>,
    error: Option<crate::error::MigrateError>,
}

impl PipelineBuilder {
    /// Append a replace rule.
    pub fn replace(self, pattern: &str, template: impl Into<String>) -> Self {
        let rule = RewriteRule::replace(pattern, template);
        self.push(rule)
    }

    /// Append a remove rule.
    pub fn remove(self, pattern: &str) -> Self {
        let rule = RewriteRule::remove(pattern);
        self.push(rule)
    }

    /// Append an already-compiled rule.
    pub fn rule(mut self, rule: RewriteRule) -> Self {
        self.rules.push(rule);
        self
    }

    fn push(mut self, rule: Result<RewriteRule>) -> Self {
        if self.error.is_some() {
            return self;
        }
        match rule {
            Ok(rule) => self.rules.push(rule),
            Err(e) => self.error = Some(e),
        }
        self
    }

    /// Finish the pipeline, failing on the first invalid pattern.
    pub fn build(self) -> Result<RewritePipeline> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(RewritePipeline::new(self.rules)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MigrateError;

    #[test]
    fn test_rules_apply_in_order() {
        let pipeline = RewritePipeline::builder()
            .replace("a", "b")
            .replace("b", "c")
            .build()
            .unwrap();
        assert_eq!(pipeline.apply("a"), "c");

        let reversed = RewritePipeline::builder()
            .replace("b", "c")
            .replace("a", "b")
            .build()
            .unwrap();
        assert_eq!(reversed.apply("a"), "b");
    }

    #[test]
    fn test_blank_input_is_returned_unchanged() {
        let pipeline = RewritePipeline::builder()
            .replace(r"\s+", "X")
            .build()
            .unwrap();
        assert_eq!(pipeline.apply(""), "");
        assert_eq!(pipeline.apply(" \n\t"), " \n\t");
    }

    #[test]
    fn test_no_match_is_noop() {
        let pipeline = RewritePipeline::builder()
            .remove("LOCK TABLES")
            .build()
            .unwrap();
        assert_eq!(pipeline.apply("SELECT 1;"), "SELECT 1;");
    }

    #[test]
    fn test_builder_reports_first_invalid_pattern() {
        let err = RewritePipeline::builder()
            .remove("ok")
            .remove("(bad")
            .remove("[worse")
            .build()
            .unwrap_err();
        match err {
            MigrateError::InvalidRule { pattern, .. } => assert_eq!(pattern, "(bad"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_clones_share_rules() {
        let pipeline = RewritePipeline::builder().remove("x").build().unwrap();
        let clone = pipeline.clone();
        assert!(std::ptr::eq(pipeline.rules().as_ptr(), clone.rules().as_ptr()));
        assert_eq!(clone.len(), 1);
    }
}
