//! A single pattern-plus-action rewrite.

use std::borrow::Cow;

use regex::{Regex, RegexBuilder};

use crate::error::{MigrateError, Result};

/// What a rule does with each match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleAction {
    /// Replace with a template; `${1}` refers to the first capture group.
    Replace(String),
    /// Delete the match.
    Remove,
}

/// An atomic text transform: a case-insensitive pattern and an action.
#[derive(Debug, Clone)]
pub struct RewriteRule {
    regex: Regex,
    action: RuleAction,
}

impl RewriteRule {
    /// Create a rule that replaces every match with `template`.
    pub fn replace(pattern: &str, template: impl Into<String>) -> Result<Self> {
        Ok(Self {
            regex: compile(pattern)?,
            action: RuleAction::Replace(template.into()),
        })
    }

    /// Create a rule that deletes every match.
    pub fn remove(pattern: &str) -> Result<Self> {
        Ok(Self {
            regex: compile(pattern)?,
            action: RuleAction::Remove,
        })
    }

    /// The source pattern.
    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    /// The action applied to matches.
    pub fn action(&self) -> &RuleAction {
        &self.action
    }

    /// Rewrite all non-overlapping matches in `text`.
    ///
    /// Returns `Cow::Borrowed` when nothing matched.
    pub fn apply<'a>(&self, text: &'a str) -> Cow<'a, str> {
        match &self.action {
            RuleAction::Replace(template) => self.regex.replace_all(text, template.as_str()),
            RuleAction::Remove => self.regex.replace_all(text, ""),
        }
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .crlf(true)
        .build()
        .map_err(|source| MigrateError::InvalidRule {
            pattern: pattern.to_string(),
            source,
        })
}
