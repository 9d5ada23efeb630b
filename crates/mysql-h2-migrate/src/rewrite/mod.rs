//! Ordered, case-insensitive text rewriting.
//!
//! A [`RewritePipeline`] is an immutable list of [`RewriteRule`]s applied in
//! declaration order. Each rule rewrites every non-overlapping match in the
//! whole current text, and its output feeds the next rule. There is no
//! parsing involved: rules are plain regular expressions tuned to a known
//! corpus of scripts.
//!
//! Patterns are compiled case-insensitively and with CRLF-aware line anchors,
//! so `(?m)^...$` treats `\r\n` as one terminator and `.` never swallows a
//! carriage return.

mod pipeline;
mod rule;

pub use pipeline::{PipelineBuilder, RewritePipeline};
pub use rule::{RewriteRule, RuleAction};
