//! Metric name sanitizing and rewriting
//!
//! Metric paths sent to the graphing backend are dot-separated. Raw segments coming from
//! monitoring data (host names, service descriptions, perf-data labels) may contain any
//! character, so they are sanitized before use.
//!
//! # Implementation Model
//!
//! Building a metric name always follows the same three steps, in this order:
//!
//! 1. [`join`] drops empty segments and joins the rest with `.`
//! 2. [`normalize`] replaces every character outside `[A-Za-z0-9_.-]` with `_`
//! 3. [`RewriteRules::rewrite`] feeds the result through every registered rule in order
//!
//! Rule authors write their patterns against sanitized, dot-joined input, so the order is
//! fixed. [`MetricNormalizer`] bundles a rule registry with the pipeline.
//!
//! The rule registry is an explicit object rather than process-wide state. Rules are
//! appended while configuration loads and read on every rewrite; a read-mostly lock keeps
//! concurrent readers from seeing a partially appended rule.

mod normalize;
mod normalizer;
mod rewrite;

pub use normalize::{join, normalize, normalize_identifier};
pub use normalizer::MetricNormalizer;
pub use rewrite::{RewriteRule, RewriteRules};
