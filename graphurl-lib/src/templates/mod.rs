//! Graph templates
//!
//! Callers that already hold template text (how it was found is up to them) can turn it
//! into graph queries here. Two formats are understood:
//!
//! - **JSON templates**: a list of graph descriptions. Every string in the document may
//!   contain `{name}` placeholders, filled from a [`TemplateContext`]; `{{` and `}}` stand
//!   for literal braces. Each filled entry deserializes into a [`GraphSpec`].
//! - **Line templates**: one graph URL per line with `$name` or `${name}` placeholders
//!   (`$$` is a literal dollar sign). Each substituted line is parsed back with
//!   [`crate::query::parse_url`].
//!
//! Unknown placeholder names are errors in both formats.

mod graph_spec;
mod json_template;
mod line_template;

use std::collections::BTreeMap;

pub use graph_spec::GraphSpec;
pub use json_template::JsonTemplate;
pub use line_template::{parse_line_template, substitute_line_template};

/// Values available to template placeholders, by name
pub type TemplateContext = BTreeMap<String, String>;
