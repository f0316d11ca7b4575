//! Data-series expression language
//!
//! A series expression is what the graphing backend receives in a `target` query parameter:
//! a metric path, optionally wrapped in display functions such as
//! `alias(sumSeries(web*.cpu),"CPU")`.
//!
//! # Implementation Model
//!
//! [`MetricExpression`] is an immutable tree with four kinds of nodes: metric references,
//! function calls, string literals and number literals. Trees are produced by [`parse`] (or
//! direct construction) and turned back into text by their `Display` implementation.
//!
//! The parser is a recursive descent over the raw text. A function name is everything
//! before the first opening parenthesis; the text between the matching parentheses is
//! split on commas that sit outside nested calls and outside string literals, and each
//! piece is parsed recursively. Malformed input (unbalanced parentheses, unterminated
//! string literals, empty arguments, trailing text after a call) is rejected with an
//! error that carries the byte offset of the problem.
//!
//! Serializing then re-parsing is not guaranteed to reproduce the original tree exactly:
//! string literals always serialize with a single pair of quotes, so any surrounding
//! quotes that were part of a literal's value are lost.

mod expression;
mod number;
mod parser;

pub use expression::MetricExpression;
pub use number::Number;
pub use parser::parse;
