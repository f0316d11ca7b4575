//! Graph query model
//!
//! This module turns structured graph requests into canonical URLs for the graphing
//! backend, and recovers the same structures from an existing URL.
//!
//! # Implementation Model
//!
//! - [`Target`] is one series: an expression plus optional `alias` and `color`
//!   decorations. Color is always the inner wrap and alias the outer one:
//!   `alias(color(base,"red"),"name")`.
//! - [`Style`] holds the visual parameters (size, font, line mode, colors).
//! - [`GraphQuery`] collects the server, time range, extrema, title, timezone, style and
//!   the ordered target list. [`GraphQuery::url`] renders the canonical URL for a
//!   [`RenderMode`]; [`GraphQuery::parse_url`] is its inverse.
//!
//! Start and end times go through [`format_time`]: integers are Unix timestamps rendered
//! in the local timezone as `HH:MM_YYYYMMDD`, anything else is passed through as-is.
//!
//! The `target=...&target=...` part of the URL is cached on the query. The cache has two
//! states: every change to the target list empties it, and the next read rebuilds it.

mod encoding;
mod graph_query;
mod render_mode;
mod style;
mod target;
mod time;
mod url_parser;

pub use graph_query::GraphQuery;
pub use render_mode::RenderMode;
pub use style::Style;
pub use target::{Decorations, Target, TargetAttributes, TargetInput};
pub use time::{TIME_FORMAT, TimeInput, format_time, format_time_in};
pub use url_parser::parse_url;
