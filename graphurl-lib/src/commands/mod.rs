//! Command-line interface and orchestration for graphurl
//!
//! This module implements the CLI commands on top of the library's query, metric,
//! template and graph modules. It handles argument parsing, configuration loading and
//! output formatting.
//!
//! # Implementation Model
//!
//! ## Commands
//!
//! - **render**: Build a graph URL from flags
//! - **parse**: Take a graph URL apart and print the recovered query as JSON
//! - **metric**: Run raw path segments through the join, normalize, rewrite pipeline
//! - **graphs**: Generate composer/render links for a host or service from its metrics
//! - **template**: Generate links from a JSON or line-oriented template file
//! - **init**: Generate a default configuration file
//! - **validate**: Check a configuration file
//!
//! ## Execution Flow
//!
//! The `run` function parses command-line arguments using clap, initializes logging and
//! routes to the appropriate command handler. Handlers that need configuration load it
//! through the shared `--config` argument, falling back to `graphurl.toml` in the current
//! directory and then to the built-in default.
//!
//! All output goes through the [`Host`] trait so the commands can be driven in-process.

mod common;
mod graphs;
mod host;
mod init;
mod metric;
mod parse;
mod render;
mod run;
mod template;
mod validate;

pub use common::{ConfigArgs, GraphOutputArgs, LogLevel, SubjectArgs};
pub use graphs::{GraphsArgs, metric_graphs};
pub use host::Host;
pub use init::{InitArgs, init_config};
pub use metric::{MetricArgs, build_metric_name};
pub use parse::{ParseArgs, parse_graph_url};
pub use render::{RenderArgs, render_url};
pub use run::run;
pub use template::{TemplateArgs, template_graphs};
pub use validate::validate_config;
