#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core library for graphurl
//!
//! This library builds and parses query URLs for a Graphite-style graphing backend. It turns
//! structured graph requests into canonical render/composer URLs, and recovers the same
//! structures from an existing URL.
//!
//! # Module Organization
//!
//! - [`metric`]: Metric path sanitizing and the ordered rewrite-rule pipeline
//! - [`expr`]: Parser and serializer for the data-series expression language
//! - [`query`]: Targets, styles and the graph query model with URL rendering/parsing
//! - [`templates`]: JSON and line-oriented graph template filling
//! - [`graphs`]: Graph generation from already-extracted metric samples
//! - [`config`]: TOML configuration
//! - [`commands`]: Command-line interface and orchestration

pub type Result<T, E = ohno::AppError> = core::result::Result<T, E>;

pub mod commands;
pub mod config;
pub mod expr;
pub mod graphs;
pub mod metric;
pub mod query;
pub mod templates;

pub use crate::commands::{Host, run};
