//! Graph generation for monitored hosts and services
//!
//! Given a [`GraphSubject`] and the metrics already extracted from its performance data,
//! [`GraphFactory`] produces a pair of links per graph: the composer page and the rendered
//! image.
//!
//! Without a template, each [`MetricSample`] becomes one graph whose main series is the
//! metric path (prefix, group, host, data source, service, metric, postfix) run through the
//! configured [`crate::metric::MetricNormalizer`]. Every threshold present on the sample
//! adds a `constantLine` series. With template text, JSON templates are tried first and
//! line templates second; see [`crate::templates`].

mod factory;
mod subject;

pub use factory::GraphFactory;
pub use subject::{GraphLinks, GraphSubject, MetricSample};
