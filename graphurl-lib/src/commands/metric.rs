use super::Host;
use super::common::ConfigArgs;
use crate::Result;
use crate::metric::MetricNormalizer;
use clap::Parser;
use std::io::Write;

#[derive(Parser, Debug)]
pub struct MetricArgs {
    /// Raw metric path segments, in order
    #[arg(value_name = "SEGMENT", required = true)]
    pub segments: Vec<String>,

    #[command(flatten)]
    pub config: ConfigArgs,
}

/// Print the metric name built from raw segments with the configured rewrite rules
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded
pub fn build_metric_name<H: Host>(host: &mut H, args: &MetricArgs) -> Result<()> {
    let config = args.config.load()?;
    let normalizer = MetricNormalizer::new(config.rewrite_rules()?);

    let _ = writeln!(host.output(), "{}", normalizer.metric_name(&args.segments));
    Ok(())
}
