use super::Host;
use super::common::{ConfigArgs, GraphOutputArgs, SubjectArgs};
use crate::Result;
use crate::graphs::{GraphFactory, MetricSample};
use clap::Parser;

#[derive(Parser, Debug)]
pub struct GraphsArgs {
    /// Metric to graph, with optional thresholds and unit; repeat for several metrics
    #[arg(long = "metric", short = 'm', value_name = "NAME[;WARN[;CRIT[;MIN[;MAX[;UNIT]]]]]", value_parser = parse_sample, required = true)]
    pub metrics: Vec<MetricSample>,

    #[command(flatten)]
    pub subject: SubjectArgs,

    #[command(flatten)]
    pub output: GraphOutputArgs,

    #[command(flatten)]
    pub config: ConfigArgs,
}

fn parse_sample(s: &str) -> Result<MetricSample, String> {
    s.parse::<MetricSample>().map_err(|e| e.to_string())
}

/// Print composer and render links for each metric
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded or a graph cannot be built
pub fn metric_graphs<H: Host>(host: &mut H, args: &GraphsArgs) -> Result<()> {
    let config = args.config.load()?;
    let (from, until) = args.output.range();
    let factory = GraphFactory::new(&config, &args.output.source, from, until)?;

    let links = factory.metric_graphs(&args.subject.subject(), &args.metrics)?;
    args.output.write_links(host, &links)
}
