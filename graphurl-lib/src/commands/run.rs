//! Command dispatch logic for graphurl

use super::common::{ConfigArgs, LogLevel, init_logging};
use super::{
    GraphsArgs, InitArgs, MetricArgs, ParseArgs, RenderArgs, TemplateArgs, build_metric_name, init_config, metric_graphs, parse_graph_url,
    render_url, template_graphs, validate_config,
};
use crate::{Host, Result};
use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Effects};
use clap::{Parser, Subcommand};

const CLAP_STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

#[derive(Parser, Debug)]
#[command(name = "graphurl", version, author, long_about = None)]
#[command(about = "Build and parse query URLs for a Graphite-style graphing backend")]
#[command(styles = CLAP_STYLES)]
struct Cli {
    /// Set the logging level for diagnostic output
    #[arg(long, value_name = "LEVEL", default_value = "none", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: GraphurlSubcommand,
}

#[derive(Subcommand, Debug)]
enum GraphurlSubcommand {
    /// Build a graph URL from a time range, style and series expressions
    Render(Box<RenderArgs>),
    /// Recover the structured query from a graph URL and print it as JSON
    Parse(ParseArgs),
    /// Build a metric name from raw path segments using the configured rewrite rules
    Metric(MetricArgs),
    /// Generate graph links for a host or service from its metrics
    Graphs(Box<GraphsArgs>),
    /// Generate graph links from a JSON or line-oriented template file
    Template(Box<TemplateArgs>),
    /// Generate a default configuration file
    Init(InitArgs),
    /// Validate a configuration file
    Validate(ConfigArgs),
}

/// Dispatch command-line arguments to the appropriate handler
///
/// This function parses the command-line arguments and executes the corresponding
/// subcommand. It's designed to be called from main.rs with the program arguments.
///
/// # Arguments
///
/// * `args` - An iterator of command-line arguments (typically from `std::env::args()`)
///
/// # Errors
///
/// Returns an error if command parsing fails or if the executed command fails
pub fn run<I, T, H>(host: &mut H, args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
    H: Host,
{
    let cli = Cli::parse_from(args);
    init_logging(cli.log_level);

    match &cli.command {
        GraphurlSubcommand::Render(render_args) => render_url(host, render_args),
        GraphurlSubcommand::Parse(parse_args) => parse_graph_url(host, parse_args),
        GraphurlSubcommand::Metric(metric_args) => build_metric_name(host, metric_args),
        GraphurlSubcommand::Graphs(graphs_args) => metric_graphs(host, graphs_args),
        GraphurlSubcommand::Template(template_args) => template_graphs(host, template_args),
        GraphurlSubcommand::Init(init_args) => init_config(host, init_args),
        GraphurlSubcommand::Validate(config_args) => validate_config(host, config_args),
    }
}
