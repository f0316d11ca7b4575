use super::Host;
use super::common::{ConfigArgs, GraphOutputArgs, SubjectArgs};
use crate::Result;
use crate::graphs::GraphFactory;
use camino::Utf8PathBuf;
use clap::Parser;
use ohno::{EnrichableExt, IntoAppError};
use std::fs;

#[derive(Parser, Debug)]
pub struct TemplateArgs {
    /// Template file, either JSON or one graph URL per line
    #[arg(value_name = "FILE")]
    pub file: Utf8PathBuf,

    #[command(flatten)]
    pub subject: SubjectArgs,

    #[command(flatten)]
    pub output: GraphOutputArgs,

    #[command(flatten)]
    pub config: ConfigArgs,
}

/// Fill a graph template and print composer and render links for each graph
///
/// # Errors
///
/// Returns an error if the configuration or template cannot be read, or the template
/// does not describe valid graphs
pub fn template_graphs<H: Host>(host: &mut H, args: &TemplateArgs) -> Result<()> {
    let config = args.config.load()?;
    let text = fs::read_to_string(&args.file).into_app_err_with(|| format!("reading template file '{}'", args.file))?;

    let (from, until) = args.output.range();
    let factory = GraphFactory::new(&config, &args.output.source, from, until)?;

    let links = factory
        .template_graphs(&args.subject.subject(), &text)
        .map_err(|e| e.enrich_with(|| format!("using template '{}'", args.file)))?;
    args.output.write_links(host, &links)
}
