use super::Host;
use crate::Result;
use crate::query::parse_url;
use clap::Parser;
use ohno::IntoAppError;
use std::io::Write;

#[derive(Parser, Debug)]
pub struct ParseArgs {
    /// Graph URL to take apart
    #[arg(value_name = "URL")]
    pub url: String,
}

/// Print the query recovered from a graph URL as JSON
///
/// # Errors
///
/// Returns an error if the URL cannot be parsed
pub fn parse_graph_url<H: Host>(host: &mut H, args: &ParseArgs) -> Result<()> {
    let query = parse_url(&args.url)?;
    let json = serde_json::to_string_pretty(&query).into_app_err("serializing graph query")?;

    let _ = writeln!(host.output(), "{json}");
    Ok(())
}
