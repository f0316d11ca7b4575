use super::Host;
use super::common::ConfigArgs;
use crate::Result;
use crate::query::{Decorations, GraphQuery, RenderMode, Style};
use clap::Parser;
use std::io::Write;

#[derive(Parser, Debug)]
pub struct RenderArgs {
    /// Series expression to graph; repeat for several series
    #[arg(long = "target", short = 't', value_name = "EXPR", required = true)]
    pub targets: Vec<String>,

    /// Base URI of the graphing backend (default is `uri` from the configuration)
    #[arg(long, value_name = "URI")]
    pub server: Option<String>,

    /// Endpoint to build the URL for
    #[arg(long, value_name = "MODE", default_value = "render")]
    pub mode: RenderMode,

    /// Start time, as a Unix timestamp or a value the backend understands (e.g. `-1d`)
    #[arg(long, value_name = "TIME", allow_hyphen_values = true)]
    pub from: Option<String>,

    /// End time, as a Unix timestamp or a value the backend understands (e.g. `now`)
    #[arg(long, value_name = "TIME", allow_hyphen_values = true)]
    pub until: Option<String>,

    /// Graph title
    #[arg(long)]
    pub title: Option<String>,

    /// Timezone (default is `tz` from the configuration)
    #[arg(long, value_name = "TZ")]
    pub tz: Option<String>,

    /// Lower bound of the y axis
    #[arg(long, value_name = "VALUE", allow_hyphen_values = true)]
    pub min: Option<f64>,

    /// Upper bound of the y axis
    #[arg(long, value_name = "VALUE", allow_hyphen_values = true)]
    pub max: Option<f64>,

    /// Named style from the configuration
    #[arg(long, value_name = "NAME", default_value = "default", help_heading = "Style")]
    pub style: String,

    /// Image width in pixels
    #[arg(long, value_name = "PIXELS", help_heading = "Style")]
    pub width: Option<u32>,

    /// Image height in pixels
    #[arg(long, value_name = "PIXELS", help_heading = "Style")]
    pub height: Option<u32>,

    /// Font size
    #[arg(long, value_name = "SIZE", help_heading = "Style")]
    pub font_size: Option<u32>,

    /// Line mode (e.g. `connected`, `staircase`)
    #[arg(long, value_name = "MODE", help_heading = "Style")]
    pub line_mode: Option<String>,

    /// Foreground color
    #[arg(long, value_name = "COLOR", help_heading = "Style")]
    pub fgcolor: Option<String>,

    /// Background color
    #[arg(long, value_name = "COLOR", help_heading = "Style")]
    pub bgcolor: Option<String>,

    /// Area mode (e.g. `stacked`)
    #[arg(long, value_name = "MODE", help_heading = "Style")]
    pub area_mode: Option<String>,

    #[command(flatten)]
    pub config: ConfigArgs,
}

fn build_style(args: &RenderArgs, base: Style) -> Result<Style> {
    let mut style = Style::new(
        args.width.unwrap_or(base.width.get()),
        args.height.unwrap_or(base.height.get()),
        args.font_size.unwrap_or(base.font_size.get()),
    )?;

    style.line_style = args.line_mode.clone().or(base.line_style);
    style.foreground = args.fgcolor.clone().or(base.foreground);
    style.background = args.bgcolor.clone().or(base.background);
    style.area_mode = args.area_mode.clone().or(base.area_mode);
    Ok(style)
}

/// Build a graph URL from command-line flags
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded, a dimension is zero, or a
/// target is not a well-formed expression
pub fn render_url<H: Host>(host: &mut H, args: &RenderArgs) -> Result<()> {
    let config = args.config.load()?;
    let style = build_style(args, config.style(&args.style))?;

    let mut query = GraphQuery::new(args.server.as_deref().unwrap_or(&config.uri))
        .with_style(style)
        .with_extrema(args.min, args.max);

    if let Some(from) = &args.from {
        query.set_start(from.as_str());
    }
    if let Some(until) = &args.until {
        query.set_end(until.as_str());
    }

    query.set_title(args.title.clone());
    query.set_timezone(args.tz.clone().or_else(|| config.tz.clone()));

    for target in &args.targets {
        query.add_target(target.as_str(), Decorations::new())?;
    }

    let _ = writeln!(host.output(), "{}", query.url(args.mode));
    Ok(())
}
