//! Shared argument types and setup used by several commands.

use super::Host;
use crate::Result;
use crate::config::Config;
use crate::graphs::{GraphLinks, GraphSubject};
use camino::{Utf8Path, Utf8PathBuf};
use chrono::{TimeDelta, Utc};
use clap::{Args, ValueEnum};
use ohno::IntoAppError;
use std::io::Write;

/// Log level for diagnostic output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// No logging output
    None,

    /// Only error messages
    Error,

    /// Warning and error messages
    Warn,

    /// Info, warning, and error messages
    Info,

    /// Debug, info, warning, and error messages
    Debug,

    /// Trace, debug, info, warning, and error messages
    Trace,
}

/// Arguments for commands that read the configuration file
#[derive(Args, Debug, Default)]
pub struct ConfigArgs {
    /// Path to configuration file (default is `graphurl.toml`)
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<Utf8PathBuf>,
}

impl ConfigArgs {
    /// Load the configuration named on the command line, or the one in the current directory
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded
    pub fn load(&self) -> Result<Config> {
        Config::load(Utf8Path::new("."), self.config.as_ref())
    }
}

/// Initialize logger based on log level
///
/// `RUST_LOG` takes precedence when set. Repeated calls keep the first logger.
pub fn init_logging(log_level: LogLevel) {
    let level = match log_level {
        LogLevel::None => return,
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    };

    let env = env_logger::Env::default().filter_or("RUST_LOG", level);

    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(matches!(log_level, LogLevel::Debug | LogLevel::Trace))
        .try_init();
}

/// Identifies the host or service graphs are built for
#[derive(Args, Debug)]
pub struct SubjectArgs {
    /// Host name
    #[arg(long, value_name = "NAME")]
    pub host: String,

    /// Service description (omit for host-level graphs)
    #[arg(long, value_name = "NAME")]
    pub service: Option<String>,

    /// Leading metric path segment
    #[arg(long, value_name = "SEGMENT")]
    pub prefix: Option<String>,

    /// Group segment placed after the prefix
    #[arg(long, value_name = "SEGMENT")]
    pub group: Option<String>,

    /// Trailing metric path segment
    #[arg(long, value_name = "SEGMENT")]
    pub postfix: Option<String>,
}

impl SubjectArgs {
    #[must_use]
    pub fn subject(&self) -> GraphSubject {
        GraphSubject {
            host: self.host.clone(),
            service: self.service.clone(),
            prefix: self.prefix.clone(),
            group: self.group.clone(),
            postfix: self.postfix.clone(),
        }
    }
}

/// Time range, style and output options for generated graphs
#[derive(Args, Debug)]
pub struct GraphOutputArgs {
    /// Start time (default is 24 hours ago)
    #[arg(long, value_name = "TIME", allow_hyphen_values = true)]
    pub from: Option<String>,

    /// End time (default is now)
    #[arg(long, value_name = "TIME", allow_hyphen_values = true)]
    pub until: Option<String>,

    /// Where the graphs are shown; selects the style of the same name
    #[arg(long, value_name = "NAME", default_value = "default")]
    pub source: String,

    /// Print the links as JSON
    #[arg(long)]
    pub json: bool,
}

impl GraphOutputArgs {
    /// The requested start and end times
    #[must_use]
    pub fn range(&self) -> (String, String) {
        let now = Utc::now();
        let until = self.until.clone().unwrap_or_else(|| now.timestamp().to_string());
        let from = self
            .from
            .clone()
            .unwrap_or_else(|| (now - TimeDelta::days(1)).timestamp().to_string());
        (from, until)
    }

    /// Print graph links, as JSON or as `link`/`img_src` line pairs
    ///
    /// # Errors
    ///
    /// Returns an error if the links cannot be serialized
    pub fn write_links<H: Host>(&self, host: &mut H, links: &[GraphLinks]) -> Result<()> {
        let mut output = host.output();

        if self.json {
            let json = serde_json::to_string_pretty(links).into_app_err("serializing graph links")?;
            let _ = writeln!(output, "{json}");
            return Ok(());
        }

        for graph in links {
            let _ = writeln!(output, "link: {}", graph.link);
            let _ = writeln!(output, "img_src: {}", graph.img_src);
        }

        Ok(())
    }
}
