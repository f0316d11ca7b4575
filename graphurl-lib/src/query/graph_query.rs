use super::encoding::encode_value;
use super::{Decorations, RenderMode, Style, Target, TargetInput, TimeInput, format_time};
use crate::Result;
use core::fmt::{Display, Formatter, Result as FmtResult};
use core::str::FromStr;
use ohno::bail;
use serde::Serialize;
use std::sync::OnceLock;

/// A structured request for one graph
#[derive(Debug, Clone, Serialize)]
pub struct GraphQuery {
    server: String,

    #[serde(rename = "from")]
    start: String,

    #[serde(rename = "until")]
    end: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    min: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    max: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    timezone: Option<String>,

    style: Style,
    targets: Vec<Target>,

    /// `target=...&target=...`, empty while invalidated
    #[serde(skip)]
    target_string: OnceLock<String>,
}

fn strip_trailing_slashes(server: &str) -> String {
    server.trim().trim_end_matches('/').to_string()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl GraphQuery {
    /// Create a query against `server` with default style and both times at the epoch
    #[must_use]
    pub fn new(server: &str) -> Self {
        Self {
            server: strip_trailing_slashes(server),
            start: format_time(0),
            end: format_time(0),
            min: None,
            max: None,
            title: None,
            timezone: None,
            style: Style::default(),
            targets: Vec::new(),
            target_string: OnceLock::new(),
        }
    }

    #[must_use]
    pub fn with_range(mut self, start: impl Into<TimeInput>, end: impl Into<TimeInput>) -> Self {
        self.set_start(start);
        self.set_end(end);
        self
    }

    #[must_use]
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.set_title(Some(title.into()));
        self
    }

    #[must_use]
    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.set_timezone(Some(timezone.into()));
        self
    }

    #[must_use]
    pub const fn with_extrema(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    #[must_use]
    pub fn server(&self) -> &str {
        &self.server
    }

    pub fn set_server(&mut self, server: &str) {
        self.server = strip_trailing_slashes(server);
    }

    #[must_use]
    pub fn start(&self) -> &str {
        &self.start
    }

    pub fn set_start(&mut self, start: impl Into<TimeInput>) {
        self.start = format_time(start);
    }

    #[must_use]
    pub fn end(&self) -> &str {
        &self.end
    }

    pub fn set_end(&mut self, end: impl Into<TimeInput>) {
        self.end = format_time(end);
    }

    #[must_use]
    pub const fn min(&self) -> Option<f64> {
        self.min
    }

    pub const fn set_min(&mut self, min: Option<f64>) {
        self.min = min;
    }

    #[must_use]
    pub const fn max(&self) -> Option<f64> {
        self.max
    }

    pub const fn set_max(&mut self, max: Option<f64>) {
        self.max = max;
    }

    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn set_title(&mut self, title: Option<String>) {
        self.title = non_empty(title);
    }

    #[must_use]
    pub fn timezone(&self) -> Option<&str> {
        self.timezone.as_deref()
    }

    pub fn set_timezone(&mut self, timezone: Option<String>) {
        self.timezone = non_empty(timezone);
    }

    #[must_use]
    pub const fn style(&self) -> &Style {
        &self.style
    }

    pub const fn style_mut(&mut self) -> &mut Style {
        &mut self.style
    }

    #[must_use]
    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    /// Build a target from `input` and append it
    ///
    /// # Errors
    ///
    /// Returns an error if the target cannot be built; the query is left unchanged
    pub fn add_target(&mut self, input: impl Into<TargetInput>, decorations: Decorations) -> Result<()> {
        let target = Target::build(input, decorations)?;
        self.push_target(target);
        Ok(())
    }

    /// Append an already built target
    pub fn push_target(&mut self, target: Target) {
        self.targets.push(target);
        let _ = self.target_string.take();
    }

    pub fn clear_targets(&mut self) {
        self.targets.clear();
        let _ = self.target_string.take();
    }

    /// The `target=...` query parameters for every target, in order
    ///
    /// Empty when there are no targets.
    pub fn target_string(&self) -> &str {
        self.target_string.get_or_init(|| {
            self.targets
                .iter()
                .map(|target| format!("target={}", encode_value(&target.to_string())))
                .collect::<Vec<_>>()
                .join("&")
        })
    }

    /// Render the URL for an endpoint
    #[must_use]
    pub fn url(&self, mode: RenderMode) -> String {
        let mut params = vec![
            self.style.to_string(),
            format!("from={}", encode_value(&self.start)),
            format!("until={}", encode_value(&self.end)),
        ];

        if let Some(timezone) = &self.timezone {
            params.push(format!("tz={}", encode_value(timezone)));
        }

        if let Some(title) = &self.title {
            params.push(format!("title={}", encode_value(title)));
        }

        if let Some(min) = self.min {
            params.push(format!("yMin={min}"));
        }

        if let Some(max) = self.max {
            params.push(format!("yMax={max}"));
        }

        let targets = self.target_string();
        if !targets.is_empty() {
            params.push(targets.to_string());
        }

        let query = params.join("&");
        if self.server.is_empty() {
            format!("{mode}/?{query}")
        } else {
            format!("{}/{mode}/?{query}", self.server)
        }
    }

    /// Render the URL for an endpoint given by name (`render` or `composer`)
    ///
    /// # Errors
    ///
    /// Returns an error if `mode` names neither endpoint
    pub fn render_url(&self, mode: &str) -> Result<String> {
        match RenderMode::from_str(mode) {
            Ok(mode) => Ok(self.url(mode)),
            Err(_) => bail!("mode must be \"render\" or \"composer\", not \"{mode}\""),
        }
    }
}

impl Default for GraphQuery {
    fn default() -> Self {
        Self::new("")
    }
}

/// Compares the query fields; the target-string cache is ignored
impl PartialEq for GraphQuery {
    fn eq(&self, other: &Self) -> bool {
        self.server == other.server
            && self.start == other.start
            && self.end == other.end
            && self.min == other.min
            && self.max == other.max
            && self.title == other.title
            && self.timezone == other.timezone
            && self.style == other.style
            && self.targets == other.targets
    }
}

impl Display for GraphQuery {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.url(RenderMode::Render))
    }
}
