use super::{GraphQuery, RenderMode, Style, Target};
use crate::Result;
use crate::expr::MetricExpression;
use core::str::FromStr;
use ohno::{EnrichableExt, IntoAppError};
use std::collections::BTreeMap;
use url::{ParseError, Url};

const LOG_TARGET: &str = "url_parser";

/// Decoded query parameters; each key keeps every value in order of appearance
struct Params {
    values: BTreeMap<String, Vec<String>>,
}

impl Params {
    fn new(query: &str) -> Self {
        let mut values: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            values.entry(key.into_owned()).or_default().push(value.into_owned());
        }

        Self { values }
    }

    /// Remove a scalar key, keeping its last value
    fn take_last(&mut self, key: &str) -> Option<String> {
        let mut values = self.values.remove(key)?;
        if values.len() > 1 {
            log::warn!(target: LOG_TARGET, "Query parameter '{key}' appears {} times, using the last value", values.len());
        }

        values.pop()
    }

    /// Remove a repeatable key, keeping every value
    fn take_all(&mut self, key: &str) -> Vec<String> {
        self.values.remove(key).unwrap_or_default()
    }

    fn take_number(&mut self, key: &str) -> Result<Option<f64>> {
        self.take_last(key)
            .map(|value| {
                value
                    .trim()
                    .parse::<f64>()
                    .into_app_err_with(|| format!("'{key}' must be a number, got '{value}'"))
            })
            .transpose()
    }
}

/// Parse a graph URL back into a [`GraphQuery`]
///
/// Accepts both absolute (`http://host:port/path/render/?...`) and relative
/// (`render/?...`) URLs. Unrecognized query parameters are logged and ignored.
///
/// # Errors
///
/// Returns an error if the URL is malformed, a numeric parameter does not parse, or a
/// `target` is not a well-formed expression
pub fn parse_url(text: &str) -> Result<GraphQuery> {
    let text = text.trim();
    let (location, query) = text.split_once('?').unwrap_or((text, ""));

    let mut graph = GraphQuery::new(&server_of(location)?);
    let mut params = Params::new(query);

    let mut style = Style::default();
    if let Some(width) = params.take_last("width") {
        style.width = Style::parse_dimension("width", &width)?;
    }
    if let Some(height) = params.take_last("height") {
        style.height = Style::parse_dimension("height", &height)?;
    }
    if let Some(font_size) = params.take_last("fontSize") {
        style.font_size = Style::parse_dimension("fontSize", &font_size)?;
    }
    style.line_style = params.take_last("lineMode");
    style.foreground = params.take_last("fgcolor");
    style.background = params.take_last("bgcolor");
    style.area_mode = params.take_last("areaMode");
    graph = graph.with_style(style);

    if let Some(start) = params.take_last("from") {
        graph.set_start(start);
    }
    if let Some(end) = params.take_last("until") {
        graph.set_end(end);
    }

    graph.set_timezone(params.take_last("tz"));
    graph.set_title(params.take_last("title"));
    graph.set_min(params.take_number("yMin")?);
    graph.set_max(params.take_number("yMax")?);

    for (index, target) in params.take_all("target").iter().enumerate() {
        let target = MetricExpression::parse(target)
            .and_then(Target::decompose)
            .map_err(|e| e.enrich_with(|| format!("parsing target #{} '{target}'", index + 1)))?;
        graph.push_target(target);
    }

    for (key, values) in &params.values {
        log::warn!(target: LOG_TARGET, "Ignoring unrecognized query parameter '{key}' ({})", values.join(", "));
    }

    log::debug!(target: LOG_TARGET, "Parsed graph URL with {} target(s) for server '{}'", graph.targets().len(), graph.server());
    Ok(graph)
}

/// The server part of a graph URL: everything before the `?`, minus the endpoint segment
///
/// Absolute URLs are validated but kept byte for byte, so explicit default ports and
/// unencoded path segments survive.
fn server_of(location: &str) -> Result<String> {
    if location.is_empty() {
        return Ok(String::new());
    }

    match Url::parse(location) {
        Ok(_) => {
            let authority_end = location
                .find("://")
                .map(|scheme_end| scheme_end + 3)
                .and_then(|start| location[start..].find('/').map(|slash| start + slash))
                .unwrap_or(location.len());
            let (origin, path) = location.split_at(authority_end);

            let segments: Vec<&str> = path.split('/').skip(1).collect();
            let mut server = origin.to_string();
            for segment in strip_endpoint(&segments) {
                server.push('/');
                server.push_str(segment);
            }

            Ok(server)
        }

        Err(ParseError::RelativeUrlWithoutBase) => {
            let segments: Vec<&str> = location.split('/').collect();
            Ok(strip_endpoint(&segments).join("/"))
        }

        Err(e) => Err(e).into_app_err_with(|| format!("invalid graph URL '{location}'")),
    }
}

/// Drop the trailing empty segment and the endpoint segment that precedes it
fn strip_endpoint<'a>(segments: &'a [&'a str]) -> &'a [&'a str] {
    let segments = match segments {
        [rest @ .., ""] => rest,
        _ => segments,
    };

    match segments {
        [rest @ .., mode] => {
            if RenderMode::from_str(mode).is_err() {
                log::warn!(target: LOG_TARGET, "Unexpected endpoint segment '{mode}' in graph URL");
            }
            rest
        }
        [] => segments,
    }
}

impl GraphQuery {
    /// Parse a graph URL, see [`parse_url`]
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be parsed
    pub fn parse_url(text: &str) -> Result<Self> {
        parse_url(text)
    }
}
