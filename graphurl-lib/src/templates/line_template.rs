use super::TemplateContext;
use crate::Result;
use crate::query::{GraphQuery, Style, parse_url};
use ohno::{EnrichableExt, bail};
use regex::Regex;
use std::sync::LazyLock;

const LOG_TARGET: &str = "  template";

static PLACEHOLDER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$(?:(?P<escaped>\$)|(?P<named>[_A-Za-z][_A-Za-z0-9]*)|\{(?P<braced>[_A-Za-z][_A-Za-z0-9]*)\}|(?P<invalid>))")
        .expect("invalid regex")
});

/// Replace `$name` and `${name}` placeholders; `$$` is a literal `$`
///
/// # Errors
///
/// Returns an error if a placeholder names a value missing from `context`, or if a `$`
/// is not followed by a name, a braced name or another `$`
pub fn substitute_line_template(text: &str, context: &TemplateContext) -> Result<String> {
    let mut result = String::with_capacity(text.len());
    let mut last = 0;

    for caps in PLACEHOLDER_REGEX.captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        result.push_str(&text[last..whole.start()]);
        last = whole.end();

        if caps.name("escaped").is_some() {
            result.push('$');
        } else if let Some(name) = caps.name("named").or_else(|| caps.name("braced")) {
            match context.get(name.as_str()) {
                Some(value) => result.push_str(value),
                None => bail!("unknown placeholder '${}' in template", name.as_str()),
            }
        } else {
            bail!("invalid placeholder at offset {} in template", whole.start());
        }
    }

    result.push_str(&text[last..]);
    Ok(result)
}

/// Substitute a line template and parse each non-empty line as a graph URL
///
/// Every resulting query is given `style`.
///
/// # Errors
///
/// Returns an error if substitution fails or a line is not a valid graph URL
pub fn parse_line_template(text: &str, context: &TemplateContext, style: &Style) -> Result<Vec<GraphQuery>> {
    let filled = substitute_line_template(text, context)?;

    let graphs = filled
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .enumerate()
        .map(|(index, line)| {
            parse_url(line)
                .map(|query| query.with_style(style.clone()))
                .map_err(|e| e.enrich_with(|| format!("parsing graph URL #{} of the template", index + 1)))
        })
        .collect::<Result<Vec<_>>>()?;

    log::debug!(target: LOG_TARGET, "Line template produced {} graph(s)", graphs.len());
    Ok(graphs)
}
