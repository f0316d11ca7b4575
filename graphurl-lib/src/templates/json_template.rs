use super::{GraphSpec, TemplateContext};
use crate::Result;
use ohno::{IntoAppError, bail};
use serde_json::Value;

const LOG_TARGET: &str = "  template";

/// A parsed JSON graph template
#[derive(Debug, Clone, PartialEq)]
pub struct JsonTemplate {
    data: Value,
}

impl JsonTemplate {
    /// Parse template text as JSON
    ///
    /// # Errors
    ///
    /// Returns a "not a JSON template" error if the text is not a JSON document
    pub fn parse(text: &str) -> Result<Self> {
        let data = serde_json::from_str(text).into_app_err("not a JSON template")?;
        Ok(Self { data })
    }

    /// Fill every `{name}` placeholder and return one graph description per entry
    ///
    /// A top-level object is treated as a single entry.
    ///
    /// # Errors
    ///
    /// Returns an error if a placeholder is unknown or malformed, or if a filled entry
    /// does not describe a graph
    pub fn fill(&self, context: &TemplateContext) -> Result<Vec<GraphSpec>> {
        let filled = fill_value(&self.data, context)?;

        let entries = match filled {
            Value::Array(entries) => entries,
            entry @ Value::Object(_) => vec![entry],
            other => bail!("a JSON template must be a list of graphs, found {other}"),
        };

        log::debug!(target: LOG_TARGET, "Filled JSON template with {} graph(s)", entries.len());

        entries
            .into_iter()
            .enumerate()
            .map(|(index, entry)| {
                serde_json::from_value(entry).into_app_err_with(|| format!("reading graph #{} of the JSON template", index + 1))
            })
            .collect()
    }
}

fn fill_value(value: &Value, context: &TemplateContext) -> Result<Value> {
    Ok(match value {
        Value::String(text) => Value::String(fill_string(text, context)?),
        Value::Array(items) => Value::Array(items.iter().map(|item| fill_value(item, context)).collect::<Result<_>>()?),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, item)| Ok((key.clone(), fill_value(item, context)?)))
                .collect::<Result<_>>()?,
        ),
        other => other.clone(),
    })
}

/// Replace `{name}` placeholders; `{{` and `}}` are literal braces
fn fill_string(text: &str, context: &TemplateContext) -> Result<String> {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.char_indices().peekable();

    while let Some((offset, c)) = chars.next() {
        match c {
            '{' if chars.next_if(|&(_, next)| next == '{').is_some() => result.push('{'),
            '}' if chars.next_if(|&(_, next)| next == '}').is_some() => result.push('}'),
            '{' => {
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some((_, '}')) => break,
                        Some((_, c)) => name.push(c),
                        None => bail!("unterminated placeholder at offset {offset} in '{text}'"),
                    }
                }

                match context.get(&name) {
                    Some(value) => result.push_str(value),
                    None => bail!("unknown placeholder '{{{name}}}' in '{text}'"),
                }
            }
            '}' => bail!("single '}}' at offset {offset} in '{text}'"),
            c => result.push(c),
        }
    }

    Ok(result)
}
