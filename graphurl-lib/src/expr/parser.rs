use super::{MetricExpression, Number};
use crate::Result;
use ohno::bail;

const QUOTE: char = '"';

/// Tracks string literals, nested calls and `{a,b}` path groups while scanning
///
/// An unmatched `{` or `}` is an error, so a group cannot swallow the separators that
/// follow it.
#[derive(Debug, Default)]
struct Nesting {
    in_quote: bool,
    parens: usize,
    braces: usize,
    open_brace: usize,
}

impl Nesting {
    const fn at_top_level(&self) -> bool {
        !self.in_quote && self.parens == 0 && self.braces == 0
    }

    fn advance(&mut self, i: usize, c: char, offset: usize) -> Result<()> {
        if c == QUOTE {
            self.in_quote = !self.in_quote;
            return Ok(());
        }

        if self.in_quote {
            return Ok(());
        }

        match c {
            '(' => self.parens += 1,
            ')' => self.parens = self.parens.saturating_sub(1),
            '{' => {
                if self.braces == 0 {
                    self.open_brace = i;
                }
                self.braces += 1;
            }
            '}' if self.braces == 0 => bail!("unbalanced braces: unexpected '}}' at offset {}", offset + i),
            '}' => self.braces -= 1,
            _ => {}
        }

        Ok(())
    }

    fn finish(&self, offset: usize) -> Result<()> {
        if self.braces > 0 {
            bail!("unbalanced braces: missing '}}' for the '{{' at offset {}", offset + self.open_brace);
        }
        Ok(())
    }
}

/// Parse a series expression
///
/// # Errors
///
/// Returns an error describing the first problem found if the text is empty, has
/// unbalanced parentheses or braces, an unterminated string literal, an empty argument,
/// a number too large for a float, or text following a function call's closing
/// parenthesis.
pub fn parse(text: &str) -> Result<MetricExpression> {
    parse_at(text, 0)
}

fn parse_at(text: &str, offset: usize) -> Result<MetricExpression> {
    let offset = offset + (text.len() - text.trim_start().len());
    let text = text.trim();

    if text.is_empty() {
        bail!("empty expression at offset {offset}");
    }

    match find_outside_quotes(text, '(') {
        Some(open) => parse_call(text, open, offset),
        None => parse_token(text, offset),
    }
}

fn find_outside_quotes(text: &str, target: char) -> Option<usize> {
    let mut in_quote = false;
    for (i, c) in text.char_indices() {
        if c == QUOTE {
            in_quote = !in_quote;
        } else if c == target && !in_quote {
            return Some(i);
        }
    }

    None
}

fn parse_call(text: &str, open: usize, offset: usize) -> Result<MetricExpression> {
    let (name, rest) = text.split_at(open);
    let name = name.trim_end();

    if name.is_empty() {
        bail!("missing function name before '(' at offset {}", offset + open);
    }

    if let Some(c) = name.chars().find(|c| matches!(c, '"' | ')' | ',')) {
        bail!("unexpected '{c}' in function name '{name}' at offset {offset}");
    }

    let close = matching_paren(rest, offset + open)?;
    let (call, trailing) = rest.split_at(close + 1);

    if !trailing.is_empty() {
        bail!(
            "unexpected '{trailing}' after the closing parenthesis of '{name}' at offset {}",
            offset + open + close + 1
        );
    }

    let inner = call.strip_prefix('(').and_then(|s| s.strip_suffix(')')).unwrap_or_default();
    let args = split_args(inner, offset + open + 1)?
        .into_iter()
        .map(|(arg, at)| parse_at(arg, at))
        .collect::<Result<Vec<_>>>()?;

    Ok(MetricExpression::FunctionCall {
        name: name.to_string(),
        args,
    })
}

/// Byte index of the `)` that closes the `(` at the start of `text`
fn matching_paren(text: &str, offset: usize) -> Result<usize> {
    let mut depth = 0_usize;
    let mut in_quote = false;

    for (i, c) in text.char_indices() {
        match c {
            QUOTE => in_quote = !in_quote,
            '(' if !in_quote => depth += 1,
            ')' if !in_quote => {
                depth -= 1;
                if depth == 0 {
                    return Ok(i);
                }
            }
            _ => {}
        }
    }

    if in_quote {
        bail!("unterminated string literal in the call opened at offset {offset}");
    }

    bail!("unbalanced parentheses: missing ')' for the '(' at offset {offset}");
}

/// Split the text between a call's parentheses into top-level arguments
fn split_args(inner: &str, offset: usize) -> Result<Vec<(&str, usize)>> {
    if inner.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut args = Vec::new();
    let mut nesting = Nesting::default();
    let mut start = 0;

    for (i, c) in inner.char_indices() {
        if c == ',' && nesting.at_top_level() {
            args.push(checked_arg(&inner[start..i], offset + start)?);
            start = i + 1;
        } else {
            nesting.advance(i, c, offset)?;
        }
    }

    nesting.finish(offset)?;
    args.push(checked_arg(&inner[start..], offset + start)?);
    Ok(args)
}

fn checked_arg(arg: &str, offset: usize) -> Result<(&str, usize)> {
    if arg.trim().is_empty() {
        bail!("empty argument at offset {offset}");
    }

    Ok((arg, offset))
}

fn parse_token(token: &str, offset: usize) -> Result<MetricExpression> {
    if let Some(rest) = token.strip_prefix(QUOTE) {
        return match rest.strip_suffix(QUOTE) {
            Some(value) if !value.contains(QUOTE) => Ok(MetricExpression::StringLiteral(value.to_string())),
            Some(_) => bail!("unexpected '\"' inside string literal {token} at offset {offset}"),
            None => bail!("unterminated string literal {token} at offset {offset}"),
        };
    }

    if let Some(i) = find_outside_quotes(token, ')') {
        bail!("unbalanced parentheses: unexpected ')' at offset {}", offset + i);
    }

    if let Some(i) = token.find(QUOTE) {
        bail!("unexpected '\"' in '{token}' at offset {}", offset + i);
    }

    let mut nesting = Nesting::default();
    for (i, c) in token.char_indices() {
        if c == ',' && nesting.at_top_level() {
            bail!("unexpected ',' outside of a function call at offset {}", offset + i);
        }
        nesting.advance(i, c, offset)?;
    }
    nesting.finish(offset)?;

    if let Some(number) = parse_number(token, offset)? {
        return Ok(MetricExpression::NumberLiteral(number));
    }

    Ok(MetricExpression::metric(token))
}

fn parse_number(token: &str, offset: usize) -> Result<Option<Number>> {
    if let Ok(value) = token.parse::<i64>() {
        return Ok(Some(Number::Int(value)));
    }

    // Only tokens that look numeric are floats; paths such as `inf` or `-nan` stay metrics.
    let looks_numeric = token.starts_with(|c: char| c.is_ascii_digit() || matches!(c, '+' | '-' | '.'));
    if !looks_numeric || !token.contains(|c: char| c.is_ascii_digit()) {
        return Ok(None);
    }

    match token.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(Some(Number::Float(value))),
        Ok(_) => bail!("number {token} at offset {offset} is out of range"),
        Err(_) => Ok(None),
    }
}
