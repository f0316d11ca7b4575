use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use std::borrow::Cow;

/// Characters that would break a `key=value` pair inside a query string
const QUERY_VALUE: &AsciiSet = &CONTROLS.add(b' ').add(b'#').add(b'%').add(b'&').add(b'+');

/// Percent-encode a free-text query value
///
/// Expressions keep their quotes, parentheses and commas readable; only the characters
/// that would change how the query string splits are escaped.
pub fn encode_value(value: &str) -> Cow<'_, str> {
    utf8_percent_encode(value, QUERY_VALUE).into()
}
