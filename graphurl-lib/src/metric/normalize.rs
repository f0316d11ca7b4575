const SEPARATOR: char = '.';

const fn is_path_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-')
}

/// Replace every character that is not legal in a metric path with `_`
///
/// Dots are path separators and pass through unchanged.
#[must_use]
pub fn normalize(name: &str) -> String {
    name.chars().map(|c| if is_path_char(c) { c } else { '_' }).collect()
}

/// Like [`normalize`], but dots are replaced too
///
/// Used for standalone host and service identifiers, which must never introduce extra
/// path segments.
#[must_use]
pub fn normalize_identifier(name: &str) -> String {
    name.chars()
        .map(|c| if is_path_char(c) && c != SEPARATOR { c } else { '_' })
        .collect()
}

/// Join path segments with `.`, skipping empty ones
///
/// Segments that already contain dots are kept as they are.
#[must_use]
pub fn join<I, S>(segments: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut result = String::new();
    for segment in segments {
        let segment = segment.as_ref();
        if segment.is_empty() {
            continue;
        }

        if !result.is_empty() {
            result.push(SEPARATOR);
        }
        result.push_str(segment);
    }

    result
}
