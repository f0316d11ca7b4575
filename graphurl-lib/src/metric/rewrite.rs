use crate::Result;
use ohno::IntoAppError;
use regex::Regex;
use std::sync::{PoisonError, RwLock};

const LOG_TARGET: &str = "   rewrite";

/// A regular-expression substitution applied to metric names
///
/// Replacement templates refer to capture groups with backslash references: `\1`,
/// `\g<1>` or `\g<name>`. `\\` produces a single backslash; every other character,
/// including `$`, is literal.
#[derive(Debug, Clone)]
pub struct RewriteRule {
    pattern: Regex,
    replacement: String,
    expanded: String,
}

impl RewriteRule {
    /// Compile a rule
    ///
    /// # Errors
    ///
    /// Returns an error if `pattern` is not a valid regular expression
    pub fn new(pattern: &str, replacement: &str) -> Result<Self> {
        let regex = Regex::new(pattern).into_app_err_with(|| format!("invalid rewrite pattern '{pattern}'"))?;

        Ok(Self {
            pattern: regex,
            replacement: replacement.to_string(),
            expanded: expand_template(replacement),
        })
    }

    #[must_use]
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    #[must_use]
    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    /// Replace every match of the pattern in `name`
    #[must_use]
    pub fn apply(&self, name: &str) -> String {
        self.pattern.replace_all(name, self.expanded.as_str()).into_owned()
    }
}

/// Translate a backslash-style template into the `regex` crate's `$` syntax
fn expand_template(template: &str) -> String {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '$' => out.push_str("$$"),
            '\\' => match chars.peek().copied() {
                Some(d) if d.is_ascii_digit() => {
                    let mut group = String::new();
                    while let Some(d) = chars.peek().copied().filter(char::is_ascii_digit) {
                        group.push(d);
                        let _ = chars.next();
                    }
                    out.push_str(&format!("${{{group}}}"));
                }
                Some('g') => {
                    let _ = chars.next();
                    if chars.peek() == Some(&'<') {
                        let _ = chars.next();
                        let mut group = String::new();
                        let mut closed = false;
                        for g in chars.by_ref() {
                            if g == '>' {
                                closed = true;
                                break;
                            }
                            group.push(g);
                        }

                        if closed {
                            out.push_str(&format!("${{{group}}}"));
                        } else {
                            out.push_str("\\g<");
                            out.push_str(&group.replace('$', "$$"));
                        }
                    } else {
                        out.push_str("\\g");
                    }
                }
                Some('\\') => {
                    let _ = chars.next();
                    out.push('\\');
                }
                _ => out.push('\\'),
            },
            _ => out.push(c),
        }
    }

    out
}

/// Ordered registry of rewrite rules
///
/// Rules are only ever appended. They are expected to be registered during configuration,
/// before the first call to [`RewriteRules::rewrite`].
#[derive(Debug, Default)]
pub struct RewriteRules {
    rules: RwLock<Vec<RewriteRule>>,
}

impl RewriteRules {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile `pattern` and append the rule to the registry
    ///
    /// # Errors
    ///
    /// Returns an error if `pattern` is not a valid regular expression
    pub fn add_rule(&self, pattern: &str, replacement: &str) -> Result<()> {
        let rule = RewriteRule::new(pattern, replacement)?;
        log::debug!(target: LOG_TARGET, "Registering rewrite rule '{pattern}' -> '{replacement}'");
        self.push(rule);
        Ok(())
    }

    /// Append an already compiled rule
    pub fn push(&self, rule: RewriteRule) {
        self.rules.write().unwrap_or_else(PoisonError::into_inner).push(rule);
    }

    /// Run `name` through every rule in registration order
    #[must_use]
    pub fn rewrite(&self, name: &str) -> String {
        let rules = self.rules.read().unwrap_or_else(PoisonError::into_inner);
        let result = rules.iter().fold(name.to_string(), |current, rule| rule.apply(&current));

        if result != name {
            log::debug!(target: LOG_TARGET, "Rewrote '{name}' to '{result}'");
        }

        result
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Clone for RewriteRules {
    fn clone(&self) -> Self {
        let rules = self.rules.read().unwrap_or_else(PoisonError::into_inner).clone();
        Self { rules: RwLock::new(rules) }
    }
}

impl FromIterator<RewriteRule> for RewriteRules {
    fn from_iter<T: IntoIterator<Item = RewriteRule>>(iter: T) -> Self {
        Self {
            rules: RwLock::new(iter.into_iter().collect()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_no_rules_is_identity() {
        let rules = RewriteRules::new();
        assert!(rules.is_empty());
        assert_eq!(rules.rewrite("x_sum"), "x_sum");
    }

    #[test]
    fn test_rules_apply_in_order() {
        let rules = RewriteRules::new();
        rules.add_rule("_sum$", "").unwrap();
        assert_eq!(rules.rewrite("x_sum"), "x");
        assert_eq!(rules.rewrite("x"), "x");

        rules.add_rule("^(world)", r"hello.\1").unwrap();
        assert_eq!(rules.rewrite("worldx_sum"), "hello.worldx");
        assert_eq!(rules.len(), 2);
    }

    #[test]
    fn test_output_feeds_next_rule() {
        let rules = RewriteRules::new();
        rules.add_rule("^a", "b").unwrap();
        rules.add_rule("^b", "c").unwrap();
        assert_eq!(rules.rewrite("a.x"), "c.x");
    }

    #[test]
    fn test_replaces_every_match() {
        let rules = RewriteRules::new();
        rules.add_rule("-", "_").unwrap();
        assert_eq!(rules.rewrite("a-b-c"), "a_b_c");
    }

    #[test]
    fn test_invalid_pattern() {
        let rules = RewriteRules::new();
        let err = rules.add_rule("(unclosed", "").unwrap_err();
        assert!(err.to_string().contains("invalid rewrite pattern"));
        assert!(rules.is_empty());
    }

    #[test]
    fn test_named_group_reference() {
        let rule = RewriteRule::new(r"^(?P<site>[a-z]+)\.", r"dc.\g<site>.").unwrap();
        assert_eq!(rule.apply("paris.web01"), "dc.paris.web01");
        assert_eq!(rule.pattern(), r"^(?P<site>[a-z]+)\.");
        assert_eq!(rule.replacement(), r"dc.\g<site>.");
    }

    #[test]
    fn test_numbered_group_with_angle_brackets() {
        let rule = RewriteRule::new("^(a)(b)", r"\g<2>\g<1>0").unwrap();
        assert_eq!(rule.apply("abc"), "ba0c");
    }

    #[test]
    fn test_dollar_is_literal() {
        let rule = RewriteRule::new("x", "$1").unwrap();
        assert_eq!(rule.apply("axb"), "a$1b");
    }

    #[test]
    fn test_expand_template() {
        assert_eq!(expand_template(r"hello.\1"), "hello.${1}");
        assert_eq!(expand_template(r"\12x"), "${12}x");
        assert_eq!(expand_template(r"a\\b"), r"a\b");
        assert_eq!(expand_template(r"\gx"), r"\gx");
        assert_eq!(expand_template(r"\g<open"), r"\g<open");
        assert_eq!(expand_template("cost$"), "cost$$");
    }

    #[test]
    fn test_clone_is_independent() {
        let rules = RewriteRules::new();
        rules.add_rule("a", "b").unwrap();
        let copy = rules.clone();
        rules.add_rule("b", "c").unwrap();
        assert_eq!(copy.len(), 1);
        assert_eq!(copy.rewrite("a"), "b");
        assert_eq!(rules.rewrite("a"), "c");
    }

    #[test]
    fn test_concurrent_readers() {
        let rules = Arc::new(RewriteRules::new());
        rules.add_rule("_sum$", "").unwrap();

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let rules = Arc::clone(&rules);
                thread::spawn(move || rules.rewrite(&format!("host{i}_sum")))
            })
            .collect();

        for (i, handle) in handles.into_iter().enumerate() {
            assert_eq!(handle.join().unwrap(), format!("host{i}"));
        }
    }

    #[test]
    fn test_rewrite_races_with_add_rule() {
        const RULES: usize = 50;

        // Rule `i` appends `.r{i}`, so the output under the first `k` rules is unique to `k`.
        let expected: Vec<String> = (0..=RULES)
            .map(|k| (0..k).fold("n".to_string(), |name, i| format!("{name}.r{i}")))
            .collect();

        let rules = Arc::new(RewriteRules::new());

        let writer = {
            let rules = Arc::clone(&rules);
            thread::spawn(move || {
                for i in 0..RULES {
                    rules.add_rule("$", &format!(".r{i}")).unwrap();
                }
            })
        };

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let rules = Arc::clone(&rules);
                thread::spawn(move || (0..200).map(|_| rules.rewrite("n")).collect::<Vec<_>>())
            })
            .collect();

        writer.join().unwrap();

        for reader in readers {
            let seen: Vec<usize> = reader
                .join()
                .unwrap()
                .iter()
                .map(|result| expected.iter().position(|e| e == result).unwrap())
                .collect();
            assert!(seen.windows(2).all(|pair| pair[0] <= pair[1]), "rule sets went backwards: {seen:?}");
        }

        assert_eq!(rules.rewrite("n"), expected[RULES]);
    }

    #[test]
    fn test_from_iterator() {
        let rules: RewriteRules = [RewriteRule::new("a", "b").unwrap(), RewriteRule::new("b", "c").unwrap()]
            .into_iter()
            .collect();
        assert_eq!(rules.rewrite("a"), "c");
    }
}
