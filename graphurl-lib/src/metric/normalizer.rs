use super::{RewriteRules, join, normalize};

/// Runs metric path segments through the canonical join, normalize, rewrite pipeline
#[derive(Debug, Clone, Default)]
pub struct MetricNormalizer {
    rules: RewriteRules,
}

impl MetricNormalizer {
    #[must_use]
    pub const fn new(rules: RewriteRules) -> Self {
        Self { rules }
    }

    #[must_use]
    pub const fn rules(&self) -> &RewriteRules {
        &self.rules
    }

    /// Build a metric name from raw path segments
    #[must_use]
    pub fn metric_name<I, S>(&self, segments: I) -> String
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.rules.rewrite(&normalize(&join(segments)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_without_rules() {
        let normalizer = MetricNormalizer::default();
        assert_eq!(normalizer.metric_name(["", "web 01", "Load", "load1"]), "web_01.Load.load1");
    }

    #[test]
    fn test_rules_see_sanitized_input() {
        let rules = RewriteRules::new();
        rules.add_rule(r"^web_01\.", "frontend.").unwrap();
        let normalizer = MetricNormalizer::new(rules);

        assert_eq!(normalizer.metric_name(["web 01", "cpu"]), "frontend.cpu");
        assert_eq!(normalizer.rules().len(), 1);
    }

    #[test]
    fn test_rules_see_joined_input() {
        let rules = RewriteRules::new();
        rules.add_rule(r"\.__HOST__\.", ".").unwrap();
        let normalizer = MetricNormalizer::new(rules);

        assert_eq!(normalizer.metric_name(["host", "__HOST__", "rta"]), "host.rta");
    }
}
