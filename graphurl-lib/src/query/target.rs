use crate::Result;
use crate::expr::MetricExpression;
use core::fmt::{Display, Formatter, Result as FmtResult};
use ohno::bail;
use serde::{Deserialize, Serialize};

const ALIAS: &str = "alias";
const COLOR: &str = "color";

/// One series of a graph: an expression with optional display decorations
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Target {
    expression: MetricExpression,

    #[serde(skip_serializing_if = "Option::is_none")]
    alias: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    color: Option<String>,
}

/// Optional `alias` and `color` applied to a target
///
/// Empty strings count as unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Decorations {
    pub alias: Option<String>,
    pub color: Option<String>,
}

impl Decorations {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_alias(self, alias: impl Into<String>) -> Self {
        Self {
            alias: Some(alias.into()),
            ..self
        }
    }

    #[must_use]
    pub fn with_color(self, color: impl Into<String>) -> Self {
        Self {
            color: Some(color.into()),
            ..self
        }
    }
}

/// A flat attribute mapping describing a target, as found in graph templates
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetAttributes {
    #[serde(default)]
    pub target: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// The shapes a target can be built from
#[derive(Debug, Clone)]
pub enum TargetInput {
    /// Raw expression text, parsed on construction
    Text(String),

    /// An expression tree, used as-is
    Expression(MetricExpression),

    /// An existing target, copied
    Target(Target),

    /// An attribute mapping whose `target` entry is expression text
    Attributes(TargetAttributes),
}

impl From<&str> for TargetInput {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for TargetInput {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<MetricExpression> for TargetInput {
    fn from(value: MetricExpression) -> Self {
        Self::Expression(value)
    }
}

impl From<Target> for TargetInput {
    fn from(value: Target) -> Self {
        Self::Target(value)
    }
}

impl From<TargetAttributes> for TargetInput {
    fn from(value: TargetAttributes) -> Self {
        Self::Attributes(value)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn check_literal(kind: &str, value: Option<&str>) -> Result<()> {
    if let Some(value) = value
        && value.contains('"')
    {
        bail!("{kind} '{value}' must not contain a double quote");
    }
    Ok(())
}

impl Target {
    /// Create an undecorated target from an expression tree
    ///
    /// # Errors
    ///
    /// Returns an error if the expression is empty
    pub fn new(expression: MetricExpression) -> Result<Self> {
        if expression.is_empty() {
            bail!("a target expression is required");
        }

        Ok(Self {
            expression,
            alias: None,
            color: None,
        })
    }

    /// Create an undecorated target from expression text
    ///
    /// # Errors
    ///
    /// Returns an error if the text is empty or is not a well-formed expression
    pub fn parse(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            bail!("a target expression is required");
        }

        Self::new(MetricExpression::parse(text)?)
    }

    /// Build a target from any supported input shape
    ///
    /// Decorations given here take precedence over those carried by the input.
    ///
    /// # Errors
    ///
    /// Returns an error if the resolved expression is empty or cannot be parsed, or a
    /// decoration contains a double quote
    pub fn build(input: impl Into<TargetInput>, decorations: Decorations) -> Result<Self> {
        match input.into() {
            TargetInput::Text(text) => Self::parse(&text)?.decorated(decorations),
            TargetInput::Expression(expression) => Self::new(expression)?.decorated(decorations),
            TargetInput::Target(target) => Self::with_overrides(&target, decorations),
            TargetInput::Attributes(attributes) => {
                let decorations = Decorations {
                    alias: non_empty(decorations.alias).or(attributes.alias),
                    color: non_empty(decorations.color).or(attributes.color),
                };
                Self::parse(&attributes.target)?.decorated(decorations)
            }
        }
    }

    /// Copy `base`, replacing any decoration that is supplied in `overrides`
    ///
    /// # Errors
    ///
    /// Returns an error if a supplied decoration contains a double quote, which string
    /// literals cannot carry
    pub fn with_overrides(base: &Self, overrides: Decorations) -> Result<Self> {
        let alias = non_empty(overrides.alias).or_else(|| base.alias.clone());
        let color = non_empty(overrides.color).or_else(|| base.color.clone());
        check_literal(ALIAS, alias.as_deref())?;
        check_literal(COLOR, color.as_deref())?;

        Ok(Self {
            expression: base.expression.clone(),
            alias,
            color,
        })
    }

    /// Recover a decorated target from a full series expression
    ///
    /// An outer `alias(...,"name")` and then an inner `color(...,"value")` are lifted into
    /// the decoration fields. The result serializes to the same text as `expression`.
    ///
    /// # Errors
    ///
    /// Returns an error if the remaining expression is empty
    pub fn decompose(expression: MetricExpression) -> Result<Self> {
        let mut current = &expression;
        let mut alias = None;
        let mut color = None;

        if let Some((inner, value)) = current.as_decoration(ALIAS)
            && !value.is_empty()
        {
            alias = Some(value.to_string());
            current = inner;
        }

        if let Some((inner, value)) = current.as_decoration(COLOR)
            && !value.is_empty()
        {
            color = Some(value.to_string());
            current = inner;
        }

        Self::new(current.clone())?.decorated(Decorations { alias, color })
    }

    /// # Errors
    ///
    /// Returns an error if `alias` contains a double quote
    pub fn with_alias(self, alias: impl Into<String>) -> Result<Self> {
        self.decorated(Decorations::new().with_alias(alias))
    }

    /// # Errors
    ///
    /// Returns an error if `color` contains a double quote
    pub fn with_color(self, color: impl Into<String>) -> Result<Self> {
        self.decorated(Decorations::new().with_color(color))
    }

    fn decorated(self, decorations: Decorations) -> Result<Self> {
        Self::with_overrides(&self, decorations)
    }

    #[must_use]
    pub const fn expression(&self) -> &MetricExpression {
        &self.expression
    }

    #[must_use]
    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    #[must_use]
    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    /// The full series expression, with color as the inner wrap and alias as the outer one
    #[must_use]
    pub fn to_expression(&self) -> MetricExpression {
        let mut expression = self.expression.clone();

        if let Some(color) = &self.color {
            expression = MetricExpression::function(COLOR, vec![expression, MetricExpression::string(color.as_str())]);
        }

        if let Some(alias) = &self.alias {
            expression = MetricExpression::function(ALIAS, vec![expression, MetricExpression::string(alias.as_str())]);
        }

        expression
    }
}

impl Display for Target {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.to_expression())
    }
}
