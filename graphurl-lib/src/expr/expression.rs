use super::Number;
use crate::Result;
use core::fmt::{Display, Formatter, Result as FmtResult};
use core::str::FromStr;
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A parsed data-series expression
///
/// Trees are never mutated after construction; transformations build new trees.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricExpression {
    /// A metric path, split on `.`
    MetricRef(Vec<String>),

    /// `name(arg, ...)`
    FunctionCall { name: String, args: Vec<Self> },

    /// A double-quoted string, stored without its quotes
    StringLiteral(String),

    NumberLiteral(Number),
}

impl MetricExpression {
    /// A metric reference built from a dot-separated path
    #[must_use]
    pub fn metric(path: &str) -> Self {
        Self::MetricRef(path.split('.').map(str::to_string).collect())
    }

    /// A metric reference built from individual segments
    #[must_use]
    pub fn metric_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::MetricRef(segments.into_iter().map(Into::into).collect())
    }

    #[must_use]
    pub fn function(name: impl Into<String>, args: Vec<Self>) -> Self {
        Self::FunctionCall { name: name.into(), args }
    }

    #[must_use]
    pub fn string(value: impl Into<String>) -> Self {
        Self::StringLiteral(value.into())
    }

    /// Parse an expression from text
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a well-formed expression
    pub fn parse(text: &str) -> Result<Self> {
        super::parse(text)
    }

    /// Whether this expression names nothing at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::MetricRef(segments) => segments.iter().all(String::is_empty),
            Self::FunctionCall { name, .. } => name.is_empty(),
            Self::StringLiteral(_) | Self::NumberLiteral(_) => false,
        }
    }

    /// Split `function(inner,"value")` into its inner expression and literal value
    pub(crate) fn as_decoration(&self, function: &str) -> Option<(&Self, &str)> {
        match self {
            Self::FunctionCall { name, args } if name == function => match args.as_slice() {
                [inner, Self::StringLiteral(value)] => Some((inner, value.trim_matches('"'))),
                _ => None,
            },
            _ => None,
        }
    }
}

impl Display for MetricExpression {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::MetricRef(segments) => write!(f, "{}", segments.join(".")),
            Self::StringLiteral(value) => write!(f, "\"{}\"", value.trim_matches('"')),
            Self::NumberLiteral(number) => write!(f, "{number}"),
            Self::FunctionCall { name, args } => {
                write!(f, "{name}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ")")
            }
        }
    }
}

impl FromStr for MetricExpression {
    type Err = ohno::AppError;

    fn from_str(s: &str) -> Result<Self> {
        super::parse(s)
    }
}

impl From<Number> for MetricExpression {
    fn from(value: Number) -> Self {
        Self::NumberLiteral(value)
    }
}

impl From<i64> for MetricExpression {
    fn from(value: i64) -> Self {
        Self::NumberLiteral(Number::Int(value))
    }
}

impl From<i32> for MetricExpression {
    fn from(value: i32) -> Self {
        Self::NumberLiteral(Number::Int(value.into()))
    }
}

impl From<f64> for MetricExpression {
    fn from(value: f64) -> Self {
        Self::NumberLiteral(Number::Float(value))
    }
}

impl Serialize for MetricExpression {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MetricExpression {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        super::parse(&text).map_err(D::Error::custom)
    }
}
