use crate::Result;
use core::str::FromStr;
use ohno::{IntoAppError, bail};
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

/// Numbered instances of one measurement, such as `disk_1`, `disk_2`
static INSTANCE_SUFFIX_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"_\d+$").expect("invalid regex"));

/// The monitored element a set of graphs is built for
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphSubject {
    pub host: String,

    /// `None` for host-level graphs
    pub service: Option<String>,

    /// Leading metric path segment configured for the host
    pub prefix: Option<String>,

    /// Group segment placed after the prefix
    pub group: Option<String>,

    /// Trailing metric path segment configured for the service
    pub postfix: Option<String>,
}

impl GraphSubject {
    #[must_use]
    pub fn host(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn service(host: impl Into<String>, service: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            service: Some(service.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_prefix(self, prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
            ..self
        }
    }

    #[must_use]
    pub fn with_group(self, group: impl Into<String>) -> Self {
        Self {
            group: Some(group.into()),
            ..self
        }
    }

    #[must_use]
    pub fn with_postfix(self, postfix: impl Into<String>) -> Self {
        Self {
            postfix: Some(postfix.into()),
            ..self
        }
    }
}

/// One already-extracted performance metric, with its optional thresholds
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricSample {
    pub name: String,
    pub warning: Option<f64>,
    pub critical: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,

    /// Unit of measure; `%` pins the graph's y axis to 0..100
    pub unit: Option<String>,
}

impl MetricSample {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_thresholds(self, warning: Option<f64>, critical: Option<f64>) -> Self {
        Self { warning, critical, ..self }
    }

    #[must_use]
    pub fn with_range(self, min: Option<f64>, max: Option<f64>) -> Self {
        Self { min, max, ..self }
    }

    #[must_use]
    pub fn with_unit(self, unit: impl Into<String>) -> Self {
        Self {
            unit: Some(unit.into()),
            ..self
        }
    }

    /// For a numbered instance such as `disk_1`, the name shared by every instance (`disk`)
    #[must_use]
    pub fn instance_family(&self) -> Option<&str> {
        INSTANCE_SUFFIX_REGEX
            .find(&self.name)
            .map(|suffix| &self.name[..suffix.start()])
            .filter(|family| !family.is_empty())
    }

    #[must_use]
    pub fn is_percentage(&self) -> bool {
        self.unit.as_deref() == Some("%")
    }
}

fn parse_field(field: Option<&str>, what: &str, name: &str) -> Result<Option<f64>> {
    match field.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse::<f64>()
            .map(Some)
            .into_app_err_with(|| format!("{what} for metric '{name}' must be a number, got '{value}'")),
    }
}

/// Parses `NAME[;WARN[;CRIT[;MIN[;MAX[;UNIT]]]]]`; empty fields are unset
impl FromStr for MetricSample {
    type Err = ohno::AppError;

    fn from_str(s: &str) -> Result<Self> {
        let mut fields = s.split(';');
        let name = fields.next().unwrap_or_default().trim();
        if name.is_empty() {
            bail!("a metric name is required in '{s}'");
        }

        let sample = Self {
            name: name.to_string(),
            warning: parse_field(fields.next(), "warning", name)?,
            critical: parse_field(fields.next(), "critical", name)?,
            min: parse_field(fields.next(), "min", name)?,
            max: parse_field(fields.next(), "max", name)?,
            unit: fields.next().map(str::trim).filter(|unit| !unit.is_empty()).map(str::to_string),
        };

        if fields.next().is_some() {
            bail!("too many fields in metric '{s}'");
        }

        Ok(sample)
    }
}

/// The two URLs produced for each graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphLinks {
    /// Composer page for interactive editing
    pub link: String,

    /// Rendered image
    pub img_src: String,
}
