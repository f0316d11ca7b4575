use super::encoding::encode_value;
use crate::Result;
use core::fmt::{Display, Formatter, Result as FmtResult};
use core::num::NonZeroU32;
use ohno::{IntoAppError, app_err};
use serde::{Deserialize, Serialize};

const DEFAULT_WIDTH: NonZeroU32 = NonZeroU32::new(586).expect("non-zero");
const DEFAULT_HEIGHT: NonZeroU32 = NonZeroU32::new(308).expect("non-zero");
const DEFAULT_FONT_SIZE: NonZeroU32 = NonZeroU32::new(8).expect("non-zero");

/// Visual rendering parameters attached to a graph query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Style {
    #[serde(default = "default_width")]
    pub width: NonZeroU32,

    #[serde(default = "default_height")]
    pub height: NonZeroU32,

    #[serde(default = "default_font_size")]
    pub font_size: NonZeroU32,

    /// Rendered as `lineMode` (e.g. `connected`, `staircase`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_style: Option<String>,

    /// Rendered as `fgcolor`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreground: Option<String>,

    /// Rendered as `bgcolor`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,

    /// Rendered as `areaMode`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area_mode: Option<String>,
}

const fn default_width() -> NonZeroU32 {
    DEFAULT_WIDTH
}

const fn default_height() -> NonZeroU32 {
    DEFAULT_HEIGHT
}

const fn default_font_size() -> NonZeroU32 {
    DEFAULT_FONT_SIZE
}

impl Style {
    /// Create a style with the given dimensions
    ///
    /// # Errors
    ///
    /// Returns an error if any dimension is zero
    pub fn new(width: u32, height: u32, font_size: u32) -> Result<Self> {
        Ok(Self {
            width: NonZeroU32::new(width).ok_or_else(|| app_err!("width must be a positive integer, got {width}"))?,
            height: NonZeroU32::new(height).ok_or_else(|| app_err!("height must be a positive integer, got {height}"))?,
            font_size: NonZeroU32::new(font_size).ok_or_else(|| app_err!("font size must be a positive integer, got {font_size}"))?,
            ..Self::default()
        })
    }

    /// Create a style from textual dimensions
    ///
    /// # Errors
    ///
    /// Returns an error if any value is not a positive integer
    pub fn parse(width: &str, height: &str, font_size: &str) -> Result<Self> {
        Ok(Self {
            width: Self::parse_dimension("width", width)?,
            height: Self::parse_dimension("height", height)?,
            font_size: Self::parse_dimension("font size", font_size)?,
            ..Self::default()
        })
    }

    /// Parse a single dimension
    ///
    /// # Errors
    ///
    /// Returns an error if `value` is not a positive integer
    pub fn parse_dimension(name: &str, value: &str) -> Result<NonZeroU32> {
        value
            .trim()
            .parse::<NonZeroU32>()
            .into_app_err_with(|| format!("{name} must be a positive integer, got '{value}'"))
    }

    #[must_use]
    pub fn with_line_style(self, line_style: impl Into<String>) -> Self {
        Self {
            line_style: Some(line_style.into()),
            ..self
        }
    }

    #[must_use]
    pub fn with_foreground(self, foreground: impl Into<String>) -> Self {
        Self {
            foreground: Some(foreground.into()),
            ..self
        }
    }

    #[must_use]
    pub fn with_background(self, background: impl Into<String>) -> Self {
        Self {
            background: Some(background.into()),
            ..self
        }
    }

    #[must_use]
    pub fn with_area_mode(self, area_mode: impl Into<String>) -> Self {
        Self {
            area_mode: Some(area_mode.into()),
            ..self
        }
    }
}

impl Default for Style {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            font_size: DEFAULT_FONT_SIZE,
            line_style: None,
            foreground: None,
            background: None,
            area_mode: None,
        }
    }
}

/// Renders the style as query parameters
impl Display for Style {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "width={}&height={}&fontSize={}", self.width, self.height, self.font_size)?;

        let optional = [
            ("lineMode", &self.line_style),
            ("fgcolor", &self.foreground),
            ("bgcolor", &self.background),
            ("areaMode", &self.area_mode),
        ];

        for (key, value) in optional {
            if let Some(value) = value {
                write!(f, "&{key}={}", encode_value(value))?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn query_pairs(style: &Style) -> BTreeMap<String, String> {
        url::form_urlencoded::parse(style.to_string().as_bytes()).into_owned().collect()
    }

    fn pairs(expected: &[(&str, &str)]) -> BTreeMap<String, String> {
        expected.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect()
    }

    #[test]
    fn test_default() {
        let style = Style::default();
        assert_eq!(style.to_string(), "width=586&height=308&fontSize=8");
        assert_eq!(query_pairs(&style), pairs(&[("width", "586"), ("height", "308"), ("fontSize", "8")]));
    }

    #[test]
    fn test_width() {
        let style = Style::new(10, 308, 8).unwrap();
        assert_eq!(query_pairs(&style), pairs(&[("width", "10"), ("height", "308"), ("fontSize", "8")]));

        let err = Style::parse("test", "308", "8").unwrap_err();
        assert!(err.to_string().contains("width must be a positive integer"));
    }

    #[test]
    fn test_height() {
        let style = Style::new(586, 7, 8).unwrap();
        assert_eq!(query_pairs(&style), pairs(&[("width", "586"), ("height", "7"), ("fontSize", "8")]));
        let _ = Style::parse("586", "test", "8").unwrap_err();
    }

    #[test]
    fn test_font() {
        let style = Style::parse("586", "308", "16").unwrap();
        assert_eq!(query_pairs(&style), pairs(&[("width", "586"), ("height", "308"), ("fontSize", "16")]));
        let _ = Style::parse("586", "308", "test").unwrap_err();
    }

    #[test]
    fn test_zero_is_rejected() {
        let _ = Style::new(0, 308, 8).unwrap_err();
        let _ = Style::parse("586", "0", "8").unwrap_err();
    }

    #[test]
    fn test_line_style() {
        let style = Style::default().with_line_style("connected");
        assert_eq!(
            query_pairs(&style),
            pairs(&[("width", "586"), ("height", "308"), ("fontSize", "8"), ("lineMode", "connected")])
        );
    }

    #[test]
    fn test_colors_and_area_mode() {
        let style = Style::default()
            .with_foreground("#ffffff")
            .with_background("black")
            .with_area_mode("stacked");
        assert_eq!(
            style.to_string(),
            "width=586&height=308&fontSize=8&fgcolor=%23ffffff&bgcolor=black&areaMode=stacked"
        );
    }

    #[test]
    fn test_deserialize_defaults() {
        let style: Style = toml::from_str("font_size = 18").unwrap();
        assert_eq!(style.width.get(), 586);
        assert_eq!(style.height.get(), 308);
        assert_eq!(style.font_size.get(), 18);
    }

    #[test]
    fn test_deserialize_rejects_zero() {
        let result: Result<Style, _> = toml::from_str("width = 0");
        let _ = result.unwrap_err();
    }
}
