use crate::Result;
use crate::query::{Decorations, GraphQuery, Style, TargetAttributes};
use core::num::NonZeroU32;
use serde::{Deserialize, Serialize};

/// One graph as described by a filled JSON template
///
/// Unset style fields fall back to the style the graph is rendered with. Keys other than
/// the fields below are ignored, so templates may carry settings for other tools.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphSpec {
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub min: Option<f64>,

    #[serde(default)]
    pub max: Option<f64>,

    #[serde(default)]
    pub width: Option<NonZeroU32>,

    #[serde(default)]
    pub height: Option<NonZeroU32>,

    #[serde(default)]
    pub font_size: Option<NonZeroU32>,

    #[serde(default)]
    pub line_style: Option<String>,

    #[serde(default)]
    pub tz: Option<String>,

    #[serde(default)]
    pub targets: Vec<TargetAttributes>,
}

impl GraphSpec {
    /// Build a query for `server`, starting from `style`
    ///
    /// # Errors
    ///
    /// Returns an error if any target cannot be built
    pub fn to_query(&self, server: &str, style: &Style) -> Result<GraphQuery> {
        let mut style = style.clone();
        if let Some(width) = self.width {
            style.width = width;
        }
        if let Some(height) = self.height {
            style.height = height;
        }
        if let Some(font_size) = self.font_size {
            style.font_size = font_size;
        }
        if let Some(line_style) = &self.line_style {
            style.line_style = Some(line_style.clone());
        }

        let mut query = GraphQuery::new(server).with_style(style).with_extrema(self.min, self.max);
        query.set_title(self.title.clone());
        query.set_timezone(self.tz.clone());

        for target in &self.targets {
            query.add_target(target.clone(), Decorations::new())?;
        }

        Ok(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::RenderMode;

    #[test]
    fn test_to_query_overrides_style() {
        let spec = GraphSpec {
            title: Some("Disk".into()),
            height: NonZeroU32::new(100),
            line_style: Some("staircase".into()),
            max: Some(100.0),
            targets: vec![TargetAttributes {
                target: "web01.disk.used".into(),
                alias: Some("Used".into()),
                color: None,
            }],
            ..GraphSpec::default()
        };

        let base = Style::default().with_foreground("white");
        let query = spec.to_query("http://g", &base).unwrap();

        assert_eq!(query.style().width, base.width);
        assert_eq!(query.style().height.get(), 100);
        assert_eq!(query.style().line_style.as_deref(), Some("staircase"));
        assert_eq!(query.style().foreground.as_deref(), Some("white"));
        assert_eq!(query.title(), Some("Disk"));
        assert_eq!(query.max(), Some(100.0));
        assert!(query.url(RenderMode::Render).ends_with(r#"&yMax=100&target=alias(web01.disk.used,"Used")"#));
    }

    #[test]
    fn test_empty_target_is_an_error() {
        let spec = GraphSpec {
            targets: vec![TargetAttributes::default()],
            ..GraphSpec::default()
        };
        let _ = spec.to_query("", &Style::default()).unwrap_err();
    }

    #[test]
    fn test_zero_dimension_is_rejected() {
        let result: Result<GraphSpec, _> = serde_json::from_str(r#"{"width": 0}"#);
        let _ = result.unwrap_err();
    }
}
