use super::{GraphLinks, GraphSubject, MetricSample};
use crate::Result;
use crate::config::Config;
use crate::expr::{MetricExpression, Number};
use crate::metric::{MetricNormalizer, join, normalize, normalize_identifier};
use crate::query::{Decorations, GraphQuery, RenderMode, Style, TimeInput, format_time};
use crate::templates::{JsonTemplate, TemplateContext, parse_line_template};
use ohno::EnrichableExt;

const LOG_TARGET: &str = "    graphs";

/// Largest magnitude below which every integral `f64` is exactly an `i64`
const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

/// Builds graph links for monitored hosts and services
#[derive(Debug)]
pub struct GraphFactory<'a> {
    config: &'a Config,
    normalizer: MetricNormalizer,
    style: Style,
    start: String,
    end: String,
}

impl<'a> GraphFactory<'a> {
    /// Create a factory for graphs shown in `source` (a style name such as `default` or
    /// `dashboard`) covering `start` to `end`
    ///
    /// # Errors
    ///
    /// Returns an error if a configured rewrite rule does not compile
    pub fn new(config: &'a Config, source: &str, start: impl Into<TimeInput>, end: impl Into<TimeInput>) -> Result<Self> {
        Ok(Self {
            config,
            normalizer: MetricNormalizer::new(config.rewrite_rules()?),
            style: config.style(source),
            start: format_time(start),
            end: format_time(end),
        })
    }

    #[must_use]
    pub const fn style(&self) -> &Style {
        &self.style
    }

    #[must_use]
    pub const fn normalizer(&self) -> &MetricNormalizer {
        &self.normalizer
    }

    fn host_name(subject: &GraphSubject) -> String {
        normalize_identifier(&subject.host)
    }

    fn service_name(&self, subject: &GraphSubject) -> String {
        normalize_identifier(subject.service.as_deref().unwrap_or(&self.config.host_check))
    }

    fn new_query(&self) -> GraphQuery {
        let mut query = GraphQuery::new(&self.config.uri)
            .with_style(self.style.clone())
            .with_range(self.start.as_str(), self.end.as_str());
        query.set_timezone(self.config.tz.clone());
        query
    }

    /// One graph per metric sample, with threshold lines
    ///
    /// # Errors
    ///
    /// Returns an error if a target cannot be built
    pub fn metric_graphs(&self, subject: &GraphSubject, samples: &[MetricSample]) -> Result<Vec<GraphLinks>> {
        let host = Self::host_name(subject);
        let service = self.service_name(subject);

        if samples.is_empty() {
            log::debug!(target: LOG_TARGET, "No metrics to graph for {host}/{service}");
        }

        samples
            .iter()
            .map(|sample| -> Result<GraphLinks> {
                let mut query = self.new_query().with_title(format!("{host}/{service} - {}", sample.name));
                if sample.is_percentage() {
                    query = query.with_extrema(Some(0.0), Some(100.0));
                }

                let metric = self.metric_path(subject, &host, &service, sample);

                query.add_target(
                    MetricExpression::metric(&metric),
                    Decorations::new().with_alias(sample.name.as_str()).with_color(self.config.colors.metric.as_str()),
                )?;

                let colors = &self.config.colors;
                let thresholds = [
                    ("Warning", sample.warning, &colors.warning),
                    ("Critical", sample.critical, &colors.critical),
                    ("Min", sample.min, &colors.min),
                    ("Max", sample.max, &colors.max),
                ];

                for (label, value, color) in thresholds {
                    if let Some(value) = value {
                        query.add_target(constant_line(value), Decorations::new().with_alias(label).with_color(color.as_str()))?;
                    }
                }

                Ok(links(&query))
            })
            .collect()
    }

    /// The metric path graphed for `sample`
    ///
    /// Numbered instances (`disk_1`) graph the whole family through a `*` segment
    /// (`...disk.*`), which is added after the pipeline since normalizing would replace it.
    fn metric_path(&self, subject: &GraphSubject, host: &str, service: &str, sample: &MetricSample) -> String {
        let head = [
            subject.prefix.as_deref().unwrap_or_default(),
            subject.group.as_deref().unwrap_or_default(),
            host,
            self.config.data_source.as_deref().unwrap_or_default(),
            service,
        ];
        let postfix = subject.postfix.as_deref().unwrap_or_default();

        match sample.instance_family() {
            Some(family) => {
                let family_path = self.normalizer.metric_name(head.into_iter().chain([family]));
                join([family_path.as_str(), "*", normalize(postfix).as_str()])
            }
            None => self.normalizer.metric_name(head.into_iter().chain([sample.name.as_str(), postfix])),
        }
    }

    /// Values offered to template placeholders: `uri`, `host` and `service`
    #[must_use]
    pub fn context(&self, subject: &GraphSubject) -> TemplateContext {
        let host = normalize(&join([
            subject.prefix.as_deref().unwrap_or_default(),
            subject.group.as_deref().unwrap_or_default(),
            Self::host_name(subject).as_str(),
            self.config.data_source.as_deref().unwrap_or_default(),
        ]));

        let service = normalize(&join([
            self.service_name(subject).as_str(),
            subject.postfix.as_deref().unwrap_or_default(),
        ]));

        TemplateContext::from([
            ("uri".to_string(), self.config.base_uri()),
            ("host".to_string(), host),
            ("service".to_string(), service),
        ])
    }

    /// Graphs described by template text, JSON first and line-oriented otherwise
    ///
    /// # Errors
    ///
    /// Returns an error if the template cannot be filled or describes an invalid graph
    pub fn template_graphs(&self, subject: &GraphSubject, text: &str) -> Result<Vec<GraphLinks>> {
        let context = self.context(subject);

        let queries = match JsonTemplate::parse(text) {
            Ok(template) => template
                .fill(&context)?
                .iter()
                .map(|spec| -> Result<GraphQuery> {
                    let mut query = spec.to_query(&self.config.uri, &self.style)?.with_range(self.start.as_str(), self.end.as_str());
                    if query.timezone().is_none() {
                        query.set_timezone(self.config.tz.clone());
                    }
                    Ok(query)
                })
                .collect::<Result<Vec<_>>>()
                .map_err(|e| e.enrich("building graphs from JSON template"))?,

            Err(e) => {
                log::debug!(target: LOG_TARGET, "Treating template as line-oriented: {e}");
                parse_line_template(text, &context, &self.style)?
            }
        };

        Ok(queries.iter().map(links).collect())
    }
}

fn links(query: &GraphQuery) -> GraphLinks {
    let links = GraphLinks {
        link: query.url(RenderMode::Composer),
        img_src: query.url(RenderMode::Render),
    };
    log::debug!(target: LOG_TARGET, "Graph links: {} / {}", links.link, links.img_src);
    links
}

/// `constantLine(value)`, with integral values written without a fraction
#[expect(clippy::cast_possible_truncation, reason = "integral and within the exact i64 range")]
fn constant_line(value: f64) -> MetricExpression {
    let number = if value.fract() == 0.0 && value.abs() < MAX_EXACT_INT {
        Number::Int(value as i64)
    } else {
        Number::Float(value)
    };

    MetricExpression::function("constantLine", vec![number.into()])
}
