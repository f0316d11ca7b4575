use crate::Result;
use crate::metric::{RewriteRule, RewriteRules};
use crate::query::Style;
use camino::{Utf8Path, Utf8PathBuf};
use ohno::{IntoAppError, app_err};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io;

const LOG_TARGET: &str = "    config";

/// Name of the configuration file looked up when no explicit path is given
pub const CONFIG_FILE_NAME: &str = "graphurl.toml";

/// The style every configuration must define
pub const DEFAULT_STYLE: &str = "default";

/// The default configuration TOML content, embedded from `default_config.toml`
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../default_config.toml");

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Base URI of the graphing backend
    pub uri: String,

    /// Timezone passed to the backend as `tz`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tz: Option<String>,

    /// Sub-folder segment inserted after the host name in metric paths
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_source: Option<String>,

    /// Service segment used for host-level graphs
    #[serde(default = "default_host_check")]
    pub host_check: String,

    #[serde(default)]
    pub colors: Colors,

    /// Named styles; must contain `default`
    #[serde(default)]
    pub styles: BTreeMap<String, Style>,

    /// Rewrite rules, applied in file order
    #[serde(default)]
    pub rewrite: Vec<RewriteEntry>,
}

/// Series colors used for generated graphs
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Colors {
    pub metric: String,
    pub warning: String,
    pub critical: String,
    pub min: String,
    pub max: String,
}

impl Default for Colors {
    fn default() -> Self {
        Self {
            metric: "green".into(),
            warning: "orange".into(),
            critical: "red".into(),
            min: "blue".into(),
            max: "black".into(),
        }
    }
}

/// One `[[rewrite]]` entry
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RewriteEntry {
    pub pattern: String,

    #[serde(default)]
    pub replacement: String,
}

fn default_host_check() -> String {
    "__HOST__".into()
}

impl Config {
    /// Load configuration from a file or use defaults
    ///
    /// Without an explicit path, `graphurl.toml` in `base_dir` is used if it exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated
    pub fn load(base_dir: &Utf8Path, config_path: Option<&Utf8PathBuf>) -> Result<Self> {
        let (final_path, text) = if let Some(path) = config_path {
            let text = fs::read_to_string(path).into_app_err_with(|| format!("reading graphurl configuration file '{path}'"))?;
            (path.clone(), text)
        } else {
            let path = base_dir.join(CONFIG_FILE_NAME);
            match fs::read_to_string(&path) {
                Ok(text) => (path, text),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    log::debug!(target: LOG_TARGET, "No '{path}' found, using the default configuration");
                    return Ok(Self::default());
                }
                Err(e) => return Err(e).into_app_err_with(|| format!("reading graphurl configuration file '{path}'")),
            }
        };

        let config: Self = toml::from_str(&text).into_app_err_with(|| format!("parsing configuration file '{final_path}'"))?;
        config.validate()?;

        log::debug!(target: LOG_TARGET, "Loaded configuration from '{final_path}'");
        Ok(config)
    }

    /// Save the default configuration to a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written
    pub fn save_default(output_path: &Utf8Path) -> Result<()> {
        fs::write(output_path, DEFAULT_CONFIG_TOML).into_app_err_with(|| format!("writing default configuration to {output_path}"))?;
        Ok(())
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns an error if `uri` is empty, the `default` style is missing, or a rewrite
    /// pattern does not compile
    pub fn validate(&self) -> Result<()> {
        if self.uri.trim().is_empty() {
            return Err(app_err!("uri must not be empty"));
        }

        if !self.styles.contains_key(DEFAULT_STYLE) {
            return Err(app_err!("styles must define a '{DEFAULT_STYLE}' style"));
        }

        let _ = self.rewrite_rules()?;
        Ok(())
    }

    /// Build the rewrite registry, in file order
    ///
    /// # Errors
    ///
    /// Returns an error if a pattern does not compile
    pub fn rewrite_rules(&self) -> Result<RewriteRules> {
        self.rewrite
            .iter()
            .map(|entry| RewriteRule::new(&entry.pattern, &entry.replacement))
            .collect::<Result<RewriteRules>>()
    }

    /// Look up a named style, falling back to `default`
    #[must_use]
    pub fn style(&self, name: &str) -> Style {
        if let Some(style) = self.styles.get(name) {
            return style.clone();
        }

        log::warn!(target: LOG_TARGET, "No style '{name}', falling back to '{DEFAULT_STYLE}'");
        self.styles.get(DEFAULT_STYLE).cloned().unwrap_or_default()
    }

    /// The backend URI with exactly one trailing slash, as offered to templates
    #[must_use]
    pub fn base_uri(&self) -> String {
        format!("{}/", self.uri.trim().trim_end_matches('/'))
    }
}

impl Default for Config {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG_TOML).expect("default_config.toml should be valid TOML that deserializes to Config")
    }
}
