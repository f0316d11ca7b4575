use super::Host;
use super::common::ConfigArgs;
use crate::Result;
use std::io::Write;

/// Validate a configuration file by loading it, checking its values and compiling its rewrite rules
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded or is invalid
pub fn validate_config<H: Host>(host: &mut H, args: &ConfigArgs) -> Result<()> {
    match args.load() {
        Ok(config) => {
            let mut output = host.output();
            let _ = writeln!(output, "Configuration file is valid");
            if let Some(path) = &args.config {
                let _ = writeln!(output, "Config file: {path}");
            } else {
                let _ = writeln!(output, "Using configuration from the current directory or the built-in default");
            }
            let _ = writeln!(output, "{} style(s), {} rewrite rule(s)", config.styles.len(), config.rewrite.len());
            Ok(())
        }
        Err(e) => {
            let _ = writeln!(host.error(), "❌ Configuration validation failed: {e}");
            host.exit(1);
            Err(e)
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::commands::host::TestHost;
    use crate::commands::init::{InitArgs, init_config};
    use camino::Utf8PathBuf;

    fn write_config(dir: &tempfile::TempDir, name: &str, text: &str) -> Utf8PathBuf {
        let path = Utf8PathBuf::try_from(dir.path().join(name)).unwrap();
        std::fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn test_default_config_is_valid() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = Utf8PathBuf::try_from(temp_dir.path().join("graphurl.toml")).unwrap();

        let mut init_host = TestHost::new();
        init_config(&mut init_host, &InitArgs { output: Some(config_path.clone()) }).unwrap();
        assert!(init_host.output_str().contains("Generated default configuration file"));

        let mut host = TestHost::new();
        validate_config(&mut host, &ConfigArgs { config: Some(config_path) }).unwrap();
        let output = host.output_str();
        assert!(output.contains("Configuration file is valid"));
        assert!(output.contains("2 style(s), 0 rewrite rule(s)"));
        assert!(host.exit_code.is_none());
    }

    #[test]
    fn test_invalid_toml_syntax() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = write_config(&temp_dir, "invalid.toml", "[[rewrite]\npattern = \"x\"\n");

        let mut host = TestHost::new();
        let _ = validate_config(&mut host, &ConfigArgs { config: Some(config_path) }).unwrap_err();
        assert!(host.error_str().contains("Configuration validation failed"));
        assert_eq!(host.exit_code, Some(1));
    }

    #[test]
    fn test_unknown_field() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = write_config(&temp_dir, "unknown.toml", "uri = \"http://g\"\nunknown_field = 1\n[styles.default]\n");

        let mut host = TestHost::new();
        let _ = validate_config(&mut host, &ConfigArgs { config: Some(config_path) }).unwrap_err();
        assert_eq!(host.exit_code, Some(1));
    }

    #[test]
    fn test_invalid_rewrite_pattern() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = write_config(
            &temp_dir,
            "rewrite.toml",
            "uri = \"http://g\"\n[styles.default]\n[[rewrite]]\npattern = \"(unclosed\"\nreplacement = \"\"\n",
        );

        let mut host = TestHost::new();
        let err = validate_config(&mut host, &ConfigArgs { config: Some(config_path) }).unwrap_err();
        assert!(format!("{err:#}").contains("(unclosed"));
    }

    #[test]
    fn test_missing_default_style() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = write_config(&temp_dir, "styles.toml", "uri = \"http://g\"\n[styles.dashboard]\nfont_size = 18\n");

        let mut host = TestHost::new();
        let _ = validate_config(&mut host, &ConfigArgs { config: Some(config_path) }).unwrap_err();
        assert!(host.error_str().contains("'default' style"));
    }

    #[test]
    fn test_missing_file() {
        let mut host = TestHost::new();
        let args = ConfigArgs {
            config: Some(Utf8PathBuf::from("/definitely/not/here/graphurl.toml")),
        };
        let _ = validate_config(&mut host, &args).unwrap_err();
        assert_eq!(host.exit_code, Some(1));
    }
}
