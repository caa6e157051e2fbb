//! Configuration loader.

use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::ConfigError;
use crate::schema::Config;

static ENV_VAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid"));

/// Configuration loader with environment variable substitution.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let content = fs::read_to_string(path)?;
        Self::load_str(&content)
    }

    /// Load configuration from a TOML file, falling back to defaults when
    /// the file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Config, ConfigError> {
        match Self::load(path) {
            Err(ConfigError::NotFound(_)) => Ok(Config::default()),
            other => other,
        }
    }

    /// Load configuration from a string.
    pub fn load_str(content: &str) -> Result<Config, ConfigError> {
        let expanded = Self::expand_env_vars(content)?;
        let mut config: Config = toml::from_str(&expanded)?;
        config.expand_paths();
        Ok(config)
    }

    /// Expand environment variables in the format `${VAR}`.
    fn expand_env_vars(content: &str) -> Result<String, ConfigError> {
        let mut result = content.to_string();

        for cap in ENV_VAR_RE.captures_iter(content) {
            let var_name = &cap[1];
            let var_value = std::env::var(var_name)
                .map_err(|_| ConfigError::EnvVarNotSet(var_name.to_string()))?;
            result = result.replace(&cap[0], &var_value);
        }

        Ok(result)
    }

    /// Expand shell-style paths (e.g., `~/Court PDFs`).
    pub fn expand_path(path: &str) -> String {
        shellexpand::tilde(path).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_empty_config() {
        let config = ConfigLoader::load_str("").unwrap();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.site.iframe_selector, "iframe");
    }

    #[test]
    fn test_load_basic_config() {
        let content = r#"
            [server]
            host = "0.0.0.0"
            port = 3000
        "#;
        let config = ConfigLoader::load_str(content).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_load_full_config() {
        let content = r#"
            [browser]
            headless = true
            debug_port = 9333
            keep_open = true

            [site]
            url = "https://example.org/cause-list/"
            wait_timeout_secs = 45

            [download]
            directory = "/tmp/court-pdfs"
            rename = false

            [probe]
            hold_secs = 10
        "#;
        let config = ConfigLoader::load_str(content).unwrap();
        assert!(config.browser.headless);
        assert_eq!(config.browser.debug_port, 9333);
        assert!(config.browser.keep_open);
        assert_eq!(config.site.url, "https://example.org/cause-list/");
        assert_eq!(config.site.wait_timeout_secs, 45);
        assert_eq!(
            config.download.directory,
            std::path::PathBuf::from("/tmp/court-pdfs")
        );
        assert!(!config.download.rename);
        assert_eq!(config.probe.hold_secs, 10);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[server]").unwrap();
        writeln!(file, "port = 5050").unwrap();

        let config = ConfigLoader::load(file.path()).unwrap();
        assert_eq!(config.server.port, 5050);
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = ConfigLoader::load(Path::new("/nonexistent/path/causelist.toml"));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_load_or_default_nonexistent_file() {
        let config =
            ConfigLoader::load_or_default(Path::new("/nonexistent/path/causelist.toml")).unwrap();
        assert_eq!(config.server.port, 5000);
    }

    #[test]
    fn test_load_invalid_toml() {
        let result = ConfigLoader::load_str("invalid = [unclosed");
        assert!(matches!(result, Err(ConfigError::TomlParse(_))));
    }

    #[test]
    fn test_expand_env_vars() {
        // SAFETY: the variable name is unique to this test
        unsafe {
            std::env::set_var("CAUSELIST_TEST_CONFIG_VAR", "test_value");
        }
        let content = "value = \"${CAUSELIST_TEST_CONFIG_VAR}\"";
        let expanded = ConfigLoader::expand_env_vars(content).unwrap();
        assert!(expanded.contains("test_value"));
        unsafe {
            std::env::remove_var("CAUSELIST_TEST_CONFIG_VAR");
        }
    }

    #[test]
    fn test_expand_env_vars_not_set() {
        let content = "value = \"${CAUSELIST_NONEXISTENT_VAR_12345}\"";
        let result = ConfigLoader::expand_env_vars(content);
        assert!(matches!(result, Err(ConfigError::EnvVarNotSet(_))));
    }

    #[test]
    fn test_expand_path_with_tilde() {
        let expanded = ConfigLoader::expand_path("~/Court PDFs");
        assert!(!expanded.starts_with('~'));
        assert!(expanded.ends_with("/Court PDFs"));
    }

    #[test]
    fn test_download_directory_tilde_is_expanded() {
        let content = r#"
            [download]
            directory = "~/cause-lists"
        "#;
        let config = ConfigLoader::load_str(content).unwrap();
        assert!(!config.download.directory.starts_with("~"));
        assert!(config.download.directory.ends_with("cause-lists"));
    }
}
