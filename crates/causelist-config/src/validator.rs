//! Configuration validation.

use crate::error::ConfigError;
use crate::schema::Config;

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Convert into a hard error if any validation error was recorded.
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, ConfigError> {
        match self.errors.into_iter().next() {
            Some(first) => Err(ConfigError::InvalidValue {
                field: first.path,
                message: first.message,
            }),
            None => Ok(self.warnings),
        }
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_server(config, &mut result);
        Self::validate_browser(config, &mut result);
        Self::validate_site(config, &mut result);
        Self::validate_download(config, &mut result);
        Self::validate_probe(config, &mut result);

        result
    }

    fn validate_server(config: &Config, result: &mut ValidationResult) {
        if config.server.port == 0 {
            result.add_error(ValidationError::new("server.port", "Port cannot be 0"));
        }

        if config.server.host.is_empty() {
            result.add_error(ValidationError::new("server.host", "Host cannot be empty"));
        }
    }

    fn validate_browser(config: &Config, result: &mut ValidationResult) {
        if config.browser.debug_port == 0 {
            result.add_error(ValidationError::new(
                "browser.debug_port",
                "Debug port cannot be 0",
            ));
        }

        if config.browser.launch_timeout_secs == 0 {
            result.add_error(ValidationError::new(
                "browser.launch_timeout_secs",
                "launch_timeout_secs must be greater than 0",
            ));
        }

        if config.browser.command_timeout_secs == 0 {
            result.add_error(ValidationError::new(
                "browser.command_timeout_secs",
                "command_timeout_secs must be greater than 0",
            ));
        }

        if let Some(ref path) = config.browser.chrome_path {
            if !path.exists() {
                result.add_warning(ValidationWarning::new(
                    "browser.chrome_path",
                    format!("Chrome path does not exist: {:?}", path),
                ));
            }
        }

        if config.browser.headless && config.browser.keep_open {
            result.add_warning(ValidationWarning::new(
                "browser.keep_open",
                "keep_open has no visible effect when the browser is headless",
            ));
        }
    }

    fn validate_site(config: &Config, result: &mut ValidationResult) {
        match url::Url::parse(&config.site.url) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
            Ok(_) => result.add_error(ValidationError::new(
                "site.url",
                "url must start with http:// or https://",
            )),
            Err(e) => result.add_error(ValidationError::new(
                "site.url",
                format!("Invalid URL: {}", e),
            )),
        }

        let selectors = [
            ("site.iframe_selector", &config.site.iframe_selector),
            ("site.complex_selector", &config.site.complex_selector),
            ("site.date_selector", &config.site.date_selector),
            ("site.submit_selector", &config.site.submit_selector),
            ("site.pdf_link_selector", &config.site.pdf_link_selector),
        ];
        for (path, selector) in selectors {
            if selector.trim().is_empty() {
                result.add_error(ValidationError::new(path, "Selector cannot be empty"));
            }
        }

        if config.site.date_format.is_empty() {
            result.add_error(ValidationError::new(
                "site.date_format",
                "date_format cannot be empty",
            ));
        }

        if config.site.wait_timeout_secs == 0 {
            result.add_error(ValidationError::new(
                "site.wait_timeout_secs",
                "wait_timeout_secs must be greater than 0",
            ));
        }
    }

    fn validate_download(config: &Config, result: &mut ValidationResult) {
        if config.download.completion_timeout_secs == 0 {
            result.add_error(ValidationError::new(
                "download.completion_timeout_secs",
                "completion_timeout_secs must be greater than 0",
            ));
        }

        if config.download.directory.as_os_str().is_empty() {
            result.add_error(ValidationError::new(
                "download.directory",
                "Download directory cannot be empty",
            ));
        }
    }

    fn validate_probe(config: &Config, result: &mut ValidationResult) {
        if config.probe.element_selector.trim().is_empty() {
            result.add_error(ValidationError::new(
                "probe.element_selector",
                "Selector cannot be empty",
            ));
        }

        if config.probe.hold_secs > 3600 {
            result.add_warning(ValidationWarning::new(
                "probe.hold_secs",
                "hold_secs is very high (>1h), the browser will stay open for a long time",
            ));
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
