//! Configuration validation.

use crate::error::ConfigError;
use crate::schema::Config;

const KNOWN_ANCHOR_TYPES: [&str; 2] = ["APPLICATION", "ACCOUNT"];

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

    /// First error as a [`ConfigError`], if any.
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, ConfigError> {
        match self.errors.into_iter().next() {
            Some(error) => Err(ConfigError::InvalidValue {
                field: error.path,
                message: error.message,
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
    pub fn validate(config: &Config) -> Result<ValidationResult, ConfigError> {
        let mut result = ValidationResult::default();

        Self::validate_client(config, &mut result);
        Self::validate_webhooks(config, &mut result);

        Ok(result)
    }

    fn validate_client(config: &Config, result: &mut ValidationResult) {
        let client = &config.client;

        if client.client_id.is_empty() {
            result.add_error(ValidationError::new(
                "client.client_id",
                "client_id cannot be empty",
            ));
        }

        if client.secret.is_empty() {
            result.add_error(ValidationError::new(
                "client.secret",
                "secret cannot be empty",
            ));
        }

        if client.api_base.starts_with("http://") {
            result.add_warning(ValidationWarning::new(
                "client.api_base",
                "api_base is not using TLS, credentials will be sent in clear text",
            ));
        } else if !client.api_base.starts_with("https://") {
            result.add_error(ValidationError::new(
                "client.api_base",
                "api_base must start with http:// or https://",
            ));
        }

        if client.timeout_seconds == 0 {
            result.add_error(ValidationError::new(
                "client.timeout_seconds",
                "timeout_seconds must be greater than 0",
            ));
        }
    }

    fn validate_webhooks(config: &Config, result: &mut ValidationResult) {
        let anchor_type = config.webhooks.anchor_type.as_str();
        if !anchor_type.is_empty() && !KNOWN_ANCHOR_TYPES.contains(&anchor_type) {
            result.add_warning(ValidationWarning::new(
                "webhooks.anchor_type",
                format!(
                    "Unknown anchor type '{}', valid values: {:?}",
                    anchor_type, KNOWN_ANCHOR_TYPES
                ),
            ));
        }

        if let Some(ref id) = config.webhooks.webhook_id {
            if id.trim().is_empty() {
                result.add_error(ValidationError::new(
                    "webhooks.webhook_id",
                    "webhook_id is set but blank",
                ));
            }
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
