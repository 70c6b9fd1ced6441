//! Configuration loader.

use std::fs;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ConfigError;
use crate::schema::Config;

static ENV_VAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid"));

/// Environment variables read by [`ConfigLoader::from_env`].
pub const ENV_CLIENT_ID: &str = "PAYPAL_CLIENT_ID";
pub const ENV_SECRET: &str = "PAYPAL_SECRET";
pub const ENV_API_BASE: &str = "PAYPAL_API_BASE";
pub const ENV_WEBHOOK_ID: &str = "PAYPAL_WEBHOOK_ID";

/// Configuration loader with environment variable substitution.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::load_str(&content)
    }

    /// Load configuration from a string.
    pub fn load_str(content: &str) -> Result<Config, ConfigError> {
        let expanded = Self::expand_env_vars(content)?;
        let config: Config = toml::from_str(&expanded)?;
        Ok(config)
    }

    /// Build configuration from `PAYPAL_*` environment variables.
    pub fn from_env() -> Result<Config, ConfigError> {
        let mut config = Config::default();
        config.client.client_id = required_env(ENV_CLIENT_ID, "client.client_id")?;
        config.client.secret = required_env(ENV_SECRET, "client.secret")?;
        if let Ok(api_base) = std::env::var(ENV_API_BASE) {
            config.client.api_base = api_base;
        }
        config.webhooks.webhook_id = std::env::var(ENV_WEBHOOK_ID).ok();
        Ok(config)
    }

    /// Load the file when it exists, otherwise fall back to the environment.
    pub fn load_or_env(path: &Path) -> Result<Config, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Self::from_env().map_err(|e| match e {
                ConfigError::EnvVarNotSet(var) => ConfigError::NotFound(format!(
                    "{} (and {} is not set)",
                    path.display(),
                    var
                )),
                other => other,
            })
        }
    }

    /// Expand environment variables in the format `${VAR}`.
    fn expand_env_vars(content: &str) -> Result<String, ConfigError> {
        let mut result = content.to_string();

        for cap in ENV_VAR.captures_iter(content) {
            let var_name = &cap[1];
            let var_value = std::env::var(var_name)
                .map_err(|_| ConfigError::EnvVarNotSet(var_name.to_string()))?;
            result = result.replace(&cap[0], &var_value);
        }

        Ok(result)
    }

    /// Expand shell-style paths (e.g., `~/.paypal-webhooks`).
    pub fn expand_path(path: &str) -> String {
        shellexpand::tilde(path).to_string()
    }
}

fn required_env(var: &str, field: &str) -> Result<String, ConfigError> {
    match std::env::var(var) {
        Ok(value) if value.is_empty() => Err(ConfigError::MissingField(field.to_string())),
        Ok(value) => Ok(value),
        Err(_) => Err(ConfigError::EnvVarNotSet(var.to_string())),
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
        assert_eq!(config.client.timeout_seconds, 30);
        assert_eq!(config.webhooks.anchor_type, "APPLICATION");
    }

    #[test]
    fn test_load_full_config() {
        let content = r#"
            [client]
            client_id = "client-1"
            secret = "shh"
            api_base = "https://api-m.paypal.com"
            timeout_seconds = 10

            [webhooks]
            webhook_id = "WH-9"
            anchor_type = "ACCOUNT"
        "#;
        let config = ConfigLoader::load_str(content).unwrap();
        assert_eq!(config.client.client_id, "client-1");
        assert_eq!(config.client.secret, "shh");
        assert_eq!(config.client.api_base, "https://api-m.paypal.com");
        assert_eq!(config.client.timeout_seconds, 10);
        assert_eq!(config.webhooks.webhook_id.as_deref(), Some("WH-9"));
        assert_eq!(config.webhooks.anchor_type, "ACCOUNT");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[client]").unwrap();
        writeln!(file, "timeout_seconds = 5").unwrap();

        let config = ConfigLoader::load(file.path()).unwrap();
        assert_eq!(config.client.timeout_seconds, 5);
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = ConfigLoader::load(Path::new("/nonexistent/path/paypal.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_invalid_toml() {
        let result = ConfigLoader::load_str("invalid = [unclosed");
        assert!(matches!(result, Err(ConfigError::TomlParse(_))));
    }

    #[test]
    fn test_expand_env_vars() {
        // SAFETY: unique test-only variable
        unsafe {
            std::env::set_var("PAYPAL_CONFIG_TEST_SECRET", "from-env");
        }
        let content = "[client]\nsecret = \"${PAYPAL_CONFIG_TEST_SECRET}\"";
        let config = ConfigLoader::load_str(content).unwrap();
        assert_eq!(config.client.secret, "from-env");
        unsafe {
            std::env::remove_var("PAYPAL_CONFIG_TEST_SECRET");
        }
    }

    #[test]
    fn test_expand_env_vars_not_set() {
        let content = "value = \"${NONEXISTENT_PAYPAL_TEST_VAR_12345}\"";
        let result = ConfigLoader::expand_env_vars(content);
        assert!(matches!(result, Err(ConfigError::EnvVarNotSet(var)) if var == "NONEXISTENT_PAYPAL_TEST_VAR_12345"));
    }

    #[test]
    fn test_expand_env_vars_no_vars() {
        let content = "value = \"no variables here\"";
        let expanded = ConfigLoader::expand_env_vars(content).unwrap();
        assert_eq!(expanded, content);
    }

    #[test]
    fn test_expand_path_with_tilde() {
        let expanded = ConfigLoader::expand_path("~/paypal.toml");
        assert!(!expanded.starts_with('~'));
        assert!(expanded.ends_with("/paypal.toml"));
    }

    #[test]
    fn test_expand_path_no_tilde() {
        assert_eq!(ConfigLoader::expand_path("/etc/paypal.toml"), "/etc/paypal.toml");
    }

    #[test]
    fn test_required_env_empty_value() {
        // SAFETY: unique test-only variable
        unsafe {
            std::env::set_var("PAYPAL_CONFIG_TEST_EMPTY", "");
        }
        let result = required_env("PAYPAL_CONFIG_TEST_EMPTY", "client.secret");
        assert!(matches!(result, Err(ConfigError::MissingField(field)) if field == "client.secret"));
        unsafe {
            std::env::remove_var("PAYPAL_CONFIG_TEST_EMPTY");
        }
    }

    #[test]
    fn test_required_env_unset() {
        let result = required_env("NONEXISTENT_PAYPAL_TEST_VAR_67890", "client.client_id");
        assert!(matches!(result, Err(ConfigError::EnvVarNotSet(_))));
    }

    #[test]
    fn test_load_or_env_prefers_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[client]\nclient_id = \"file-id\"").unwrap();

        let config = ConfigLoader::load_or_env(file.path()).unwrap();
        assert_eq!(config.client.client_id, "file-id");
    }
}
