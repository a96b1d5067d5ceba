//! Runtime configuration for the registration client.
//!
//! Configuration is read from a YAML (or JSON) file located at
//! `REGDESK_CONFIG_PATH` or `~/.config/regdesk/config.yaml`, then selected
//! values are overridden from the environment. A missing file yields the
//! defaults; a malformed file is reported with a warning and ignored so the
//! wizard can still start.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Duration;
use regdesk_types::DEFAULT_STALENESS_MINUTES;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::path_processing::path_from_env_or_config_dir;

/// Environment variable allowing callers to override the config file path.
pub const CONFIG_PATH_ENV: &str = "REGDESK_CONFIG_PATH";
/// Default filename inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config.yaml";
/// Overrides [`RegdeskConfig::api_base_url`].
pub const API_BASE_ENV: &str = "REGDESK_API_BASE";
/// Overrides [`RegdeskConfig::checkout_url`].
pub const CHECKOUT_URL_ENV: &str = "REGDESK_CHECKOUT_URL";
/// Overrides [`CheckoutSettings::public_key`].
pub const PAYMENT_KEY_ENV: &str = "REGDESK_PAYMENT_KEY";

const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
const DEFAULT_CHECKOUT_URL: &str = "https://rzp.io/rzp/qE5ylHJ";
const DEFAULT_RETURN_URL: &str = "http://localhost:8000/";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Which checkout pattern an online payment uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OnlinePaymentStrategy {
    /// Hand the user an external checkout page and complete on return.
    #[default]
    Redirect,
    /// Create an order and collect the payment through a checkout widget.
    Embedded,
}

/// Parameters passed to the external checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckoutSettings {
    pub public_key: String,
    /// Registration fee in minor currency units.
    pub amount_minor: u64,
    pub currency: String,
    pub display_name: String,
    pub description: String,
}

impl Default for CheckoutSettings {
    fn default() -> Self {
        Self {
            public_key: String::new(),
            amount_minor: 20_000,
            currency: "INR".to_string(),
            display_name: "Event Registration".to_string(),
            description: "Registration fee".to_string(),
        }
    }
}

/// A selectable option (event, department, or year) with its display label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    pub label: String,
}

impl CatalogEntry {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegdeskConfig {
    pub api_base_url: String,
    pub checkout_url: String,
    /// Page the external checkout sends the user back to.
    pub return_url: String,
    pub online_strategy: OnlinePaymentStrategy,
    pub checkout: CheckoutSettings,
    pub staleness_minutes: i64,
    pub events: Vec<CatalogEntry>,
    pub departments: Vec<CatalogEntry>,
    pub years: Vec<CatalogEntry>,
}

impl Default for RegdeskConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            checkout_url: DEFAULT_CHECKOUT_URL.to_string(),
            return_url: DEFAULT_RETURN_URL.to_string(),
            online_strategy: OnlinePaymentStrategy::default(),
            checkout: CheckoutSettings::default(),
            staleness_minutes: DEFAULT_STALENESS_MINUTES,
            events: vec![
                CatalogEntry::new("paper-presentation", "Paper Presentation"),
                CatalogEntry::new("project-expo", "Project Expo"),
                CatalogEntry::new("technical-quiz", "Technical Quiz"),
                CatalogEntry::new("coding-contest", "Coding Contest"),
                CatalogEntry::new("web-design", "Web Design"),
                CatalogEntry::new("gaming", "Gaming"),
            ],
            departments: vec![
                CatalogEntry::new("CSE", "Computer Science and Engineering"),
                CatalogEntry::new("IT", "Information Technology"),
                CatalogEntry::new("ECE", "Electronics and Communication Engineering"),
                CatalogEntry::new("EEE", "Electrical and Electronics Engineering"),
                CatalogEntry::new("MECH", "Mechanical Engineering"),
                CatalogEntry::new("CIVIL", "Civil Engineering"),
            ],
            years: vec![
                CatalogEntry::new("1", "First Year"),
                CatalogEntry::new("2", "Second Year"),
                CatalogEntry::new("3", "Third Year"),
                CatalogEntry::new("4", "Fourth Year"),
            ],
        }
    }
}

impl RegdeskConfig {
    /// Load from the default location and apply environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let path = default_config_path();
        let mut config = Self::from_path(&path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load from an explicit file without consulting the environment.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str::<RegdeskConfig>(&content) {
                Ok(config) => {
                    debug!(path = %path.display(), "loaded configuration");
                    Ok(config)
                }
                Err(error) => {
                    warn!(
                        path = %path.display(),
                        error = %error,
                        "Failed to parse config file; using defaults"
                    );
                    Ok(RegdeskConfig::default())
                }
            },
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(RegdeskConfig::default()),
            Err(error) => Err(ConfigError::Io(error)),
        }
    }

    pub fn apply_env_overrides(&mut self) {
        if let Some(value) = non_empty_env(API_BASE_ENV) {
            self.api_base_url = value;
        }
        if let Some(value) = non_empty_env(CHECKOUT_URL_ENV) {
            self.checkout_url = value;
        }
        if let Some(value) = non_empty_env(PAYMENT_KEY_ENV) {
            self.checkout.public_key = value;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.staleness_minutes <= 0 {
            return Err(ConfigError::Invalid("staleness_minutes must be positive".into()));
        }
        if self.events.is_empty() {
            return Err(ConfigError::Invalid("at least one event must be configured".into()));
        }
        if self.checkout.amount_minor == 0 {
            return Err(ConfigError::Invalid("checkout.amount_minor must be greater than zero".into()));
        }
        for (key, value) in [("checkout_url", &self.checkout_url), ("return_url", &self.return_url)] {
            url::Url::parse(value).map_err(|error| ConfigError::Invalid(format!("{key} '{value}' is not a valid URL: {error}")))?;
        }
        Ok(())
    }

    pub fn staleness_window(&self) -> Duration {
        Duration::minutes(self.staleness_minutes)
    }

    /// Display label for a department code, falling back to the code itself.
    pub fn department_label(&self, code: &str) -> String {
        lookup_label(&self.departments, code)
    }

    pub fn event_label(&self, id: &str) -> String {
        lookup_label(&self.events, id)
    }
}

fn lookup_label(entries: &[CatalogEntry], id: &str) -> String {
    entries
        .iter()
        .find(|entry| entry.id == id)
        .map(|entry| entry.label.clone())
        .unwrap_or_else(|| id.to_string())
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|value| value.trim().to_string()).filter(|value| !value.is_empty())
}

pub fn default_config_path() -> PathBuf {
    path_from_env_or_config_dir(CONFIG_PATH_ENV, CONFIG_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let config = RegdeskConfig::from_path(&dir.path().join("absent.yaml")).unwrap();
        assert_eq!(config, RegdeskConfig::default());
        assert_eq!(config.staleness_window(), Duration::minutes(10));
    }

    #[test]
    fn partial_yaml_keeps_other_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(
            &path,
            "api_base_url: https://register.example.com\nonline_strategy: embedded\ncheckout:\n  amount_minor: 15000\n",
        )
        .unwrap();
        let config = RegdeskConfig::from_path(&path).unwrap();
        assert_eq!(config.api_base_url, "https://register.example.com");
        assert_eq!(config.online_strategy, OnlinePaymentStrategy::Embedded);
        assert_eq!(config.checkout.amount_minor, 15000);
        assert_eq!(config.checkout.currency, "INR");
        assert!(!config.events.is_empty());
    }

    #[test]
    fn json_file_is_accepted() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"staleness_minutes": 5, "events": [{"id": "quiz", "label": "Quiz"}]}"#).unwrap();
        let config = RegdeskConfig::from_path(&path).unwrap();
        assert_eq!(config.staleness_minutes, 5);
        assert_eq!(config.events, vec![CatalogEntry::new("quiz", "Quiz")]);
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "events: [unclosed").unwrap();
        let config = RegdeskConfig::from_path(&path).unwrap();
        assert_eq!(config, RegdeskConfig::default());
    }

    #[test]
    fn env_overrides_apply() {
        temp_env::with_vars(
            [
                (API_BASE_ENV, Some("https://api.example.org")),
                (PAYMENT_KEY_ENV, Some("rzp_test_key")),
                (CHECKOUT_URL_ENV, None),
            ],
            || {
                let mut config = RegdeskConfig::default();
                config.apply_env_overrides();
                assert_eq!(config.api_base_url, "https://api.example.org");
                assert_eq!(config.checkout.public_key, "rzp_test_key");
                assert_eq!(config.checkout_url, DEFAULT_CHECKOUT_URL);
            },
        );
    }

    #[test]
    fn validation_rejects_bad_values() {
        let mut config = RegdeskConfig {
            staleness_minutes: 0,
            ..RegdeskConfig::default()
        };
        assert!(config.validate().is_err());
        config.staleness_minutes = 10;
        config.checkout_url = "not a url".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn department_label_falls_back_to_code() {
        let config = RegdeskConfig::default();
        assert_eq!(config.department_label("CSE"), "Computer Science and Engineering");
        assert_eq!(config.department_label("BIO"), "BIO");
    }
}
