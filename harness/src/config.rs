use std::path::Path;

use ini::Ini;

use crate::errors::{Error, Result};

/// Account and profile settings for both sides of the cross-account link.
/// Loaded once at startup and immutable afterwards.
#[derive(Debug, Clone)]
pub struct AccountConfig {
    pub monitoring_account_id: String,
    pub monitoring_profile: String,
    pub monitoring_region: String,
    pub application_account_id: String,
    pub application_profile: String,
    pub application_region: String,
    pub default_app_name: String,
    pub default_environment: String,
    pub alarm_topic_arn: Option<String>,
}

impl AccountConfig {
    /// Reads the INI-style accounts file. A missing file or a missing
    /// required key is fatal; there is nothing sensible to fall back to.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ConfigError(format!(
                "configuration file not found: {}",
                path.display()
            )));
        }

        let ini = Ini::load_from_file(path)?;
        let require = |section: &str, key: &str| -> Result<String> {
            ini.get_from(Some(section), key)
                .map(str::to_string)
                .ok_or_else(|| {
                    Error::ConfigError(format!("missing key `{key}` in section [{section}]"))
                })
        };

        Ok(AccountConfig {
            monitoring_account_id: require("monitoring", "account_id")?,
            monitoring_profile: require("monitoring", "profile")?,
            monitoring_region: require("monitoring", "region")?,
            application_account_id: require("application", "account_id")?,
            application_profile: require("application", "profile")?,
            application_region: require("application", "region")?,
            default_app_name: require("defaults", "app_name")?,
            default_environment: require("defaults", "environment")?,
            alarm_topic_arn: ini
                .get_from(Some("defaults"), "alarm_topic_arn")
                .map(str::to_string),
        })
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
