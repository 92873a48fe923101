//! Profile loading and validation.

mod types;
mod validation;

pub use types::*;

use crate::error::{AdapterError, Result};
use std::path::Path;

impl ProfileConfig {
    /// Load profiles from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse profiles from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: ProfileConfig = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Select the credentials of one output.
    ///
    /// Uses the profile's default target unless `target` is given, and
    /// validates the result.
    pub fn credentials(&self, profile: &str, target: Option<&str>) -> Result<DamengCredentials> {
        let profile_cfg = self.profiles.get(profile).ok_or_else(|| {
            AdapterError::Config(format!("profile '{}' not found", profile))
        })?;
        let target = target.unwrap_or(profile_cfg.target.as_str());
        let credentials = profile_cfg.outputs.get(target).ok_or_else(|| {
            AdapterError::Config(format!(
                "target '{}' not found in profile '{}'",
                target, profile
            ))
        })?;
        credentials.validate()?;
        Ok(credentials.clone())
    }
}

impl DamengCredentials {
    /// Validate the credentials.
    pub fn validate(&self) -> Result<()> {
        validation::validate(self)
    }

    /// Keys shown in debug output. The password is never listed.
    pub fn connection_keys(&self) -> &'static [&'static str] {
        &["host", "port", "user", "schema", "database"]
    }

    /// Field that identifies the team/organization using the adapter.
    pub fn unique_field(&self) -> &str {
        &self.host
    }

    /// Configured database, if set and non-empty.
    pub fn database(&self) -> Option<&str> {
        self.database.as_deref().filter(|d| !d.is_empty())
    }

    /// Build an ODBC connection string for the DM8 driver.
    ///
    /// Sessions run with auto-commit on.
    pub fn connection_string(&self) -> String {
        format!(
            "Driver={{{}}};Server={};TCP_Port={};UID={};PWD={};AUTOCOMMIT=1;",
            self.driver,
            self.host,
            self.port,
            odbc_value(&self.user),
            odbc_value(&self.password),
        )
    }
}

/// Brace a connection-string value when it contains separators.
fn odbc_value(value: &str) -> String {
    if value.contains(&[';', '{', '}', '='][..]) || value.starts_with(' ') || value.ends_with(' ') {
        format!("{{{}}}", value.replace('}', "}}"))
    } else {
        value.to_string()
    }
}
