//! Configuration type definitions.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::relation::QuotePolicy;

/// Root of a profiles file: profile name → profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileConfig {
    pub profiles: BTreeMap<String, Profile>,
}

/// One profile with its named outputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    /// Output used when no target is given explicitly.
    pub target: String,

    /// Named connection outputs.
    pub outputs: BTreeMap<String, DamengCredentials>,
}

/// Connection credentials for a DM8 server.
#[derive(Clone, Serialize, Deserialize)]
pub struct DamengCredentials {
    /// Adapter type (always "dameng").
    #[serde(default = "default_dameng")]
    pub r#type: String,

    /// Server host.
    #[serde(alias = "server")]
    pub host: String,

    /// Server port (default: 5236).
    #[serde(default = "default_dameng_port")]
    pub port: u16,

    /// Username.
    pub user: String,

    /// Password.
    #[serde(alias = "pass", default, skip_serializing)]
    pub password: String,

    /// Schema models are built in.
    pub schema: String,

    /// Schema made current after connecting (`set schema`).
    #[serde(alias = "dbname", default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,

    /// ODBC driver name (default: "DM8 ODBC DRIVER").
    #[serde(default = "default_odbc_driver")]
    pub driver: String,

    /// Connection attempts before giving up (default: 1).
    #[serde(default = "default_retries")]
    pub retries: u32,

    /// Login timeout passed to the driver, in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub login_timeout_secs: Option<u32>,
}

impl fmt::Debug for DamengCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DamengCredentials")
            .field("type", &self.r#type)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .field("schema", &self.schema)
            .field("database", &self.database)
            .field("driver", &self.driver)
            .field("retries", &self.retries)
            .field("login_timeout_secs", &self.login_timeout_secs)
            .finish()
    }
}

/// Credentials plus project-level quoting, as the adapter sees them.
#[derive(Debug, Clone)]
pub struct AdapterConfig {
    pub credentials: DamengCredentials,
    pub quoting: QuotePolicy,
}

impl AdapterConfig {
    pub fn new(credentials: DamengCredentials) -> Self {
        Self {
            credentials,
            quoting: QuotePolicy::default(),
        }
    }

    pub fn with_quoting(mut self, quoting: QuotePolicy) -> Self {
        self.quoting = quoting;
        self
    }
}

fn default_dameng() -> String {
    "dameng".to_string()
}

fn default_dameng_port() -> u16 {
    5236
}

fn default_odbc_driver() -> String {
    "DM8 ODBC DRIVER".to_string()
}

fn default_retries() -> u32 {
    1
}
