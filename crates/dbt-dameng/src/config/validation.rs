//! Credential validation.

use super::DamengCredentials;
use crate::error::{AdapterError, Result};

/// Validate credentials.
pub fn validate(credentials: &DamengCredentials) -> Result<()> {
    if credentials.r#type != "dameng" {
        return Err(AdapterError::Config(format!(
            "type must be 'dameng', got '{}'",
            credentials.r#type
        )));
    }
    if credentials.host.is_empty() {
        return Err(AdapterError::Config("host is required".into()));
    }
    if credentials.port == 0 {
        return Err(AdapterError::Config("port must be non-zero".into()));
    }
    if credentials.user.is_empty() {
        return Err(AdapterError::Config("user is required".into()));
    }
    if credentials.schema.is_empty() {
        return Err(AdapterError::Config("schema is required".into()));
    }
    if credentials.retries == 0 {
        return Err(AdapterError::Config("retries must be at least 1".into()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_credentials() -> DamengCredentials {
        DamengCredentials {
            r#type: "dameng".to_string(),
            host: "localhost".to_string(),
            port: 5236,
            user: "SYSDBA".to_string(),
            password: "SYSDBA".to_string(),
            schema: "DBT_TEST".to_string(),
            database: Some("TEST".to_string()),
            driver: "DM8 ODBC DRIVER".to_string(),
            retries: 1,
            login_timeout_secs: None,
        }
    }

    #[test]
    fn test_valid_credentials() {
        assert!(validate(&valid_credentials()).is_ok());
    }

    #[test]
    fn test_wrong_type() {
        let mut credentials = valid_credentials();
        credentials.r#type = "oracle".to_string();
        assert!(validate(&credentials).is_err());
    }

    #[test]
    fn test_missing_host() {
        let mut credentials = valid_credentials();
        credentials.host = "".to_string();
        assert!(validate(&credentials).is_err());
    }

    #[test]
    fn test_missing_schema() {
        let mut credentials = valid_credentials();
        credentials.schema = "".to_string();
        assert!(validate(&credentials).is_err());
    }

    #[test]
    fn test_zero_retries() {
        let mut credentials = valid_credentials();
        credentials.retries = 0;
        assert!(validate(&credentials).is_err());
    }

    #[test]
    fn test_debug_redacts_password() {
        let mut credentials = valid_credentials();
        credentials.password = "super_secret_password_123".to_string();
        let debug_output = format!("{:?}", credentials);
        assert!(
            debug_output.contains("[REDACTED]"),
            "Debug output should contain [REDACTED]"
        );
        assert!(
            !debug_output.contains("super_secret_password_123"),
            "Debug output should not contain actual password value"
        );
    }
}
