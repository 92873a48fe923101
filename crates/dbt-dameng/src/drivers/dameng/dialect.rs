//! Dameng SQL dialect (Strategy pattern).
//!
//! Provides DM8-specific SQL syntax for identifier quoting and the small
//! statements the adapter renders itself.

use crate::core::identifier::validate_identifier;
use crate::core::traits::Dialect;
use crate::error::Result;

/// Dameng dialect implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct DamengDialect;

impl DamengDialect {
    /// Create a new Dameng dialect instance.
    pub fn new() -> Self {
        Self
    }

    /// Current-date function used by date macros.
    pub fn date_function(&self) -> &'static str {
        "CURRENT_DATE"
    }

    /// Cheap statement used to check a connection.
    pub fn debug_query(&self) -> &'static str {
        "select 1 as id from dual"
    }

    /// Incremental strategies DM8 supports.
    pub fn valid_incremental_strategies(&self) -> &'static [&'static str] {
        &["append", "merge"]
    }

    /// Add an interval to a timestamp expression.
    pub fn timestamp_add_sql(&self, add_to: &str, number: i64, interval: &str) -> String {
        format!("{add_to} + interval '{number}' {interval}")
    }

    /// Build `CREATE SCHEMA`, using only the first dotted component of `name`.
    pub fn create_schema_sql(&self, name: &str, if_not_exists: bool) -> Result<String> {
        let schema = name.split('.').next().unwrap_or_default();
        validate_identifier(schema)?;
        Ok(format!(
            "CREATE SCHEMA {}{}",
            if if_not_exists { "IF NOT EXISTS " } else { "" },
            schema
        ))
    }
}

impl Dialect for DamengDialect {
    fn name(&self) -> &str {
        "dameng"
    }

    fn quote_ident(&self, name: &str) -> String {
        // DM8 uses double quotes; embedded quotes are doubled
        format!("\"{}\"", name.replace('"', "\"\""))
    }

    fn is_quoted(&self, name: &str) -> bool {
        let Some(inner) = name
            .strip_prefix('"')
            .and_then(|rest| rest.strip_suffix('"'))
        else {
            return false;
        };
        // Every embedded quote must be doubled
        inner.replace("\"\"", "").find('"').is_none()
    }
}
