//! Identifier validation and quoting decisions.
//!
//! DM8 folds unquoted identifiers to uppercase and only accepts them when they
//! start with a letter and continue with letters, digits, `#`, `$` or `_`.
//! Anything else (and any reserved word) must be written as a quoted
//! identifier. Users can also force quoting per column in model configuration.
//!
//! [`IdentifierPolicy`] makes that decision. It holds no mutable state: the
//! keyword set is shared read-only and every other input is per call, so one
//! policy can be used from any number of threads.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::drivers::DamengDialect;
use crate::error::{AdapterError, Result};

use super::keywords::KeywordSet;
use super::traits::Dialect;

/// Maximum identifier length accepted by DM8 (bytes).
const MAX_IDENTIFIER_LENGTH: usize = 128;

/// Characters allowed after the first letter of an unquoted identifier.
const EXTRA_IDENTIFIER_CHARS: [char; 3] = ['#', '$', '_'];

/// Per-column settings from a model definition.
///
/// Only `quote` matters for quoting; a missing flag means "do not quote".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnQuote {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quote: Option<bool>,
}

impl ColumnQuote {
    pub fn new(quote: bool) -> Self {
        Self { quote: Some(quote) }
    }

    /// The explicit flag, defaulting to `false`.
    pub fn quote(&self) -> bool {
        self.quote.unwrap_or(false)
    }
}

/// Column name (raw or already quoted) → column settings.
pub type ColumnQuoteConfig = HashMap<String, ColumnQuote>;

/// Parse a model's `columns` mapping as the host passes it (JSON).
///
/// Settings other than `quote` are ignored.
pub fn parse_column_quote_config(json: &str) -> Result<ColumnQuoteConfig> {
    Ok(serde_json::from_str(json)?)
}

/// The `quote_columns` setting of a seed.
///
/// Deserializes from any YAML value so that a wrongly typed setting can be
/// reported at compile time instead of being coerced.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "serde_yaml::Value")]
pub enum SeedQuoteSetting {
    /// Not configured (absent or null): decide from the column name.
    #[default]
    Unspecified,
    /// Explicit `true`/`false`.
    Flag(bool),
    /// Any other value.
    Invalid(serde_yaml::Value),
}

impl From<serde_yaml::Value> for SeedQuoteSetting {
    fn from(value: serde_yaml::Value) -> Self {
        match value {
            serde_yaml::Value::Null => SeedQuoteSetting::Unspecified,
            serde_yaml::Value::Bool(flag) => SeedQuoteSetting::Flag(flag),
            other => SeedQuoteSetting::Invalid(other),
        }
    }
}

impl From<bool> for SeedQuoteSetting {
    fn from(flag: bool) -> Self {
        SeedQuoteSetting::Flag(flag)
    }
}

impl From<Option<bool>> for SeedQuoteSetting {
    fn from(flag: Option<bool>) -> Self {
        flag.map_or(SeedQuoteSetting::Unspecified, SeedQuoteSetting::Flag)
    }
}

fn yaml_type_name(value: &serde_yaml::Value) -> &'static str {
    match value {
        serde_yaml::Value::Null => "null",
        serde_yaml::Value::Bool(_) => "bool",
        serde_yaml::Value::Number(_) => "number",
        serde_yaml::Value::String(_) => "string",
        serde_yaml::Value::Sequence(_) => "sequence",
        serde_yaml::Value::Mapping(_) => "mapping",
        serde_yaml::Value::Tagged(_) => "tagged value",
    }
}

/// Validate an identifier before it is spliced into DDL.
///
/// Rejects empty identifiers, null bytes and names longer than DM8 allows.
pub fn validate_identifier(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(AdapterError::InvalidInput(
            "Identifier cannot be empty".to_string(),
        ));
    }

    if name.contains('\0') {
        return Err(AdapterError::InvalidInput(format!(
            "Identifier contains null byte: {:?}",
            name
        )));
    }

    if name.len() > MAX_IDENTIFIER_LENGTH {
        return Err(AdapterError::InvalidInput(format!(
            "Identifier exceeds maximum length of {} bytes (got {} bytes): {:?}",
            MAX_IDENTIFIER_LENGTH,
            name.len(),
            name
        )));
    }

    Ok(())
}

/// Returns `true` if `identifier` can be written unquoted.
///
/// 1. The first character is alphabetic.
/// 2. Every other character is alphanumeric or one of `#`, `$`, `_`.
///
/// # Errors
///
/// Returns `AdapterError::InvalidInput` for an empty identifier.
pub fn is_valid_identifier(identifier: &str) -> Result<bool> {
    let mut chars = identifier.chars();
    let first = chars.next().ok_or_else(|| {
        AdapterError::InvalidInput("Identifier cannot be empty".to_string())
    })?;

    if !first.is_alphabetic() {
        return Ok(false);
    }

    Ok(chars.all(|c| c.is_alphanumeric() || EXTRA_IDENTIFIER_CHARS.contains(&c)))
}

/// Decides whether identifiers need quoting and renders them.
#[derive(Debug, Clone)]
pub struct IdentifierPolicy<'k, D: Dialect> {
    dialect: D,
    keywords: &'k KeywordSet,
}

impl IdentifierPolicy<'static, DamengDialect> {
    /// Policy with the DM8 keyword set and double-quote quoting.
    pub fn dameng() -> Self {
        Self::new(DamengDialect::new(), KeywordSet::dameng())
    }
}

impl Default for IdentifierPolicy<'static, DamengDialect> {
    fn default() -> Self {
        Self::dameng()
    }
}

impl<'k, D: Dialect> IdentifierPolicy<'k, D> {
    pub fn new(dialect: D, keywords: &'k KeywordSet) -> Self {
        Self { dialect, keywords }
    }

    pub fn dialect(&self) -> &D {
        &self.dialect
    }

    pub fn keywords(&self) -> &KeywordSet {
        self.keywords
    }

    /// Quote with the dialect's quote function, unconditionally.
    pub fn quote(&self, identifier: &str) -> String {
        self.dialect.quote_ident(identifier)
    }

    /// Returns `true` if the identifier should be quoted.
    ///
    /// First matching rule wins:
    ///
    /// 1. The identifier is a reserved word.
    /// 2. The identifier is not valid unquoted (see [`is_valid_identifier`]).
    /// 3. The column config has the raw identifier as a key: use its flag.
    /// 4. The column config has the quoted identifier as a key: use its flag.
    /// 5. Otherwise no quoting.
    pub fn should_identifier_be_quoted(
        &self,
        identifier: &str,
        columns: Option<&ColumnQuoteConfig>,
    ) -> Result<bool> {
        if self.keywords.contains(identifier) {
            return Ok(true);
        }
        if !is_valid_identifier(identifier)? {
            return Ok(true);
        }
        if let Some(columns) = columns {
            if let Some(column) = columns.get(identifier) {
                return Ok(column.quote());
            }
            if let Some(column) = columns.get(&self.quote(identifier)) {
                return Ok(column.quote());
            }
        }
        Ok(false)
    }

    /// Quote the identifier if [`should_identifier_be_quoted`](Self::should_identifier_be_quoted)
    /// says so, otherwise return it unchanged.
    ///
    /// An identifier that is already fully quoted is returned as is, so
    /// feeding the output back in never quotes twice.
    pub fn check_and_quote_identifier(
        &self,
        identifier: &str,
        columns: Option<&ColumnQuoteConfig>,
    ) -> Result<String> {
        if self.dialect.is_quoted(identifier) {
            return Ok(identifier.to_string());
        }
        if self.should_identifier_be_quoted(identifier, columns)? {
            Ok(self.quote(identifier))
        } else {
            Ok(identifier.to_string())
        }
    }

    /// Render a seed column name taken from a CSV header.
    ///
    /// An explicit flag wins; an unspecified setting falls back to
    /// [`should_identifier_be_quoted`](Self::should_identifier_be_quoted)
    /// without column config.
    ///
    /// # Errors
    ///
    /// Returns `AdapterError::Compilation` when the setting is neither a
    /// boolean nor unspecified.
    pub fn quote_seed_column(&self, column: &str, setting: &SeedQuoteSetting) -> Result<String> {
        let quote_columns = match setting {
            SeedQuoteSetting::Flag(flag) => *flag,
            SeedQuoteSetting::Unspecified => self.should_identifier_be_quoted(column, None)?,
            SeedQuoteSetting::Invalid(value) => {
                return Err(AdapterError::Compilation(format!(
                    "The seed configuration value of \"quote_columns\" has an invalid type {}",
                    yaml_type_name(value)
                )));
            }
        };

        if quote_columns {
            Ok(self.quote(column))
        } else {
            Ok(column.to_string())
        }
    }
}
