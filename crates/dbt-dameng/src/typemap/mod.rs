//! Column types for seed tables.
//!
//! Seeds are loaded from CSV files whose columns were inferred as text,
//! number, boolean or date/time values; each kind maps to a DM8 type.

use serde::{Deserialize, Serialize};

/// Smallest `varchar2` length used for text columns.
const MIN_TEXT_LENGTH: usize = 16;

/// Length used when a text column has no values.
const EMPTY_TEXT_LENGTH: usize = 64;

/// Kind of a seed column as inferred from its values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedColumnKind {
    Text,
    Number,
    Boolean,
    Date,
    DateTime,
    Time,
}

/// `varchar2(N)` sized to the longest value in UTF-8 bytes, at least 16.
pub fn convert_text_type<'a, I>(values: I) -> String
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let max_len = values
        .into_iter()
        .flatten()
        .map(str::len)
        .max()
        .unwrap_or(EMPTY_TEXT_LENGTH);
    format!("varchar2({})", max_len.max(MIN_TEXT_LENGTH))
}

pub fn convert_number_type() -> &'static str {
    "number"
}

pub fn convert_boolean_type() -> &'static str {
    "number(1)"
}

/// Dates, datetimes and times are all stored as `timestamp`.
pub fn convert_datetime_type() -> &'static str {
    "timestamp"
}

/// Map a seed column to its DM8 type.
pub fn seed_column_type<'a, I>(kind: SeedColumnKind, values: I) -> String
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    match kind {
        SeedColumnKind::Text => convert_text_type(values),
        SeedColumnKind::Number => convert_number_type().to_string(),
        SeedColumnKind::Boolean => convert_boolean_type().to_string(),
        SeedColumnKind::Date | SeedColumnKind::DateTime | SeedColumnKind::Time => {
            convert_datetime_type().to_string()
        }
    }
}
