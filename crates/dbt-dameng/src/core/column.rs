//! Column metadata as read from the DM8 catalog.

use serde::{Deserialize, Serialize};

/// A column of a relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamengColumn {
    /// Column name.
    pub name: String,

    /// Base type name (e.g. "VARCHAR", "DECIMAL").
    pub data_type: String,

    /// Owning table.
    pub table_name: String,

    /// Owning schema.
    pub table_schema: String,

    /// Character length for string types.
    #[serde(default)]
    pub char_size: Option<i64>,

    /// Precision for numeric types.
    #[serde(default)]
    pub numeric_precision: Option<i64>,

    /// Scale for numeric types.
    #[serde(default)]
    pub numeric_scale: Option<i64>,

    /// Column comment.
    #[serde(default)]
    pub comment: Option<String>,
}

impl DamengColumn {
    pub fn new(
        name: impl Into<String>,
        data_type: impl Into<String>,
        table_name: impl Into<String>,
        table_schema: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            table_name: table_name.into(),
            table_schema: table_schema.into(),
            char_size: None,
            numeric_precision: None,
            numeric_scale: None,
            comment: None,
        }
    }

    pub fn is_string(&self) -> bool {
        matches!(
            self.data_type.to_uppercase().as_str(),
            "CHAR" | "CHARACTER" | "VARCHAR" | "VARCHAR2" | "NVARCHAR" | "TEXT" | "CLOB"
        )
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self.data_type.to_uppercase().as_str(),
            "DEC" | "DECIMAL" | "NUMBER" | "NUMERIC"
        )
    }

    /// Full type, with length for character types and precision/scale for decimals.
    pub fn data_type_string(&self) -> String {
        let base = self.data_type.to_uppercase();
        match base.as_str() {
            "VARCHAR" | "VARCHAR2" | "CHAR" => match self.char_size {
                Some(size) => format!("{}({})", base, size),
                None => base,
            },
            "DEC" | "DECIMAL" => match (self.numeric_precision, self.numeric_scale) {
                (Some(p), Some(s)) => format!("{}({},{})", base, p, s),
                (Some(p), None) => format!("{}({})", base, p),
                _ => base,
            },
            _ => base,
        }
    }
}
