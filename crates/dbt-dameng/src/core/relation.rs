//! Relation (table/view) references.
//!
//! DM8 addresses objects as `schema.identifier`; the database part is kept
//! for matching against host references but is not rendered by default.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::drivers::DamengDialect;
use crate::error::AdapterError;

use super::traits::Dialect;

/// Kind of relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationType {
    Table,
    View,
    Cte,
    MaterializedView,
    External,
}

impl RelationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationType::Table => "table",
            RelationType::View => "view",
            RelationType::Cte => "cte",
            RelationType::MaterializedView => "materialized_view",
            RelationType::External => "external",
        }
    }

    /// Map a catalog type string, treating unknown kinds as external.
    pub fn from_catalog(value: &str) -> Self {
        value.parse().unwrap_or(RelationType::External)
    }
}

impl FromStr for RelationType {
    type Err = AdapterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(' ', "_").as_str() {
            "table" => Ok(RelationType::Table),
            "view" => Ok(RelationType::View),
            "cte" => Ok(RelationType::Cte),
            "materialized_view" => Ok(RelationType::MaterializedView),
            "external" => Ok(RelationType::External),
            other => Err(AdapterError::InvalidInput(format!(
                "unknown relation type '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for RelationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which relation parts are quoted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuotePolicy {
    pub database: bool,
    pub schema: bool,
    pub identifier: bool,
}

impl Default for QuotePolicy {
    fn default() -> Self {
        Self {
            database: true,
            schema: false,
            identifier: false,
        }
    }
}

/// Which relation parts are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IncludePolicy {
    pub database: bool,
    pub schema: bool,
    pub identifier: bool,
}

impl Default for IncludePolicy {
    fn default() -> Self {
        Self {
            database: false,
            schema: true,
            identifier: true,
        }
    }
}

/// Search criteria for a relation; absent parts match anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationMatch {
    pub database: Option<String>,
    pub schema: Option<String>,
    pub identifier: Option<String>,
}

/// Build match criteria, uppercasing every part that is not quoted.
///
/// DM8 folds unquoted names to uppercase, so that is how they appear in
/// the catalog.
pub fn make_match_kwargs(
    database: Option<&str>,
    schema: Option<&str>,
    identifier: Option<&str>,
    quoting: &QuotePolicy,
) -> RelationMatch {
    let fold = |part: Option<&str>, quoted: bool| {
        part.map(|p| if quoted { p.to_string() } else { p.to_uppercase() })
    };

    RelationMatch {
        database: fold(database, quoting.database),
        schema: fold(schema, quoting.schema),
        identifier: fold(identifier, quoting.identifier),
    }
}

/// A table, view or other relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamengRelation {
    pub database: Option<String>,
    pub schema: Option<String>,
    pub identifier: Option<String>,
    pub relation_type: Option<RelationType>,
    #[serde(default)]
    pub quote_policy: QuotePolicy,
    #[serde(default)]
    pub include_policy: IncludePolicy,
}

impl DamengRelation {
    pub fn create(
        database: Option<&str>,
        schema: Option<&str>,
        identifier: Option<&str>,
        relation_type: Option<RelationType>,
    ) -> Self {
        Self {
            database: database.map(str::to_string),
            schema: schema.map(str::to_string),
            identifier: identifier.map(str::to_string),
            relation_type,
            quote_policy: QuotePolicy::default(),
            include_policy: IncludePolicy::default(),
        }
    }

    pub fn with_quote_policy(mut self, quote_policy: QuotePolicy) -> Self {
        self.quote_policy = quote_policy;
        self
    }

    pub fn with_include_policy(mut self, include_policy: IncludePolicy) -> Self {
        self.include_policy = include_policy;
        self
    }

    /// Name of the CTE an ephemeral model is inlined as.
    pub fn add_ephemeral_prefix(name: &str) -> String {
        format!("dbt__cte__{}__", name)
    }

    pub fn is_table(&self) -> bool {
        self.relation_type == Some(RelationType::Table)
    }

    pub fn is_view(&self) -> bool {
        self.relation_type == Some(RelationType::View)
    }

    /// Render as SQL, e.g. `DBT_TEST.orders` or `"Sales"."orders"`.
    pub fn render(&self) -> String {
        let dialect = DamengDialect::new();
        let parts = [
            (&self.database, self.include_policy.database, self.quote_policy.database),
            (&self.schema, self.include_policy.schema, self.quote_policy.schema),
            (&self.identifier, self.include_policy.identifier, self.quote_policy.identifier),
        ];

        parts
            .iter()
            .filter_map(|(part, include, quote)| match part {
                Some(p) if *include && !p.is_empty() => Some(if *quote {
                    dialect.quote_ident(p)
                } else {
                    p.clone()
                }),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Whether this relation satisfies the criteria.
    ///
    /// Quoted parts compare exactly, unquoted parts case-insensitively.
    pub fn matches(&self, criteria: &RelationMatch) -> bool {
        let part_matches = |mine: &Option<String>, wanted: &Option<String>, quoted: bool| {
            match (mine, wanted) {
                (_, None) => true,
                (None, Some(_)) => false,
                (Some(m), Some(w)) if quoted => m == w,
                (Some(m), Some(w)) => m.eq_ignore_ascii_case(w),
            }
        };

        part_matches(&self.database, &criteria.database, self.quote_policy.database)
            && part_matches(&self.schema, &criteria.schema, self.quote_policy.schema)
            && part_matches(&self.identifier, &criteria.identifier, self.quote_policy.identifier)
    }
}

impl fmt::Display for DamengRelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
