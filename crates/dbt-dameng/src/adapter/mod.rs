//! The Dameng adapter: the methods the host calls while compiling and
//! running a project.
//!
//! Identifier decisions are delegated to [`IdentifierPolicy`]; catalog
//! methods run their queries over the [`ConnectionManager`].

mod grants;
mod sql;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;
use tracing::debug;

use crate::config::AdapterConfig;
use crate::connection::{AdapterResponse, ConnectionManager, ADAPTER_TYPE};
use crate::core::column::DamengColumn;
use crate::core::identifier::{ColumnQuoteConfig, IdentifierPolicy, SeedQuoteSetting};
use crate::core::relation::{make_match_kwargs, DamengRelation, RelationType};
use crate::core::traits::Connector;
use crate::core::value::ResultTable;
use crate::drivers::DamengDialect;
use crate::error::{AdapterError, Result};

pub use grants::{standardize_grants_dict, GrantsDict};

/// Name of the connection the adapter opens.
const DEFAULT_CONNECTION_NAME: &str = "master";

/// Set operator used by the rows-diff query unless another is given.
pub const DEFAULT_EXCEPT_OPERATOR: &str = "MINUS";

/// One column of one relation, as reported for documentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogRow {
    pub table_database: String,
    pub table_schema: String,
    pub table_name: String,
    pub table_type: String,
    pub table_comment: Option<String>,
    pub column_name: String,
    pub column_index: i64,
    pub column_type: String,
    pub column_comment: Option<String>,
    pub table_owner: String,
}

/// Adapter for DM8 over a [`Connector`].
pub struct DamengAdapter<C: Connector> {
    config: AdapterConfig,
    connections: ConnectionManager<C>,
    policy: IdentifierPolicy<'static, DamengDialect>,
    dialect: DamengDialect,
    database_name: OnceCell<String>,
}

impl<C: Connector> DamengAdapter<C> {
    pub fn new(config: AdapterConfig, connector: C) -> Self {
        let connections =
            ConnectionManager::new(DEFAULT_CONNECTION_NAME, config.credentials.clone(), connector);
        Self::with_connections(config, connections)
    }

    /// Build the adapter around an existing connection manager.
    pub fn with_connections(config: AdapterConfig, connections: ConnectionManager<C>) -> Self {
        Self {
            config,
            connections,
            policy: IdentifierPolicy::dameng(),
            dialect: DamengDialect::new(),
            database_name: OnceCell::new(),
        }
    }

    pub fn type_name(&self) -> &'static str {
        ADAPTER_TYPE
    }

    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    pub fn connections(&self) -> &ConnectionManager<C> {
        &self.connections
    }

    pub fn dialect(&self) -> &DamengDialect {
        &self.dialect
    }

    // Identifiers

    pub fn quote(&self, identifier: &str) -> String {
        self.policy.quote(identifier)
    }

    pub fn is_valid_identifier(&self, identifier: &str) -> Result<bool> {
        crate::core::identifier::is_valid_identifier(identifier)
    }

    pub fn should_identifier_be_quoted(
        &self,
        identifier: &str,
        columns: Option<&ColumnQuoteConfig>,
    ) -> Result<bool> {
        self.policy.should_identifier_be_quoted(identifier, columns)
    }

    pub fn check_and_quote_identifier(
        &self,
        identifier: &str,
        columns: Option<&ColumnQuoteConfig>,
    ) -> Result<String> {
        self.policy.check_and_quote_identifier(identifier, columns)
    }

    pub fn quote_seed_column(&self, column: &str, setting: &SeedQuoteSetting) -> Result<String> {
        self.policy.quote_seed_column(column, setting)
    }

    // SQL fragments

    pub fn date_function(&self) -> &'static str {
        self.dialect.date_function()
    }

    pub fn timestamp_add_sql(&self, add_to: &str, number: i64, interval: &str) -> String {
        self.dialect.timestamp_add_sql(add_to, number, interval)
    }

    pub fn valid_incremental_strategies(&self) -> &'static [&'static str] {
        self.dialect.valid_incremental_strategies()
    }

    /// Reject references to a database other than the configured one.
    ///
    /// Returns an empty string on success so templates can inline the call.
    pub fn verify_database(&self, database: &str) -> Result<String> {
        let database = if database.starts_with('"') {
            database.trim_matches('"')
        } else {
            database
        };

        if let Some(expected) = self.config.credentials.database() {
            if database.to_lowercase() != expected.to_lowercase() {
                return Err(AdapterError::runtime(format!(
                    "Cross-db references not allowed in {} ({} vs {})",
                    ADAPTER_TYPE, database, expected
                )));
            }
        }
        Ok(String::new())
    }

    /// Query comparing two relations over the given (or all of `relation_a`'s)
    /// columns, sorted by name.
    pub async fn get_rows_different_sql(
        &self,
        relation_a: &DamengRelation,
        relation_b: &DamengRelation,
        column_names: Option<&[String]>,
        except_operator: Option<&str>,
    ) -> Result<String> {
        let mut names: Vec<String> = match column_names {
            Some(names) => names.to_vec(),
            None => self
                .get_columns_in_relation(relation_a)
                .await?
                .into_iter()
                .map(|c| c.name)
                .collect(),
        };
        names.sort();

        Ok(sql::rows_different(
            &names.join(", "),
            &relation_a.to_string(),
            &relation_b.to_string(),
            except_operator.unwrap_or(DEFAULT_EXCEPT_OPERATOR),
        ))
    }

    // Catalog

    /// Run the connection check query.
    pub async fn debug_query(&self) -> Result<AdapterResponse> {
        let (response, _) = self.connections.execute(self.dialect.debug_query(), false).await?;
        Ok(response)
    }

    /// Run a statement and return its response and rows.
    pub async fn execute(&self, sql: &str, fetch: bool) -> Result<(AdapterResponse, ResultTable)> {
        self.connections.execute(sql, fetch).await
    }

    async fn query(&self, sql: &str, bindings: &[Option<String>]) -> Result<ResultTable> {
        let (_, table) = self
            .connections
            .add_query(sql, false, Some(bindings), false)
            .await?;
        Ok(table)
    }

    /// The configured database, or the server's database name.
    ///
    /// The server is asked at most once.
    pub async fn database_name(&self) -> Result<String> {
        if let Some(database) = self.config.credentials.database() {
            return Ok(database.to_string());
        }
        self.database_name
            .get_or_try_init(|| async {
                let table = self.query(sql::DATABASE_NAME, &[]).await?;
                table
                    .get(0, "database_name")
                    .map(str::to_string)
                    .ok_or_else(|| AdapterError::runtime("Could not determine the database name"))
            })
            .await
            .cloned()
    }

    /// Find one relation. A database of `"None"` means the configured one.
    ///
    /// # Errors
    ///
    /// Returns `AdapterError::Compilation` when more than one relation matches.
    pub async fn get_relation(
        &self,
        database: &str,
        schema: &str,
        identifier: &str,
    ) -> Result<Option<DamengRelation>> {
        let database = match database {
            "None" | "" => self.config.credentials.database().map(str::to_string),
            other => Some(other.to_string()),
        };

        let schema_relation = DamengRelation::create(database.as_deref(), Some(schema), None, None)
            .with_quote_policy(self.config.quoting);
        let criteria = make_match_kwargs(
            database.as_deref(),
            Some(schema),
            Some(identifier),
            &self.config.quoting,
        );

        let mut found: Vec<DamengRelation> = self
            .list_relations_without_caching(&schema_relation)
            .await?
            .into_iter()
            .filter(|r| r.matches(&criteria))
            .collect();

        match found.len() {
            0 | 1 => Ok(found.pop()),
            n => Err(AdapterError::Compilation(format!(
                "get_relation returned {} relations for {}.{} (expected at most one)",
                n, schema, identifier
            ))),
        }
    }

    /// Tables and views in the schema of `schema_relation`, read from the
    /// server.
    pub async fn list_relations_without_caching(
        &self,
        schema_relation: &DamengRelation,
    ) -> Result<Vec<DamengRelation>> {
        let database = match schema_relation.database.as_deref().filter(|d| !d.is_empty()) {
            Some(database) => database.to_string(),
            None => self.database_name().await?,
        };
        let schema = schema_relation.schema.as_deref().ok_or_else(|| {
            AdapterError::InvalidInput("Listing relations requires a schema".to_string())
        })?;
        let owner = catalog_name(schema, self.config.quoting.schema);

        let table = self
            .query(sql::LIST_RELATIONS, &[Some(owner.clone()), Some(owner)])
            .await?;

        let relations: Vec<DamengRelation> = (0..table.len())
            .filter_map(|row| {
                let name = table.get(row, "name")?;
                let schema = table.get(row, "schema_name")?;
                let kind = RelationType::from_catalog(table.get(row, "kind").unwrap_or_default());
                Some(
                    DamengRelation::create(Some(&database), Some(schema), Some(name), Some(kind))
                        .with_quote_policy(self.config.quoting),
                )
            })
            .collect();

        debug!("Found {} relations in {}", relations.len(), schema);
        Ok(relations)
    }

    /// All schema names on the server.
    pub async fn list_schemas(&self) -> Result<Vec<String>> {
        let table = self.query(sql::LIST_SCHEMAS, &[]).await?;
        Ok((0..table.len())
            .filter_map(|row| table.get(row, "schema_name").map(str::to_string))
            .collect())
    }

    /// Create a schema from the first dotted component of `name`.
    pub async fn create_schema(&self, name: &str, if_not_exists: bool) -> Result<AdapterResponse> {
        let statement = self.dialect.create_schema_sql(name, if_not_exists)?;
        let (response, _) = self.connections.execute(&statement, false).await?;
        Ok(response)
    }

    /// Tables owned by `schema`.
    pub async fn list_relations(&self, schema: &str) -> Result<Vec<DamengRelation>> {
        let owner = catalog_name(schema, self.config.quoting.schema);
        let table = self.query(sql::LIST_TABLES, &[Some(owner)]).await?;
        Ok((0..table.len())
            .filter_map(|row| table.get(row, "table_name"))
            .map(|name| {
                DamengRelation::create(None, Some(schema), Some(name), Some(RelationType::Table))
                    .with_quote_policy(self.config.quoting)
            })
            .collect())
    }

    /// Columns of a relation in column order.
    pub async fn get_columns_in_relation(
        &self,
        relation: &DamengRelation,
    ) -> Result<Vec<DamengColumn>> {
        let (Some(schema), Some(identifier)) =
            (relation.schema.as_deref(), relation.identifier.as_deref())
        else {
            return Err(AdapterError::InvalidInput(format!(
                "Relation '{}' needs a schema and an identifier to list columns",
                relation
            )));
        };
        let owner = catalog_name(schema, relation.quote_policy.schema);
        let table_name = catalog_name(identifier, relation.quote_policy.identifier);

        let table = self
            .query(
                sql::COLUMNS_IN_RELATION,
                &[Some(owner.clone()), Some(table_name.clone())],
            )
            .await?;

        let columns = (0..table.len())
            .filter_map(|row| {
                let name = table.get(row, "column_name")?;
                let data_type = table.get(row, "data_type")?;
                let mut column = DamengColumn::new(name, data_type, &table_name, &owner);
                if column.is_string() {
                    column.char_size = parse_int(table.get(row, "data_length"));
                }
                if column.is_numeric() {
                    column.numeric_precision = parse_int(table.get(row, "data_precision"));
                    column.numeric_scale = parse_int(table.get(row, "data_scale"));
                }
                column.comment = table.get(row, "column_comment").map(str::to_string);
                Some(column)
            })
            .collect();
        Ok(columns)
    }

    fn qualified_name(&self, schema: &str, identifier: &str) -> Result<String> {
        Ok(format!(
            "{}.{}",
            self.policy.check_and_quote_identifier(schema, None)?,
            self.policy.check_and_quote_identifier(identifier, None)?
        ))
    }

    /// Every row of `schema.identifier` as column → value maps.
    pub async fn get_rows(
        &self,
        schema: &str,
        identifier: &str,
    ) -> Result<Vec<BTreeMap<String, Option<String>>>> {
        let relation = self.qualified_name(schema, identifier)?;
        let table = self.query(&sql::select_all(&relation), &[]).await?;
        Ok(table.to_records())
    }

    /// Number of rows in `schema.table`.
    pub async fn get_record_count(&self, schema: &str, table: &str) -> Result<i64> {
        let relation = self.qualified_name(schema, table)?;
        let result = self.query(&sql::record_count(&relation), &[]).await?;
        parse_int(result.get(0, "record_count")).ok_or_else(|| {
            AdapterError::runtime(format!("Could not read the record count of {}", relation))
        })
    }

    /// Column-level catalog of the given schemas.
    ///
    /// Rows without a database take the configured (or server) database.
    pub async fn get_catalog(&self, schemas: &[String]) -> Result<Vec<CatalogRow>> {
        if schemas.is_empty() {
            return Ok(Vec::new());
        }
        let bindings: Vec<Option<String>> = schemas
            .iter()
            .map(|s| Some(catalog_name(s, self.config.quoting.schema)))
            .collect();
        let table = self.query(&sql::catalog(schemas.len()), &bindings).await?;

        let mut database: Option<String> = None;
        let mut rows = Vec::with_capacity(table.len());
        for row in 0..table.len() {
            let text = |column: &str| table.get(row, column).unwrap_or_default().to_string();
            let optional = |column: &str| table.get(row, column).map(str::to_string);

            let mut table_database = text("table_database");
            if table_database.is_empty() || table_database == "None" {
                if database.is_none() {
                    database = Some(self.database_name().await?);
                }
                table_database = database.clone().unwrap_or_default();
            }

            rows.push(CatalogRow {
                table_database,
                table_schema: text("table_schema"),
                table_name: text("table_name"),
                table_type: text("table_type"),
                table_comment: optional("table_comment"),
                column_name: text("column_name"),
                column_index: parse_int(table.get(row, "column_index")).unwrap_or_default(),
                column_type: text("column_type"),
                column_comment: optional("column_comment"),
                table_owner: text("table_owner"),
            });
        }
        Ok(rows)
    }

    /// See [`standardize_grants_dict`].
    pub fn standardize_grants_dict(&self, grants_table: &ResultTable) -> Result<GrantsDict> {
        standardize_grants_dict(grants_table)
    }
}

/// Name as stored in the catalog: DM8 folds unquoted names to uppercase.
fn catalog_name(name: &str, quoted: bool) -> String {
    if quoted {
        name.to_string()
    } else {
        name.to_uppercase()
    }
}

fn parse_int(value: Option<&str>) -> Option<i64> {
    let value = value?.trim();
    value
        .parse::<i64>()
        .ok()
        .or_else(|| value.parse::<f64>().ok().map(|v| v as i64))
}
