//! Adapter integration tests.
//!
//! Catalog methods run against a scripted driver; the tests check both the
//! statements issued (and their bindings) and how results are shaped.

mod common;

use common::{adapter, credentials, outcome, table, ScriptedConnector};
use dbt_dameng::{
    AdapterConfig, AdapterError, ColumnQuote, ColumnQuoteConfig, DamengAdapter, DamengRelation,
    QuotePolicy, RelationType, ResultTable, SeedQuoteSetting,
};

/// Answers the catalog queries the adapter issues with fixed data.
fn catalog_connector() -> ScriptedConnector {
    ScriptedConnector::new(|sql, bindings| {
        let result = if sql.contains("v$database") {
            table(&["DATABASE_NAME"], &[&[Some("DAMENG")]])
        } else if sql.contains("from all_tables t") {
            let owner = bindings[0].as_deref();
            table(
                &["NAME", "SCHEMA_NAME", "KIND"],
                &[
                    &[Some("ORDERS"), owner, Some("table")],
                    &[Some("CUSTOMERS"), owner, Some("table")],
                    &[Some("ORDERS_V"), owner, Some("view")],
                    &[Some("ORDERS_SYN"), owner, Some("synonym")],
                ],
            )
        } else if sql.contains("ALL_OBJECTS") {
            table(
                &[
                    "TABLE_DATABASE",
                    "TABLE_SCHEMA",
                    "TABLE_NAME",
                    "TABLE_TYPE",
                    "TABLE_COMMENT",
                    "COLUMN_NAME",
                    "COLUMN_INDEX",
                    "COLUMN_TYPE",
                    "COLUMN_COMMENT",
                    "TABLE_OWNER",
                ],
                &[
                    &[
                        Some(""),
                        Some("DBT_TEST"),
                        Some("ORDERS"),
                        Some("BASE TABLE"),
                        Some("Customer orders"),
                        Some("ID"),
                        Some("1"),
                        Some("INT"),
                        None,
                        Some("DBT_TEST"),
                    ],
                    &[
                        Some(""),
                        Some("DBT_TEST"),
                        Some("ORDERS"),
                        Some("BASE TABLE"),
                        Some("Customer orders"),
                        Some("AMOUNT"),
                        Some("2"),
                        Some("DECIMAL(10,2)"),
                        Some("Order total"),
                        Some("DBT_TEST"),
                    ],
                ],
            )
        } else if sql.contains("ALL_TAB_COLUMNS") {
            table(
                &[
                    "COLUMN_ID",
                    "COLUMN_NAME",
                    "DATA_TYPE",
                    "DATA_LENGTH",
                    "DATA_PRECISION",
                    "DATA_SCALE",
                    "COLUMN_COMMENT",
                ],
                &[
                    &[Some("1"), Some("NAME"), Some("VARCHAR"), Some("50"), None, None, None],
                    &[Some("2"), Some("ID"), Some("INT"), Some("4"), Some("10"), Some("0"), None],
                    &[
                        Some("3"),
                        Some("AMOUNT"),
                        Some("DECIMAL"),
                        Some("9"),
                        Some("10"),
                        Some("2"),
                        Some("Order total"),
                    ],
                ],
            )
        } else if sql.contains("SYSOBJECTS") {
            table(&["SCHEMA_NAME"], &[&[Some("DBT_TEST")], &[Some("SYSDBA")]])
        } else if sql.contains("dba_tables") {
            table(&["TABLE_NAME"], &[&[Some("ORDERS")], &[Some("CUSTOMERS")]])
        } else if sql.starts_with("select count(1)") {
            table(&["RECORD_COUNT"], &[&[Some("42")]])
        } else if sql.starts_with("SELECT * FROM") {
            table(
                &["ID", "NAME"],
                &[&[Some("1"), Some("alice")], &[Some("2"), None]],
            )
        } else {
            ResultTable::default()
        };
        Ok(outcome(sql, result))
    })
}

fn adapter_without_database(connector: ScriptedConnector) -> DamengAdapter<ScriptedConnector> {
    let mut creds = credentials();
    creds.database = None;
    DamengAdapter::new(AdapterConfig::new(creds), connector)
}

// =============================================================================
// Identifiers
// =============================================================================

#[test]
fn test_identifier_methods_delegate_to_policy() {
    let adapter = adapter(ScriptedConnector::empty());

    assert_eq!(adapter.quote("order"), "\"order\"");
    assert!(adapter.is_valid_identifier("my_col#1").unwrap());
    assert!(!adapter.is_valid_identifier("1abc").unwrap());
    assert!(matches!(
        adapter.is_valid_identifier(""),
        Err(AdapterError::InvalidInput(_))
    ));

    let mut columns = ColumnQuoteConfig::new();
    columns.insert("id".to_string(), ColumnQuote::new(true));
    assert!(adapter.should_identifier_be_quoted("id", Some(&columns)).unwrap());
    assert_eq!(
        adapter.check_and_quote_identifier("id", Some(&columns)).unwrap(),
        "\"id\""
    );
    assert_eq!(adapter.check_and_quote_identifier("SELECT", None).unwrap(), "\"SELECT\"");

    assert_eq!(
        adapter.quote_seed_column("Col1", &SeedQuoteSetting::Flag(true)).unwrap(),
        "\"Col1\""
    );
    assert_eq!(
        adapter.quote_seed_column("col1", &SeedQuoteSetting::Unspecified).unwrap(),
        "col1"
    );
    let invalid = SeedQuoteSetting::Invalid(serde_yaml::Value::String("yes".into()));
    assert!(matches!(
        adapter.quote_seed_column("col1", &invalid),
        Err(AdapterError::Compilation(_))
    ));
}

#[test]
fn test_sql_fragments() {
    let adapter = adapter(ScriptedConnector::empty());
    assert_eq!(adapter.type_name(), "dameng");
    assert_eq!(adapter.date_function(), "CURRENT_DATE");
    assert_eq!(
        adapter.timestamp_add_sql("created_at", 2, "day"),
        "created_at + interval '2' day"
    );
    assert_eq!(adapter.valid_incremental_strategies(), &["append", "merge"]);
}

// =============================================================================
// verify_database
// =============================================================================

#[test]
fn test_verify_database() {
    let adapter = adapter(ScriptedConnector::empty());

    assert_eq!(adapter.verify_database("DBT_TEST").unwrap(), "");
    assert_eq!(adapter.verify_database("dbt_test").unwrap(), "");
    assert_eq!(adapter.verify_database("\"DBT_TEST\"").unwrap(), "");

    let err = adapter.verify_database("OTHER_DB").unwrap_err();
    match err {
        AdapterError::Runtime(msg) => assert_eq!(
            msg,
            "Cross-db references not allowed in dameng (OTHER_DB vs DBT_TEST)"
        ),
        other => panic!("expected runtime error, got {other:?}"),
    }
}

#[test]
fn test_verify_database_without_configured_database() {
    let adapter = adapter_without_database(ScriptedConnector::empty());
    assert_eq!(adapter.verify_database("ANYTHING").unwrap(), "");
}

// =============================================================================
// Rows diff
// =============================================================================

#[tokio::test]
async fn test_rows_different_sql_with_columns() {
    let connector = ScriptedConnector::empty();
    let adapter = adapter(connector.clone());
    let a = DamengRelation::create(None, Some("dbt_test"), Some("table_a"), None);
    let b = DamengRelation::create(None, Some("dbt_test"), Some("table_b"), None);

    let columns = vec!["name".to_string(), "id".to_string()];
    let sql = adapter
        .get_rows_different_sql(&a, &b, Some(&columns[..]), None)
        .await
        .unwrap();

    assert!(sql.contains("(SELECT id, name FROM dbt_test.table_a MINUS"));
    assert!(sql.contains("SELECT COUNT(*) as num_rows FROM dbt_test.table_b"));
    assert!(sql.contains("table_a_56c36b"));
    assert!(connector.executed().is_empty());
}

#[tokio::test]
async fn test_rows_different_sql_reads_columns_of_first_relation() {
    let connector = catalog_connector();
    let adapter = adapter(connector.clone());
    let a = DamengRelation::create(None, Some("dbt_test"), Some("orders"), None);
    let b = DamengRelation::create(None, Some("dbt_test"), Some("orders_copy"), None);

    let sql = adapter
        .get_rows_different_sql(&a, &b, None, Some("EXCEPT"))
        .await
        .unwrap();

    assert!(sql.contains("(SELECT AMOUNT, ID, NAME FROM dbt_test.orders EXCEPT"));
    let executed = connector.executed();
    assert_eq!(executed.len(), 1);
    assert_eq!(
        executed[0].bindings,
        vec![Some("DBT_TEST".to_string()), Some("ORDERS".to_string())]
    );
}

// =============================================================================
// Relations
// =============================================================================

#[tokio::test]
async fn test_list_relations_without_caching() {
    let connector = catalog_connector();
    let adapter = adapter(connector.clone());
    let schema = DamengRelation::create(None, Some("dbt_test"), None, None);

    let relations = adapter
        .list_relations_without_caching(&schema)
        .await
        .unwrap();

    assert_eq!(relations.len(), 4);
    assert_eq!(relations[0].identifier.as_deref(), Some("ORDERS"));
    assert_eq!(relations[0].database.as_deref(), Some("DBT_TEST"));
    assert_eq!(relations[0].relation_type, Some(RelationType::Table));
    assert_eq!(relations[2].relation_type, Some(RelationType::View));
    assert_eq!(relations[3].relation_type, Some(RelationType::External));

    let executed = connector.executed();
    assert_eq!(executed.len(), 1);
    assert_eq!(
        executed[0].bindings,
        vec![Some("DBT_TEST".to_string()), Some("DBT_TEST".to_string())]
    );
}

#[tokio::test]
async fn test_database_name_is_queried_once_when_unset() {
    let connector = catalog_connector();
    let adapter = adapter_without_database(connector.clone());
    let schema = DamengRelation::create(None, Some("dbt_test"), None, None);

    let first = adapter.list_relations_without_caching(&schema).await.unwrap();
    adapter.list_relations_without_caching(&schema).await.unwrap();

    assert_eq!(first[0].database.as_deref(), Some("DAMENG"));
    let lookups = connector
        .executed_sql()
        .iter()
        .filter(|sql| sql.contains("v$database"))
        .count();
    assert_eq!(lookups, 1);
}

#[tokio::test]
async fn test_list_relations_requires_schema() {
    let adapter = adapter(catalog_connector());
    let no_schema = DamengRelation::create(Some("DBT_TEST"), None, None, None);
    assert!(matches!(
        adapter.list_relations_without_caching(&no_schema).await,
        Err(AdapterError::InvalidInput(_))
    ));
}

#[tokio::test]
async fn test_get_relation() {
    let adapter = adapter(catalog_connector());

    let relation = adapter
        .get_relation("None", "dbt_test", "orders")
        .await
        .unwrap()
        .expect("orders should be found");
    assert_eq!(relation.identifier.as_deref(), Some("ORDERS"));
    assert_eq!(relation.database.as_deref(), Some("DBT_TEST"));
    assert!(relation.is_table());

    let view = adapter
        .get_relation("DBT_TEST", "dbt_test", "orders_v")
        .await
        .unwrap()
        .expect("view should be found");
    assert!(view.is_view());

    assert!(adapter
        .get_relation("None", "dbt_test", "missing")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_get_relation_with_quoted_identifiers() {
    let config = AdapterConfig::new(credentials()).with_quoting(QuotePolicy {
        database: true,
        schema: false,
        identifier: true,
    });
    let adapter = DamengAdapter::new(config, catalog_connector());

    // Quoted identifiers are not folded, so case must match exactly
    assert!(adapter
        .get_relation("None", "dbt_test", "orders")
        .await
        .unwrap()
        .is_none());
    assert!(adapter
        .get_relation("None", "dbt_test", "ORDERS")
        .await
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn test_get_relation_with_duplicates_is_an_error() {
    let connector = ScriptedConnector::new(|sql, _| {
        Ok(outcome(
            sql,
            table(
                &["NAME", "SCHEMA_NAME", "KIND"],
                &[
                    &[Some("ORDERS"), Some("DBT_TEST"), Some("table")],
                    &[Some("orders"), Some("DBT_TEST"), Some("view")],
                ],
            ),
        ))
    });
    let adapter = adapter(connector);

    assert!(matches!(
        adapter.get_relation("None", "dbt_test", "orders").await,
        Err(AdapterError::Compilation(_))
    ));
}

#[tokio::test]
async fn test_list_relations() {
    let adapter = adapter(catalog_connector());
    let relations = adapter.list_relations("dbt_test").await.unwrap();

    let names: Vec<_> = relations
        .iter()
        .filter_map(|r| r.identifier.as_deref())
        .collect();
    assert_eq!(names, vec!["ORDERS", "CUSTOMERS"]);
    assert!(relations.iter().all(|r| r.is_table()));
    assert_eq!(relations[0].schema.as_deref(), Some("dbt_test"));
}

#[tokio::test]
async fn test_list_schemas() {
    let adapter = adapter(catalog_connector());
    assert_eq!(
        adapter.list_schemas().await.unwrap(),
        vec!["DBT_TEST", "SYSDBA"]
    );
}

#[tokio::test]
async fn test_create_schema_uses_first_component() {
    let connector = ScriptedConnector::empty();
    let adapter = adapter(connector.clone());

    adapter.create_schema("analytics.orders", true).await.unwrap();
    adapter.create_schema("staging", false).await.unwrap();

    assert_eq!(
        connector.executed_sql(),
        vec!["CREATE SCHEMA IF NOT EXISTS analytics", "CREATE SCHEMA staging"]
    );
}

// =============================================================================
// Columns and Rows
// =============================================================================

#[tokio::test]
async fn test_get_columns_in_relation() {
    let adapter = adapter(catalog_connector());
    let relation = DamengRelation::create(None, Some("dbt_test"), Some("orders"), None);

    let columns = adapter.get_columns_in_relation(&relation).await.unwrap();

    assert_eq!(columns.len(), 3);
    assert_eq!(columns[0].name, "NAME");
    assert_eq!(columns[0].data_type_string(), "VARCHAR(50)");
    assert_eq!(columns[0].table_name, "ORDERS");
    assert_eq!(columns[0].table_schema, "DBT_TEST");
    assert_eq!(columns[1].data_type_string(), "INT");
    assert_eq!(columns[2].data_type_string(), "DECIMAL(10,2)");
    assert_eq!(columns[2].comment.as_deref(), Some("Order total"));
}

#[tokio::test]
async fn test_get_columns_requires_identifier() {
    let adapter = adapter(catalog_connector());
    let relation = DamengRelation::create(None, Some("dbt_test"), None, None);
    assert!(matches!(
        adapter.get_columns_in_relation(&relation).await,
        Err(AdapterError::InvalidInput(_))
    ));
}

#[tokio::test]
async fn test_get_rows() {
    let connector = catalog_connector();
    let adapter = adapter(connector.clone());

    let rows = adapter.get_rows("dbt_test", "order").await.unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["ID"].as_deref(), Some("1"));
    assert_eq!(rows[0]["NAME"].as_deref(), Some("alice"));
    assert_eq!(rows[1]["NAME"], None);
    // "order" is a reserved word
    assert_eq!(connector.executed_sql(), vec!["SELECT * FROM dbt_test.\"order\""]);
}

#[tokio::test]
async fn test_get_record_count() {
    let connector = catalog_connector();
    let adapter = adapter(connector.clone());

    assert_eq!(adapter.get_record_count("DBT_TEST", "ORDERS").await.unwrap(), 42);
    assert_eq!(
        connector.executed_sql(),
        vec!["select count(1) as record_count from DBT_TEST.ORDERS"]
    );
}

#[tokio::test]
async fn test_get_record_count_without_result() {
    let adapter = adapter(ScriptedConnector::empty());
    assert!(matches!(
        adapter.get_record_count("DBT_TEST", "ORDERS").await,
        Err(AdapterError::Runtime(_))
    ));
}

// =============================================================================
// Catalog
// =============================================================================

#[tokio::test]
async fn test_get_catalog_fills_database() {
    let connector = catalog_connector();
    let adapter = adapter(connector.clone());

    let rows = adapter
        .get_catalog(&["dbt_test".to_string()])
        .await
        .unwrap();

    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.table_database == "DBT_TEST"));
    assert_eq!(rows[1].column_name, "AMOUNT");
    assert_eq!(rows[1].column_index, 2);
    assert_eq!(rows[1].column_type, "DECIMAL(10,2)");
    assert_eq!(rows[0].column_comment, None);
    assert_eq!(rows[0].table_comment.as_deref(), Some("Customer orders"));

    let executed = connector.executed();
    assert_eq!(executed[0].bindings, vec![Some("DBT_TEST".to_string())]);
}

#[tokio::test]
async fn test_get_catalog_without_schemas() {
    let connector = catalog_connector();
    let adapter = adapter(connector.clone());
    assert!(adapter.get_catalog(&[]).await.unwrap().is_empty());
    assert!(connector.executed().is_empty());
}

// =============================================================================
// Grants and Connection Check
// =============================================================================

#[test]
fn test_standardize_grants_dict() {
    let adapter = adapter(ScriptedConnector::empty());
    let grants = table(
        &["grantor", "privilege"],
        &[
            &[Some("ANALYST"), Some("SELECT")],
            &[Some("ANALYST"), Some("INDEX")],
            &[Some("REPORTER"), Some("SELECT")],
        ],
    );
    let dict = adapter.standardize_grants_dict(&grants).unwrap();
    assert_eq!(dict.len(), 1);
    assert_eq!(dict["SELECT"], vec!["ANALYST", "REPORTER"]);
}

#[tokio::test]
async fn test_debug_query() {
    let connector = ScriptedConnector::empty();
    let adapter = adapter(connector.clone());

    let response = adapter.debug_query().await.unwrap();

    assert_eq!(response.code, "SELECT");
    assert_eq!(connector.executed_sql(), vec!["select 1 as id from dual"]);
}
