//! # dbt-dameng
//!
//! Dameng (DM8) adapter for dbt.
//!
//! The adapter sits underneath the host framework and provides:
//!
//! - **Identifier quoting** decisions based on DM8's reserved words, its
//!   unquoted-identifier rules and per-column model configuration
//! - **Connection management** with retries, cancellation and error mapping
//! - **Catalog queries** for relations, columns, rows and documentation
//! - **Seed type mapping** from inferred CSV column kinds to DM8 types
//!
//! ## Example
//!
//! ```rust
//! use dbt_dameng::{IdentifierPolicy, SeedQuoteSetting};
//!
//! let policy = IdentifierPolicy::dameng();
//! assert_eq!(policy.check_and_quote_identifier("order_id", None)?, "order_id");
//! assert_eq!(policy.check_and_quote_identifier("select", None)?, "\"select\"");
//! assert_eq!(policy.quote_seed_column("1st", &SeedQuoteSetting::Unspecified)?, "\"1st\"");
//! # Ok::<(), dbt_dameng::AdapterError>(())
//! ```
//!
//! With the `odbc` feature, [`OdbcConnector`] connects through the DM8 ODBC
//! driver:
//!
//! ```rust,ignore
//! use dbt_dameng::{AdapterConfig, DamengAdapter, OdbcConnector, ProfileConfig};
//!
//! let credentials = ProfileConfig::load("profiles.yml")?.credentials("my_project", None)?;
//! let adapter = DamengAdapter::new(AdapterConfig::new(credentials), OdbcConnector::new());
//! adapter.debug_query().await?;
//! ```

pub mod adapter;
pub mod config;
pub mod connection;
pub mod core;
pub mod drivers;
pub mod error;
pub mod typemap;

// Re-exports for convenient access
pub use adapter::{standardize_grants_dict, CatalogRow, DamengAdapter, GrantsDict};
pub use config::{AdapterConfig, DamengCredentials, Profile, ProfileConfig};
pub use connection::{AdapterResponse, ConnectionManager, ConnectionState};
pub use crate::core::{
    is_valid_identifier, make_match_kwargs, parse_column_quote_config, ColumnQuote,
    ColumnQuoteConfig, Connector, DamengColumn, DamengRelation, Dialect, DriverSession,
    IdentifierPolicy, IncludePolicy, KeywordSet, QueryOutcome, QuotePolicy, RelationMatch,
    RelationType, ResultTable, SeedQuoteSetting,
};
pub use drivers::DamengDialect;
#[cfg(feature = "odbc")]
pub use drivers::{OdbcConnector, OdbcSession};
pub use error::{AdapterError, Result};
pub use typemap::{seed_column_type, SeedColumnKind};
