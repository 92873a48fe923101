//! Core abstractions for the Dameng adapter.
//!
//! - [`identifier`]: Identifier validation and quoting decisions
//! - [`keywords`]: DM8 reserved words
//! - [`relation`]: Relation references and quote/include policies
//! - [`column`]: Column metadata
//! - [`value`]: Query results
//! - [`traits`]: Dialect and driver traits
//!
//! Nothing in `identifier` depends on a connection; the connection and
//! catalog layers build on `traits` and `value`.

pub mod column;
pub mod identifier;
pub mod keywords;
pub mod relation;
pub mod traits;
pub mod value;

pub use column::DamengColumn;
pub use identifier::{
    is_valid_identifier, parse_column_quote_config, ColumnQuote, ColumnQuoteConfig,
    IdentifierPolicy, SeedQuoteSetting,
};
pub use keywords::KeywordSet;
pub use relation::{
    make_match_kwargs, DamengRelation, IncludePolicy, QuotePolicy, RelationMatch, RelationType,
};
pub use traits::{Connector, Dialect, DriverSession};
pub use value::{QueryOutcome, ResultTable};
