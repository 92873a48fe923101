//! Dameng (DM8) driver.
//!
//! - [`DamengDialect`]: SQL syntax strategy for DM8
//! - [`OdbcConnector`]: Sessions through the DM8 ODBC driver (`odbc` feature)

mod dialect;
#[cfg(feature = "odbc")]
mod odbc;

pub use dialect::DamengDialect;
#[cfg(feature = "odbc")]
pub use odbc::{OdbcConnector, OdbcSession};
