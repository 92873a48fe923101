//! Database driver implementations.
//!
//! - [`dameng`]: DM8 dialect and (with the `odbc` feature) the ODBC connector
//!
//! # Adding a Driver
//!
//! A driver implements [`Connector`](crate::core::Connector) and
//! [`DriverSession`](crate::core::DriverSession); the connection manager and
//! adapter are generic over the connector.

pub mod dameng;

pub use dameng::DamengDialect;
#[cfg(feature = "odbc")]
pub use dameng::{OdbcConnector, OdbcSession};
