//! Core traits for the adapter.
//!
//! - [`Dialect`]: SQL syntax strategy (identifier quoting)
//! - [`Connector`]: Opens driver sessions from credentials
//! - [`DriverSession`]: An open session that runs SQL
//!
//! # Design Patterns
//!
//! - **Strategy**: `Dialect` provides the quote function injected into
//!   [`IdentifierPolicy`](super::identifier::IdentifierPolicy)
//! - **Abstract Factory**: `Connector` creates sessions for the connection manager

use async_trait::async_trait;

use crate::config::DamengCredentials;
use crate::error::Result;

use super::value::QueryOutcome;

/// SQL syntax strategy for the target database engine.
pub trait Dialect: Send + Sync {
    /// Get the dialect identifier (e.g., "dameng").
    fn name(&self) -> &str;

    /// Quote an identifier (table name, column name, etc.).
    ///
    /// - Dameng: `"identifier"`
    fn quote_ident(&self, name: &str) -> String;

    /// Whether `name` is already a complete quoted identifier.
    fn is_quoted(&self, _name: &str) -> bool {
        false
    }
}

impl<D: Dialect + ?Sized> Dialect for &D {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn quote_ident(&self, name: &str) -> String {
        (**self).quote_ident(name)
    }

    fn is_quoted(&self, name: &str) -> bool {
        (**self).is_quoted(name)
    }
}

/// An open database session.
///
/// Sessions run in auto-commit mode; the connection manager only tracks
/// transaction bookkeeping for the host.
#[async_trait]
pub trait DriverSession: Send {
    /// Run one statement with positional text bindings.
    ///
    /// Returns the result set (empty for statements without one) and the
    /// number of affected or fetched rows.
    async fn execute(&mut self, sql: &str, bindings: &[Option<String>]) -> Result<QueryOutcome>;

    /// Close the session, releasing the server-side handle.
    async fn close(&mut self) -> Result<()>;
}

/// Opens driver sessions.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Session type produced by this connector.
    type Session: DriverSession;

    /// Open a session with the given credentials.
    ///
    /// Implementations switch to `credentials.database` as the current
    /// schema when it is set.
    async fn connect(&self, credentials: &DamengCredentials) -> Result<Self::Session>;
}
