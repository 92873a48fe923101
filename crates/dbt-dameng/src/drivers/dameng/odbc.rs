//! ODBC-based DM8 sessions.
//!
//! **Requirements:**
//! - The `odbc` feature must be enabled
//! - unixODBC (Linux/macOS) and the DM8 ODBC driver must be installed and
//!   registered under the name configured in `driver`
//!   (default `DM8 ODBC DRIVER`)

use std::sync::OnceLock;

use async_trait::async_trait;
use odbc_api::{
    buffers::TextRowSet, parameter::VarCharBox, ConnectionOptions, Cursor, Environment,
    IntoParameter, ResultSetMetadata,
};
use tracing::{debug, info};

use crate::config::DamengCredentials;
use crate::connection::statement_kind;
use crate::core::traits::{Connector, DriverSession};
use crate::core::value::{QueryOutcome, ResultTable};
use crate::error::{AdapterError, Result};

/// Rows fetched per round trip.
const FETCH_BATCH_SIZE: usize = 1000;

/// Upper bound for a single text value in the fetch buffer.
const MAX_TEXT_LENGTH: usize = 65536;

/// Process-wide ODBC environment, created on first connect.
fn odbc_environment() -> Result<&'static Environment> {
    static ENVIRONMENT: OnceLock<Environment> = OnceLock::new();

    if let Some(env) = ENVIRONMENT.get() {
        return Ok(env);
    }
    let env = Environment::new().map_err(|e| {
        AdapterError::FailedToConnect(format!(
            "Failed to create ODBC environment: {}. \
             Make sure unixODBC and the DM8 ODBC driver are installed.",
            e
        ))
    })?;
    Ok(ENVIRONMENT.get_or_init(|| env))
}

fn database_error(e: odbc_api::Error) -> AdapterError {
    AdapterError::database(e.to_string())
}

/// Opens DM8 sessions through ODBC.
#[derive(Debug, Clone, Copy, Default)]
pub struct OdbcConnector;

impl OdbcConnector {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Connector for OdbcConnector {
    type Session = OdbcSession;

    async fn connect(&self, credentials: &DamengCredentials) -> Result<OdbcSession> {
        let env = odbc_environment()?;

        debug!(
            "ODBC connection string (credentials hidden): Driver={{{}}};Server={};TCP_Port={};...",
            credentials.driver, credentials.host, credentials.port
        );

        let conn = env
            .connect_with_connection_string(
                &credentials.connection_string(),
                ConnectionOptions {
                    login_timeout_sec: credentials.login_timeout_secs,
                    ..ConnectionOptions::default()
                },
            )
            .map_err(|e| {
                AdapterError::FailedToConnect(format!(
                    "Failed to connect to {}:{} as {}: {}",
                    credentials.host, credentials.port, credentials.user, e
                ))
            })?;

        let mut session = OdbcSession { conn: Some(conn) };

        if let Some(database) = credentials.database() {
            session
                .run(&format!("set schema {}", database), &[])
                .map_err(|e| AdapterError::FailedToConnect(e.to_string()))?;
        }

        info!(
            "Connected to Dameng via ODBC: {}:{} (schema {})",
            credentials.host,
            credentials.port,
            credentials.database().unwrap_or(credentials.schema.as_str())
        );

        Ok(session)
    }
}

/// An open ODBC connection to DM8.
pub struct OdbcSession {
    conn: Option<odbc_api::Connection<'static>>,
}

impl OdbcSession {
    fn run(&mut self, sql: &str, bindings: &[Option<String>]) -> Result<QueryOutcome> {
        let conn = self
            .conn
            .as_ref()
            .ok_or_else(|| AdapterError::runtime("ODBC session is closed"))?;

        let params: Vec<VarCharBox> = bindings
            .iter()
            .map(|b| b.clone().into_parameter())
            .collect();

        let mut stmt = conn.preallocate().map_err(database_error)?;
        let mut table = ResultTable::default();

        let fetched = if let Some(mut cursor) =
            stmt.execute(sql, &params[..]).map_err(database_error)?
        {
            let column_names = cursor
                .column_names()
                .map_err(database_error)?
                .collect::<std::result::Result<Vec<String>, _>>()
                .map_err(database_error)?;
            let num_cols = column_names.len();

            let mut buffers =
                TextRowSet::for_cursor(FETCH_BATCH_SIZE, &mut cursor, Some(MAX_TEXT_LENGTH))
                    .map_err(database_error)?;
            let mut row_cursor = cursor.bind_buffer(&mut buffers).map_err(database_error)?;

            while let Some(batch) = row_cursor.fetch().map_err(database_error)? {
                for row_idx in 0..batch.num_rows() {
                    let row = (0..num_cols)
                        .map(|col_idx| {
                            batch
                                .at(col_idx, row_idx)
                                .map(|bytes| String::from_utf8_lossy(bytes).to_string())
                        })
                        .collect();
                    table.rows.push(row);
                }
            }

            table.column_names = column_names;
            Some(table.rows.len() as i64)
        } else {
            None
        };

        let row_count = match fetched {
            Some(n) => n,
            None => stmt
                .row_count()
                .map_err(database_error)?
                .map(|n| n as i64)
                .unwrap_or(-1),
        };

        Ok(QueryOutcome {
            statement: statement_kind(sql),
            row_count,
            table,
        })
    }
}

#[async_trait]
impl DriverSession for OdbcSession {
    async fn execute(&mut self, sql: &str, bindings: &[Option<String>]) -> Result<QueryOutcome> {
        self.run(sql, bindings)
    }

    async fn close(&mut self) -> Result<()> {
        // Dropping the handle disconnects
        self.conn.take();
        Ok(())
    }
}
