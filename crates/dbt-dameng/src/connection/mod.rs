//! Connection management.
//!
//! [`ConnectionManager`] owns one named connection for the host: it opens
//! the driver session (with retries), runs SQL with logging, maps driver
//! failures onto [`AdapterError`] kinds and supports cancelling from another
//! task.

use std::sync::{Mutex as StdMutex, PoisonError};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::config::DamengCredentials;
use crate::core::traits::{Connector, DriverSession};
use crate::core::value::{QueryOutcome, ResultTable};
use crate::error::{AdapterError, Result};

/// Adapter type reported to the host.
pub const ADAPTER_TYPE: &str = "dameng";

/// Characters of SQL kept in the log when abridging.
const ABRIDGED_SQL_CHARS: usize = 512;

/// Base delay between connection attempts (doubled per attempt).
const DEFAULT_RETRY_BASE_DELAY: Duration = Duration::from_secs(1);

/// Lifecycle of a managed connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    Init,
    Open,
    Closed,
    Fail,
}

/// Summary of one statement, as reported to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdapterResponse {
    /// `"<code> <rows>"`, e.g. `"SELECT 3"`.
    pub message: String,
    /// Statement kind, or `"OK"` when unknown.
    pub code: String,
    /// Rows fetched or affected (-1 when the driver does not know).
    pub rows_affected: i64,
}

impl AdapterResponse {
    pub fn from_outcome(outcome: &QueryOutcome) -> Self {
        let code = outcome
            .statement
            .clone()
            .unwrap_or_else(|| "OK".to_string());
        Self {
            message: format!("{} {}", code, outcome.row_count),
            code,
            rows_affected: outcome.row_count,
        }
    }
}

/// Leading keyword of a statement, uppercased.
pub fn statement_kind(sql: &str) -> Option<String> {
    let keyword: String = sql
        .trim_start_matches(|c: char| c.is_whitespace() || c == '(')
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect();
    if keyword.is_empty() {
        None
    } else {
        Some(keyword.to_uppercase())
    }
}

fn abridge(sql: &str) -> String {
    let cut: String = sql.chars().take(ABRIDGED_SQL_CHARS).collect();
    format!("{}...", cut)
}

struct ManagedConnection<S> {
    state: ConnectionState,
    handle: Option<S>,
    transaction_open: bool,
}

impl<S: DriverSession> ManagedConnection<S> {
    /// Close the handle and forget any open transaction.
    async fn release(&mut self) -> Result<()> {
        self.transaction_open = false;
        if let Some(mut handle) = self.handle.take() {
            self.state = ConnectionState::Closed;
            handle.close().await?;
        }
        Ok(())
    }
}

/// Manages one named connection to DM8.
pub struct ConnectionManager<C: Connector> {
    name: String,
    credentials: DamengCredentials,
    connector: C,
    retry_base_delay: Duration,
    conn: Mutex<ManagedConnection<C::Session>>,
    /// Token of the operation holding the connection, if any.
    running: StdMutex<Option<CancellationToken>>,
}

impl<C: Connector> ConnectionManager<C> {
    pub fn new(name: impl Into<String>, credentials: DamengCredentials, connector: C) -> Self {
        Self {
            name: name.into(),
            credentials,
            connector,
            retry_base_delay: DEFAULT_RETRY_BASE_DELAY,
            conn: Mutex::new(ManagedConnection {
                state: ConnectionState::Init,
                handle: None,
                transaction_open: false,
            }),
            running: StdMutex::new(None),
        }
    }

    /// Set the base delay between connection attempts.
    pub fn with_retry_base_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = delay;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn credentials(&self) -> &DamengCredentials {
        &self.credentials
    }

    pub fn is_cancelable(&self) -> bool {
        true
    }

    /// Status string for a completed statement.
    pub fn get_status(&self) -> &'static str {
        "OK"
    }

    pub async fn state(&self) -> ConnectionState {
        self.conn.lock().await.state
    }

    pub async fn transaction_open(&self) -> bool {
        self.conn.lock().await.transaction_open
    }

    /// Install a fresh token for the operation that now holds the connection.
    fn begin_operation(&self) -> CancellationToken {
        let token = CancellationToken::new();
        *self.running.lock().unwrap_or_else(PoisonError::into_inner) = Some(token.clone());
        token
    }

    fn end_operation(&self) {
        self.running
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
    }

    fn running_token(&self) -> Option<CancellationToken> {
        self.running
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Open the connection unless it is already open.
    ///
    /// Retries retryable failures up to `credentials.retries` attempts with
    /// exponential backoff. On final failure the state becomes `Fail` and
    /// `FailedToConnect` is returned.
    pub async fn open(&self) -> Result<()> {
        let mut conn = self.conn.lock().await;
        let token = self.begin_operation();
        let result = self.open_locked(&mut conn, &token).await;
        self.end_operation();
        result
    }

    /// Connect unless already open. A cancelled `token` stops the retry wait.
    async fn open_locked(
        &self,
        conn: &mut ManagedConnection<C::Session>,
        token: &CancellationToken,
    ) -> Result<()> {
        if conn.state == ConnectionState::Open && conn.handle.is_some() {
            debug!("Connection is already open, skipping open.");
            return Ok(());
        }

        let max_attempts = self.credentials.retries.max(1);
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.connector.connect(&self.credentials).await {
                Ok(session) => {
                    conn.handle = Some(session);
                    conn.state = ConnectionState::Open;
                    conn.transaction_open = false;
                    return Ok(());
                }
                Err(e) if e.is_retryable() && attempt < max_attempts => {
                    let delay = self.retry_base_delay * 2u32.saturating_pow(attempt - 1);
                    warn!(
                        "Connection attempt {}/{} for '{}' failed: {}. Retrying in {:?}",
                        attempt, max_attempts, self.name, e, delay
                    );
                    tokio::select! {
                        biased;
                        _ = token.cancelled() => {
                            return Err(AdapterError::Cancelled(self.name.clone()));
                        }
                        _ = tokio::time::sleep(delay) => {}
                    }
                }
                Err(e) => {
                    info!(
                        "Got an error when attempting to open a dameng connection: '{}'",
                        e
                    );
                    conn.handle = None;
                    conn.state = ConnectionState::Fail;
                    return Err(match e {
                        AdapterError::FailedToConnect(_) => e,
                        other => AdapterError::FailedToConnect(other.to_string()),
                    });
                }
            }
        }
    }

    /// Cancel the running query by closing the connection.
    ///
    /// Only the operation holding the connection when this is called is
    /// cancelled; it releases the connection itself. An idle connection is
    /// closed directly. Later statements are unaffected.
    pub async fn cancel(&self) -> Result<()> {
        info!("Cancelling query '{}'", self.name);
        if let Some(token) = self.running_token() {
            token.cancel();
        }

        if let Ok(mut conn) = self.conn.try_lock() {
            conn.transaction_open = false;
            if let Some(mut handle) = conn.handle.take() {
                conn.state = ConnectionState::Closed;
                handle.close().await.map_err(|e| {
                    error!("Error closing connection for cancel request");
                    AdapterError::runtime(e.to_string())
                })?;
            }
        }

        info!("Canceled query '{}'", self.name);
        Ok(())
    }

    /// Close the connection.
    pub async fn release(&self) -> Result<()> {
        let mut conn = self.conn.lock().await;
        conn.release().await
    }

    /// Mark a transaction as open.
    ///
    /// Sessions auto-commit, so nothing is sent to the server.
    pub async fn begin(&self) -> Result<()> {
        let mut conn = self.conn.lock().await;
        self.begin_locked(&mut conn)
    }

    fn begin_locked(&self, conn: &mut ManagedConnection<C::Session>) -> Result<()> {
        if conn.transaction_open {
            return Err(AdapterError::runtime(format!(
                "Tried to begin a new transaction on connection \"{}\", but it already had one open!",
                self.name
            )));
        }
        conn.transaction_open = true;
        Ok(())
    }

    /// Commit the open transaction.
    pub async fn commit(&self) -> Result<()> {
        let transaction_open = self.conn.lock().await.transaction_open;
        if !transaction_open {
            return Err(AdapterError::runtime(format!(
                "Tried to commit transaction on connection \"{}\", but it does not have one open!",
                self.name
            )));
        }
        debug!("On {}: COMMIT", self.name);
        self.add_query("COMMIT", false, None, false).await?;
        self.conn.lock().await.transaction_open = false;
        Ok(())
    }

    /// Run a statement, opening the connection first if needed.
    ///
    /// `bindings` are positional text parameters; `None` means no bindings.
    /// With `abridge_sql_log`, only the first 512 characters are logged.
    pub async fn add_query(
        &self,
        sql: &str,
        auto_begin: bool,
        bindings: Option<&[Option<String>]>,
        abridge_sql_log: bool,
    ) -> Result<(AdapterResponse, ResultTable)> {
        let bindings = bindings.unwrap_or_default();
        let mut conn = self.conn.lock().await;
        let token = self.begin_operation();
        let result = self
            .run_locked(&mut conn, &token, sql, auto_begin, bindings, abridge_sql_log)
            .await;
        self.end_operation();
        result
    }

    async fn run_locked(
        &self,
        conn: &mut ManagedConnection<C::Session>,
        token: &CancellationToken,
        sql: &str,
        auto_begin: bool,
        bindings: &[Option<String>],
        abridge_sql_log: bool,
    ) -> Result<(AdapterResponse, ResultTable)> {
        self.open_locked(conn, token).await?;

        // Cancelled while connecting
        if token.is_cancelled() {
            let cancelled = AdapterError::Cancelled(self.name.clone());
            return Err(self.handle_failure(conn, cancelled).await);
        }

        if auto_begin && !conn.transaction_open {
            self.begin_locked(conn)?;
        }

        debug!("Using {} connection \"{}\".", ADAPTER_TYPE, self.name);
        let log_sql = if abridge_sql_log {
            abridge(sql)
        } else {
            sql.to_string()
        };
        debug!("On {}: {}", self.name, log_sql);

        let started = Instant::now();
        let result = match conn.handle.as_mut() {
            Some(session) => {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => Err(AdapterError::Cancelled(self.name.clone())),
                    outcome = session.execute(sql, bindings) => outcome,
                }
            }
            None => Err(AdapterError::runtime(format!(
                "Connection '{}' has no open handle",
                self.name
            ))),
        };

        match result {
            Ok(outcome) => {
                debug!(
                    "SQL status: {} in {:.2} seconds",
                    self.get_status(),
                    started.elapsed().as_secs_f64()
                );
                Ok((AdapterResponse::from_outcome(&outcome), outcome.table))
            }
            Err(e) => Err(self.handle_failure(conn, e).await),
        }
    }

    /// Run a statement outside a transaction, returning rows only if `fetch`.
    pub async fn execute(&self, sql: &str, fetch: bool) -> Result<(AdapterResponse, ResultTable)> {
        let (response, table) = self.add_query(sql, false, None, false).await?;
        if fetch {
            Ok((response, table))
        } else {
            Ok((response, ResultTable::default()))
        }
    }

    /// Release the connection after a failed statement and classify the error.
    async fn handle_failure(
        &self,
        conn: &mut ManagedConnection<C::Session>,
        err: AdapterError,
    ) -> AdapterError {
        match err {
            AdapterError::Database(message) => {
                info!("Dameng error: {}", message);
                if conn.release().await.is_err() {
                    info!("Failed to release connection!");
                }
                AdapterError::Database(message)
            }
            other => {
                info!("Rolling back transaction.");
                if let Err(e) = conn.release().await {
                    warn!("Failed to release connection '{}': {}", self.name, e);
                }
                match other {
                    AdapterError::Runtime(_) | AdapterError::Cancelled(_) => other,
                    e => AdapterError::runtime(e.to_string()),
                }
            }
        }
    }
}
