//! Scripted driver used by the integration tests.
//!
//! Each statement is answered by a handler closure and recorded together
//! with its bindings, so tests can assert on the SQL the adapter issued.

#![allow(dead_code)]

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use dbt_dameng::connection::statement_kind;
use dbt_dameng::{
    AdapterConfig, AdapterError, Connector, DamengAdapter, DamengCredentials, DriverSession,
    QueryOutcome, ResultTable, Result,
};

type Handler = dyn Fn(&str, &[Option<String>]) -> Result<QueryOutcome> + Send + Sync;

/// A statement as the session received it.
#[derive(Debug, Clone, PartialEq)]
pub struct Executed {
    pub sql: String,
    pub bindings: Vec<Option<String>>,
}

#[derive(Clone)]
pub struct ScriptedConnector {
    handler: Arc<Handler>,
    executed: Arc<Mutex<Vec<Executed>>>,
    connects: Arc<AtomicU32>,
    closes: Arc<AtomicU32>,
    connect_failures: Arc<AtomicU32>,
    delay: Option<Duration>,
}

impl ScriptedConnector {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&str, &[Option<String>]) -> Result<QueryOutcome> + Send + Sync + 'static,
    {
        Self {
            handler: Arc::new(handler),
            executed: Arc::default(),
            connects: Arc::default(),
            closes: Arc::default(),
            connect_failures: Arc::default(),
            delay: None,
        }
    }

    /// Answers every statement with an empty result.
    pub fn empty() -> Self {
        Self::new(|sql, _| Ok(outcome(sql, ResultTable::default())))
    }

    /// Fail the next `count` connection attempts.
    pub fn failing_connects(self, count: u32) -> Self {
        self.connect_failures.store(count, Ordering::SeqCst);
        self
    }

    /// Delay every statement (to exercise cancellation).
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn executed(&self) -> Vec<Executed> {
        self.executed.lock().unwrap().clone()
    }

    pub fn executed_sql(&self) -> Vec<String> {
        self.executed().into_iter().map(|e| e.sql).collect()
    }

    pub fn connects(&self) -> u32 {
        self.connects.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> u32 {
        self.closes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Connector for ScriptedConnector {
    type Session = ScriptedSession;

    async fn connect(&self, _credentials: &DamengCredentials) -> Result<ScriptedSession> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        let remaining = self.connect_failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.connect_failures.store(remaining - 1, Ordering::SeqCst);
            return Err(AdapterError::FailedToConnect(
                "[DM8 ODBC] network error: connection refused".to_string(),
            ));
        }
        Ok(ScriptedSession {
            connector: self.clone(),
        })
    }
}

pub struct ScriptedSession {
    connector: ScriptedConnector,
}

#[async_trait]
impl DriverSession for ScriptedSession {
    async fn execute(&mut self, sql: &str, bindings: &[Option<String>]) -> Result<QueryOutcome> {
        self.connector.executed.lock().unwrap().push(Executed {
            sql: sql.to_string(),
            bindings: bindings.to_vec(),
        });
        if let Some(delay) = self.connector.delay {
            tokio::time::sleep(delay).await;
        }
        (self.connector.handler)(sql, bindings)
    }

    async fn close(&mut self) -> Result<()> {
        self.connector.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Build a result table from string literals.
pub fn table(columns: &[&str], rows: &[&[Option<&str>]]) -> ResultTable {
    ResultTable::new(
        columns.iter().map(|c| c.to_string()).collect(),
        rows.iter()
            .map(|row| row.iter().map(|v| v.map(str::to_string)).collect())
            .collect(),
    )
}

pub fn outcome(sql: &str, table: ResultTable) -> QueryOutcome {
    QueryOutcome {
        statement: statement_kind(sql),
        row_count: table.len() as i64,
        table,
    }
}

pub fn credentials() -> DamengCredentials {
    DamengCredentials {
        r#type: "dameng".to_string(),
        host: "localhost".to_string(),
        port: 5236,
        user: "SYSDBA".to_string(),
        password: "SYSDBA".to_string(),
        schema: "DBT_TEST".to_string(),
        database: Some("DBT_TEST".to_string()),
        driver: "DM8 ODBC DRIVER".to_string(),
        retries: 1,
        login_timeout_secs: None,
    }
}

pub fn adapter(connector: ScriptedConnector) -> DamengAdapter<ScriptedConnector> {
    DamengAdapter::new(AdapterConfig::new(credentials()), connector)
}
