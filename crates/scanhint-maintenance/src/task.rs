//! Transactional maintenance task
//!
//! Each run counts the rows of a table and reads the InnoDB buffer pool
//! size inside a single transaction. A failure at any step rolls the
//! transaction back and is reported to the caller; the next run starts
//! fresh.

use crate::error::{MaintenanceError, Result};
use chrono::{DateTime, Utc};
use regex::Regex;
use scanhint_core::{Connection, Transaction};
use serde::Serialize;
use std::sync::{Arc, LazyLock};
use std::time::Duration;
use tokio::time::Instant;

/// Table counted when none is configured
pub const DEFAULT_MAINTENANCE_TABLE: &str = "users";

/// Status variable holding the bytes of data in the InnoDB buffer pool
pub const BUFFER_POOL_STATUS_VARIABLE: &str = "Innodb_buffer_pool_bytes_data";

// `table` or `schema.table`, unquoted
static TABLE_NAME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_$]*(\.[A-Za-z_][A-Za-z0-9_$]*)?$").expect("valid regex")
});

/// Outcome of a successful maintenance run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MaintenanceReport {
    /// Table that was counted
    pub table: String,
    /// `COUNT(*)` of the table
    pub row_count: Option<u64>,
    /// Value of `Innodb_buffer_pool_bytes_data`, if the server reports it
    pub buffer_pool_bytes: Option<u64>,
    /// The run used an adopted transaction instead of beginning one
    pub reused_transaction: bool,
    /// Time from the start of the run to the commit
    pub elapsed: Duration,
    /// When the transaction was committed
    pub committed_at: DateTime<Utc>,
}

/// Periodic maintenance work against one connection
pub struct MaintenanceTask {
    conn: Arc<dyn Connection>,
    table: String,
    adopted: tokio::sync::Mutex<Option<Box<dyn Transaction>>>,
}

impl MaintenanceTask {
    /// Creates a task counting [`DEFAULT_MAINTENANCE_TABLE`]
    pub fn new(conn: Arc<dyn Connection>) -> Self {
        Self {
            conn,
            table: DEFAULT_MAINTENANCE_TABLE.to_string(),
            adopted: tokio::sync::Mutex::new(None),
        }
    }

    /// Counts `table` instead of the default.
    ///
    /// The name is interpolated into SQL, so only plain identifiers are accepted.
    pub fn with_table(mut self, table: impl Into<String>) -> Result<Self> {
        let table = table.into();
        if !TABLE_NAME_REGEX.is_match(&table) {
            return Err(MaintenanceError::InvalidTable(table));
        }
        self.table = table;
        Ok(self)
    }

    /// The table this task counts
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Hands an already-open transaction to the task.
    ///
    /// The next run does its work inside it instead of beginning a new one,
    /// then commits or rolls it back as usual.
    pub async fn adopt_transaction(&self, transaction: Box<dyn Transaction>) {
        let mut adopted = self.adopted.lock().await;
        if adopted.is_some() {
            tracing::warn!("replacing previously adopted transaction; it will be rolled back");
        }
        *adopted = Some(transaction);
    }

    /// True if a run will reuse an adopted transaction
    pub async fn has_adopted_transaction(&self) -> bool {
        self.adopted.lock().await.is_some()
    }

    /// Runs one maintenance pass.
    ///
    /// Commits on success. On failure the transaction is rolled back and the
    /// original error is returned; a failed rollback is only logged.
    #[tracing::instrument(skip(self), fields(table = %self.table))]
    pub async fn run_once(&self) -> Result<MaintenanceReport> {
        let started = Instant::now();
        let adopted = self.adopted.lock().await.take();
        let reused_transaction = adopted.is_some();
        let transaction = match adopted {
            Some(transaction) => {
                tracing::debug!("reusing adopted transaction");
                transaction
            }
            None => self.conn.begin_transaction().await?,
        };

        match self.run_statements(transaction.as_ref()).await {
            Ok((row_count, buffer_pool_bytes)) => {
                transaction.commit().await?;
                let report = MaintenanceReport {
                    table: self.table.clone(),
                    row_count,
                    buffer_pool_bytes,
                    reused_transaction,
                    elapsed: started.elapsed(),
                    committed_at: Utc::now(),
                };
                tracing::info!(
                    row_count = ?report.row_count,
                    buffer_pool_bytes = ?report.buffer_pool_bytes,
                    elapsed_ms = report.elapsed.as_millis() as u64,
                    "maintenance transaction committed"
                );
                Ok(report)
            }
            Err(e) => {
                tracing::error!(error = %e, "maintenance run failed, rolling back");
                if let Err(rollback_err) = transaction.rollback().await {
                    tracing::error!(error = %rollback_err, "rollback after failed maintenance run failed");
                }
                Err(e)
            }
        }
    }

    async fn run_statements(
        &self,
        transaction: &dyn Transaction,
    ) -> Result<(Option<u64>, Option<u64>)> {
        let count_sql = format!("SELECT COUNT(*) FROM {}", self.table);
        let count = transaction.query(&count_sql).await?;
        let row_count = count
            .rows
            .first()
            .and_then(|row| row.get(0))
            .and_then(|value| value.as_u64());
        tracing::debug!(row_count = ?row_count, "table counted");

        let status_sql = format!("SHOW STATUS LIKE '{}'", BUFFER_POOL_STATUS_VARIABLE);
        let status = transaction.query(&status_sql).await?;
        let buffer_pool_bytes = status
            .rows
            .first()
            .and_then(|row| row.get(1))
            .and_then(|value| value.as_u64());
        tracing::debug!(buffer_pool_bytes = ?buffer_pool_bytes, "buffer pool status read");

        Ok((row_count, buffer_pool_bytes))
    }
}

