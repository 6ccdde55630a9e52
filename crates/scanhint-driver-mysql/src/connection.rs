//! MySQL connection implementation

use async_trait::async_trait;
use mysql_async::{
    Conn, Opts, OptsBuilder, Pool, PoolConstraints, PoolOpts, Row as MySqlRow,
    consts::ColumnType, prelude::*,
};
use scanhint_core::{
    ColumnMeta, Connection, ConnectionSettings, QueryResult, Result, Row, ScanhintError,
    StatementResult, Transaction, Value,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Pool size: one session for plain queries, one for an open transaction
const MAX_POOL_CONNECTIONS: usize = 2;

/// MySQL connection wrapper
pub struct MySqlConnection {
    pool: Pool,
    closed: AtomicBool,
}

impl MySqlConnection {
    /// Connect to a MySQL database and verify the server is reachable
    #[tracing::instrument(skip(settings), fields(url = %settings.connection_url(false)))]
    pub async fn connect(settings: &ConnectionSettings) -> Result<Self> {
        tracing::info!(
            host = %settings.host,
            port = settings.effective_port(),
            database = ?settings.database,
            "connecting to MySQL database"
        );

        let constraints = PoolConstraints::new(1, MAX_POOL_CONNECTIONS).ok_or_else(|| {
            ScanhintError::Connection(format!(
                "Failed to configure MySQL pool constraints (min=1, max={})",
                MAX_POOL_CONNECTIONS
            ))
        })?;
        let pool_opts = PoolOpts::default()
            .with_constraints(constraints)
            .with_reset_connection(false);

        let opts_builder = OptsBuilder::from_opts(Opts::default())
            .ip_or_hostname(settings.host.as_str())
            .tcp_port(settings.effective_port())
            .user(settings.user.as_deref())
            .pass(settings.password.as_deref())
            .db_name(settings.database.as_deref())
            .pool_opts(pool_opts);

        let pool = Pool::new(Opts::from(opts_builder));

        // Acquire and release one connection so bad credentials fail here
        let conn = pool
            .get_conn()
            .await
            .map_err(|e| ScanhintError::Connection(format!("Failed to connect to MySQL: {}", e)))?;
        drop(conn);

        tracing::info!(host = %settings.host, "MySQL connection established");
        Ok(Self {
            pool,
            closed: AtomicBool::new(false),
        })
    }

    async fn get_conn(&self) -> Result<Conn> {
        if self.is_closed() {
            return Err(ScanhintError::Connection("MySQL connection is closed".into()));
        }
        self.pool
            .get_conn()
            .await
            .map_err(|e| ScanhintError::Connection(format!("Failed to get MySQL connection: {}", e)))
    }
}

/// Convert mysql_async Value to our Value type, using column type metadata
/// to interpret byte strings from the text protocol.
fn mysql_value_to_value(val: mysql_async::Value, col_type: ColumnType) -> Value {
    match val {
        mysql_async::Value::NULL => Value::Null,
        mysql_async::Value::Bytes(bytes) => match String::from_utf8(bytes) {
            Ok(s) => match col_type {
                ColumnType::MYSQL_TYPE_TINY
                | ColumnType::MYSQL_TYPE_SHORT
                | ColumnType::MYSQL_TYPE_LONG
                | ColumnType::MYSQL_TYPE_LONGLONG
                | ColumnType::MYSQL_TYPE_INT24
                | ColumnType::MYSQL_TYPE_YEAR => s
                    .parse::<i64>()
                    .map(Value::Int64)
                    .or_else(|_| s.parse::<u64>().map(Value::UInt64))
                    .unwrap_or(Value::String(s)),
                ColumnType::MYSQL_TYPE_FLOAT => {
                    s.parse::<f32>().map(Value::Float32).unwrap_or(Value::String(s))
                }
                ColumnType::MYSQL_TYPE_DOUBLE => {
                    s.parse::<f64>().map(Value::Float64).unwrap_or(Value::String(s))
                }
                ColumnType::MYSQL_TYPE_DECIMAL | ColumnType::MYSQL_TYPE_NEWDECIMAL => {
                    Value::Decimal(s)
                }
                _ => Value::String(s),
            },
            Err(e) => Value::Bytes(e.into_bytes()),
        },
        mysql_async::Value::Int(i) => Value::Int64(i),
        mysql_async::Value::UInt(u) => Value::UInt64(u),
        mysql_async::Value::Float(f) => Value::Float32(f),
        mysql_async::Value::Double(d) => Value::Float64(d),
        mysql_async::Value::Date(year, month, day, hour, min, sec, micro) => {
            let date = chrono::NaiveDate::from_ymd_opt(year as i32, month as u32, day as u32);
            if hour == 0 && min == 0 && sec == 0 && micro == 0 {
                date.map(Value::Date).unwrap_or_else(|| {
                    Value::String(format!("{:04}-{:02}-{:02}", year, month, day))
                })
            } else {
                date.and_then(|d| d.and_hms_micro_opt(hour as u32, min as u32, sec as u32, micro))
                    .map(Value::DateTime)
                    .unwrap_or_else(|| {
                        Value::String(format!(
                            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
                            year, month, day, hour, min, sec
                        ))
                    })
            }
        }
        mysql_async::Value::Time(negative, days, hours, mins, secs, micros) => {
            let total_hours = days * 24 + u32::from(hours);
            let sign = if negative { "-" } else { "" };
            Value::String(format!(
                "{}{:02}:{:02}:{:02}.{:06}",
                sign, total_hours, mins, secs, micros
            ))
        }
    }
}

/// Converts driver rows, taking column metadata from the first row
fn convert_rows(mysql_rows: Vec<MySqlRow>) -> (Vec<ColumnMeta>, Vec<Row>) {
    let mut columns = Vec::new();
    let mut column_names = Vec::new();
    let mut column_types = Vec::new();

    if let Some(first_row) = mysql_rows.first() {
        for (idx, col) in first_row.columns_ref().iter().enumerate() {
            let name = col.name_str().to_string();
            column_names.push(name.clone());
            column_types.push(col.column_type());
            columns.push(ColumnMeta {
                name,
                data_type: format!("{:?}", col.column_type()),
                ordinal: idx,
            });
        }
    }

    let rows = mysql_rows
        .into_iter()
        .map(|mut mysql_row| {
            let values = column_types
                .iter()
                .enumerate()
                .map(|(idx, col_type)| {
                    let mysql_val = mysql_row
                        .take::<mysql_async::Value, _>(idx)
                        .unwrap_or(mysql_async::Value::NULL);
                    mysql_value_to_value(mysql_val, *col_type)
                })
                .collect();
            Row::new(column_names.clone(), values)
        })
        .collect();

    (columns, rows)
}

async fn run_query(conn: &mut Conn, sql: &str) -> Result<QueryResult> {
    let start_time = std::time::Instant::now();
    let mysql_rows: Vec<MySqlRow> = conn
        .query(sql)
        .await
        .map_err(|e| ScanhintError::Query(format!("Failed to execute query: {}", e)))?;

    let (columns, rows) = convert_rows(mysql_rows);
    let execution_time_ms = start_time.elapsed().as_millis() as u64;

    tracing::debug!(
        row_count = rows.len(),
        execution_time_ms = execution_time_ms,
        "query executed successfully"
    );

    Ok(QueryResult {
        columns,
        rows,
        affected_rows: 0,
        execution_time_ms,
    })
}

async fn run_statement(conn: &mut Conn, sql: &str) -> Result<StatementResult> {
    conn.query_drop(sql)
        .await
        .map_err(|e| ScanhintError::Query(format!("Failed to execute statement: {}", e)))?;
    let affected_rows = conn.affected_rows();
    tracing::debug!(affected_rows = affected_rows, "statement executed");
    Ok(StatementResult { affected_rows })
}

#[async_trait]
impl Connection for MySqlConnection {
    fn driver_name(&self) -> &str {
        "mysql"
    }

    #[tracing::instrument(skip(self, sql), fields(sql_preview = %sql.chars().take(100).collect::<String>()))]
    async fn execute(&self, sql: &str) -> Result<StatementResult> {
        let mut conn = self.get_conn().await?;
        run_statement(&mut conn, sql).await
    }

    #[tracing::instrument(skip(self, sql), fields(sql_preview = %sql.chars().take(100).collect::<String>()))]
    async fn query(&self, sql: &str) -> Result<QueryResult> {
        let mut conn = self.get_conn().await?;
        run_query(&mut conn, sql).await
    }

    async fn begin_transaction(&self) -> Result<Box<dyn Transaction>> {
        tracing::debug!("beginning MySQL transaction");

        // The transaction keeps this session until commit or rollback
        let mut conn = self.get_conn().await?;
        conn.query_drop("START TRANSACTION").await.map_err(|e| {
            ScanhintError::Transaction(format!("Failed to begin transaction: {}", e))
        })?;

        tracing::debug!("MySQL transaction begun successfully");
        Ok(Box::new(MySqlTransaction {
            conn: Arc::new(tokio::sync::Mutex::new(Some(conn))),
            committed: false,
            rolled_back: false,
        }))
    }

    async fn close(&self) -> Result<()> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        tracing::info!("closing MySQL connection pool");
        self.pool.clone().disconnect().await.map_err(|e| {
            ScanhintError::Connection(format!("Failed to close MySQL connection: {}", e))
        })
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

/// MySQL transaction implementation
///
/// Holds a dedicated pooled session from `START TRANSACTION` until commit or
/// rollback, then returns it to the pool. Dropping an unfinished transaction
/// rolls it back in the background.
pub struct MySqlTransaction {
    conn: Arc<tokio::sync::Mutex<Option<Conn>>>,
    committed: bool,
    rolled_back: bool,
}

impl MySqlTransaction {
    fn ensure_active(&self) -> Result<()> {
        if self.committed {
            return Err(ScanhintError::Transaction("Transaction already committed".into()));
        }
        if self.rolled_back {
            return Err(ScanhintError::Transaction("Transaction already rolled back".into()));
        }
        Ok(())
    }

    /// Sends COMMIT or ROLLBACK and releases the session
    async fn finish(&self, statement: &str) -> Result<()> {
        let mut guard = self.conn.lock().await;
        if let Some(mut conn) = guard.take() {
            conn.query_drop(statement).await.map_err(|e| {
                ScanhintError::Transaction(format!("Failed to {} transaction: {}", statement, e))
            })?;
        }
        Ok(())
    }
}

#[async_trait]
impl Transaction for MySqlTransaction {
    async fn commit(mut self: Box<Self>) -> Result<()> {
        self.ensure_active()?;
        tracing::debug!("committing MySQL transaction");
        self.finish("COMMIT").await?;
        self.committed = true;
        tracing::debug!("MySQL transaction committed");
        Ok(())
    }

    async fn rollback(mut self: Box<Self>) -> Result<()> {
        self.ensure_active()?;
        tracing::debug!("rolling back MySQL transaction");
        self.finish("ROLLBACK").await?;
        self.rolled_back = true;
        tracing::debug!("MySQL transaction rolled back");
        Ok(())
    }

    async fn query(&self, sql: &str) -> Result<QueryResult> {
        self.ensure_active()?;
        tracing::debug!(sql_preview = %sql.chars().take(100).collect::<String>(), "executing query in transaction");

        let mut guard = self.conn.lock().await;
        match guard.as_mut() {
            Some(conn) => run_query(conn, sql).await,
            None => Err(ScanhintError::Transaction(
                "Transaction connection no longer available".into(),
            )),
        }
    }

    async fn execute(&self, sql: &str) -> Result<StatementResult> {
        self.ensure_active()?;
        tracing::debug!(sql_preview = %sql.chars().take(100).collect::<String>(), "executing statement in transaction");

        let mut guard = self.conn.lock().await;
        match guard.as_mut() {
            Some(conn) => run_statement(conn, sql).await,
            None => Err(ScanhintError::Transaction(
                "Transaction connection no longer available".into(),
            )),
        }
    }
}

impl Drop for MySqlTransaction {
    fn drop(&mut self) {
        if self.committed || self.rolled_back {
            return;
        }

        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            tracing::error!("MySQL transaction dropped outside a tokio runtime; cannot roll back");
            return;
        };

        tracing::warn!("MySQL transaction dropped without commit or rollback - will auto-rollback");
        let conn_mutex = self.conn.clone();
        handle.spawn(async move {
            let mut guard = conn_mutex.lock().await;
            if let Some(mut conn) = guard.take()
                && let Err(e) = conn.query_drop("ROLLBACK").await
            {
                tracing::error!("Failed to rollback dropped transaction: {}", e);
            }
        });
    }
}
