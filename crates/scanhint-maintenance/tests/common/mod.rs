//! Common test utilities and mocks

use async_trait::async_trait;
use parking_lot::Mutex;
use scanhint_core::{
    Connection, QueryResult, Result, ScanhintError, StatementResult, Transaction, Value,
};
use std::sync::Arc;

/// Shared record of everything sent to the mock server, in order
pub type StatementLog = Arc<Mutex<Vec<String>>>;

/// Mock connection whose transactions log BEGIN/COMMIT/ROLLBACK and every
/// statement into one shared log.
pub struct MockConnection {
    log: StatementLog,
    query_responses: Vec<(String, QueryResult)>,
    fail_on: Option<String>,
    fail_begin: bool,
    fail_rollback: bool,
}

impl MockConnection {
    pub fn new() -> Self {
        Self {
            log: Arc::new(Mutex::new(Vec::new())),
            query_responses: Vec::new(),
            fail_on: None,
            fail_begin: false,
            fail_rollback: false,
        }
    }

    /// Register a response for queries containing the given SQL pattern.
    pub fn with_query_response(mut self, sql_contains: &str, result: QueryResult) -> Self {
        self.query_responses.push((sql_contains.to_string(), result));
        self
    }

    /// Queries containing `sql_contains` fail with a query error
    pub fn failing_on(mut self, sql_contains: &str) -> Self {
        self.fail_on = Some(sql_contains.to_string());
        self
    }

    pub fn with_failing_begin(mut self) -> Self {
        self.fail_begin = true;
        self
    }

    pub fn with_failing_rollback(mut self) -> Self {
        self.fail_rollback = true;
        self
    }

    pub fn log(&self) -> Vec<String> {
        self.log.lock().clone()
    }

    /// A transaction sharing this connection's log and responses
    pub fn transaction(&self) -> MockTransaction {
        self.log.lock().push("BEGIN".to_string());
        MockTransaction {
            log: self.log.clone(),
            query_responses: self.query_responses.clone(),
            fail_on: self.fail_on.clone(),
            fail_rollback: self.fail_rollback,
        }
    }
}

#[async_trait]
impl Connection for MockConnection {
    fn driver_name(&self) -> &str {
        "mock"
    }

    async fn execute(&self, sql: &str) -> Result<StatementResult> {
        self.log.lock().push(sql.to_string());
        Ok(StatementResult { affected_rows: 0 })
    }

    async fn query(&self, sql: &str) -> Result<QueryResult> {
        self.log.lock().push(sql.to_string());
        Ok(QueryResult::empty())
    }

    async fn begin_transaction(&self) -> Result<Box<dyn Transaction>> {
        if self.fail_begin {
            return Err(ScanhintError::Connection("server has gone away".into()));
        }
        Ok(Box::new(self.transaction()))
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }

    fn is_closed(&self) -> bool {
        false
    }
}

pub struct MockTransaction {
    log: StatementLog,
    query_responses: Vec<(String, QueryResult)>,
    fail_on: Option<String>,
    fail_rollback: bool,
}

#[async_trait]
impl Transaction for MockTransaction {
    async fn commit(self: Box<Self>) -> Result<()> {
        self.log.lock().push("COMMIT".to_string());
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        self.log.lock().push("ROLLBACK".to_string());
        if self.fail_rollback {
            return Err(ScanhintError::Transaction("rollback failed".into()));
        }
        Ok(())
    }

    async fn query(&self, sql: &str) -> Result<QueryResult> {
        self.log.lock().push(sql.to_string());
        if let Some(pattern) = &self.fail_on
            && sql.contains(pattern.as_str())
        {
            return Err(ScanhintError::Query(format!("Failed to execute query: {}", sql)));
        }
        for (pattern, result) in &self.query_responses {
            if sql.contains(pattern.as_str()) {
                return Ok(result.clone());
            }
        }
        Ok(QueryResult::empty())
    }

    async fn execute(&self, sql: &str) -> Result<StatementResult> {
        self.log.lock().push(sql.to_string());
        Ok(StatementResult { affected_rows: 0 })
    }
}

/// A connection answering the count and status queries like a live server
pub fn healthy_connection(row_count: i64, buffer_pool_bytes: &str) -> MockConnection {
    MockConnection::new()
        .with_query_response(
            "COUNT(*)",
            QueryResult::from_values(&["COUNT(*)"], vec![vec![Value::Int64(row_count)]]),
        )
        .with_query_response(
            "SHOW STATUS",
            QueryResult::from_values(
                &["Variable_name", "Value"],
                vec![vec![
                    Value::from("Innodb_buffer_pool_bytes_data"),
                    Value::from(buffer_pool_bytes),
                ]],
            ),
        )
}
