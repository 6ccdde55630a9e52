//! Common test utilities and mocks

use async_trait::async_trait;
use parking_lot::Mutex;
use scanhint_core::{
    Connection, QueryResult, Result, ScanhintError, StatementResult, Transaction, Value,
};
use std::sync::Arc;
use std::time::Duration;

/// Column layout of MySQL 8 EXPLAIN output
pub const EXPLAIN_COLUMNS: [&str; 12] = [
    "id",
    "select_type",
    "table",
    "partitions",
    "type",
    "possible_keys",
    "key",
    "key_len",
    "ref",
    "rows",
    "filtered",
    "Extra",
];

/// Builds an EXPLAIN result with the MySQL 8 column layout
pub fn explain_result(rows: Vec<Vec<Value>>) -> QueryResult {
    QueryResult::from_values(&EXPLAIN_COLUMNS, rows)
}

/// Mock connection recording every statement it receives
pub struct MockConnection {
    should_fail: bool,
    delay: Option<Duration>,
    query_responses: Vec<(String, QueryResult)>,
    query_log: Arc<Mutex<Vec<String>>>,
    execute_log: Arc<Mutex<Vec<String>>>,
}

impl MockConnection {
    pub fn new() -> Self {
        Self {
            should_fail: false,
            delay: None,
            query_responses: Vec::new(),
            query_log: Arc::new(Mutex::new(Vec::new())),
            execute_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }

    /// Every call sleeps for `delay` (use with a paused tokio clock)
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Register a response for queries containing the given SQL pattern.
    pub fn with_query_response(mut self, sql_contains: &str, result: QueryResult) -> Self {
        self.query_responses.push((sql_contains.to_string(), result));
        self
    }

    pub fn query_log(&self) -> Vec<String> {
        self.query_log.lock().clone()
    }

    pub fn execute_log(&self) -> Vec<String> {
        self.execute_log.lock().clone()
    }

    async fn pause(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl Connection for MockConnection {
    fn driver_name(&self) -> &str {
        "mock"
    }

    async fn execute(&self, sql: &str) -> Result<StatementResult> {
        self.execute_log.lock().push(sql.to_string());
        self.pause().await;
        if self.should_fail {
            return Err(ScanhintError::Query("Execute failed".into()));
        }
        Ok(StatementResult { affected_rows: 1 })
    }

    async fn query(&self, sql: &str) -> Result<QueryResult> {
        self.query_log.lock().push(sql.to_string());
        self.pause().await;
        if self.should_fail {
            return Err(ScanhintError::Query("Query failed".into()));
        }

        for (pattern, result) in &self.query_responses {
            if sql.contains(pattern.as_str()) {
                return Ok(result.clone());
            }
        }
        Ok(QueryResult::empty())
    }

    async fn begin_transaction(&self) -> Result<Box<dyn Transaction>> {
        Err(ScanhintError::NotSupported(
            "transactions are not used by the analyzer".into(),
        ))
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }

    fn is_closed(&self) -> bool {
        false
    }
}
