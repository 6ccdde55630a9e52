//! Connection trait and transaction handling

use crate::{QueryResult, Result, StatementResult};
use async_trait::async_trait;

/// A database connection
#[async_trait]
pub trait Connection: Send + Sync {
    /// Get the driver name (e.g., "mysql")
    fn driver_name(&self) -> &str;

    /// Execute a statement that modifies data (INSERT/UPDATE/DELETE)
    async fn execute(&self, sql: &str) -> Result<StatementResult>;

    /// Execute a query that returns rows (SELECT, EXPLAIN, SHOW)
    async fn query(&self, sql: &str) -> Result<QueryResult>;

    /// Begin a transaction on a dedicated session
    async fn begin_transaction(&self) -> Result<Box<dyn Transaction>>;

    /// Close the connection
    async fn close(&self) -> Result<()>;

    /// Check if the connection is closed
    fn is_closed(&self) -> bool;
}

/// A database transaction
///
/// Dropping a transaction that was neither committed nor rolled back must
/// roll it back.
#[async_trait]
pub trait Transaction: Send + Sync {
    /// Commit the transaction
    async fn commit(self: Box<Self>) -> Result<()>;

    /// Rollback the transaction
    async fn rollback(self: Box<Self>) -> Result<()>;

    /// Execute a query within the transaction
    async fn query(&self, sql: &str) -> Result<QueryResult>;

    /// Execute a statement within the transaction
    async fn execute(&self, sql: &str) -> Result<StatementResult>;
}
