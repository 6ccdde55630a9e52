//! Query timing
//!
//! Measures how long a statement takes end to end, including fetching every
//! row of a SELECT, so an original and a rewritten query can be compared.

use scanhint_core::{Connection, Result};
use serde::Serialize;
use std::time::Duration;
use tokio::time::Instant;

/// Runs a statement and returns the elapsed wall-clock time.
///
/// Statements starting with `SELECT` go through [`Connection::query`] so the
/// whole result set is read; anything else goes through
/// [`Connection::execute`] and is committed by autocommit.
#[tracing::instrument(skip(conn, sql), fields(sql_preview = %sql.chars().take(100).collect::<String>()))]
pub async fn time_query(conn: &dyn Connection, sql: &str) -> Result<Duration> {
    let start = Instant::now();

    if is_select(sql) {
        let result = conn.query(sql).await?;
        tracing::debug!(rows = result.row_count(), "select fetched");
    } else {
        let result = conn.execute(sql).await?;
        tracing::debug!(affected_rows = result.affected_rows, "statement executed");
    }

    let elapsed = start.elapsed();
    tracing::debug!(elapsed_ms = elapsed.as_millis() as u64, "query timed");
    Ok(elapsed)
}

fn is_select(sql: &str) -> bool {
    sql.trim_start()
        .get(..6)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("SELECT"))
}

/// Percentage by which `after` is faster than `before`.
///
/// Negative when `after` is slower; `0.0` when `before` is zero.
pub fn improvement_percent(before: Duration, after: Duration) -> f64 {
    let before = before.as_secs_f64();
    if before == 0.0 {
        return 0.0;
    }
    (before - after.as_secs_f64()) / before * 100.0
}

/// Timings of an original query and its rewrite
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimingComparison {
    pub before: Duration,
    pub after: Duration,
}

impl TimingComparison {
    pub fn new(before: Duration, after: Duration) -> Self {
        Self { before, after }
    }

    /// See [`improvement_percent`]
    pub fn improvement(&self) -> f64 {
        improvement_percent(self.before, self.after)
    }
}

#[cfg(test)]
mod tests;
