//! Plan source - fetches a query's execution plan from the server

use crate::explain::mysql::{self, MalformedRowPolicy};
use crate::explain::plan::Plan;
use scanhint_core::Connection;

/// Builds the EXPLAIN statement for a query
pub fn explain_sql(query: &str) -> String {
    format!("EXPLAIN {}", query.trim_start())
}

/// Runs `EXPLAIN <query>` and converts the result into a [`Plan`]
#[tracing::instrument(skip(conn, query), fields(driver = conn.driver_name(), sql_preview = %query.chars().take(100).collect::<String>()))]
pub async fn fetch_plan(
    conn: &dyn Connection,
    query: &str,
    policy: MalformedRowPolicy,
) -> mysql::Result<Plan> {
    let result = conn.query(&explain_sql(query)).await?;
    let plan = mysql::plan_from_result(&result, policy)?;

    tracing::debug!(
        plan_rows = plan.len(),
        full_scans = plan.unindexed_full_scans().count(),
        "execution plan fetched"
    );
    Ok(plan)
}
