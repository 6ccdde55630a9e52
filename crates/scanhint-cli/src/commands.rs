//! Subcommand implementations

use crate::args::{AnalyzeArgs, ExplainFileArgs};
use crate::config::MaintenanceSettings;
use crate::report;
use anyhow::{Context, Result};
use async_trait::async_trait;
use scanhint_analyzer::{
    TimingComparison, fetch_plan, parse_tabular_explain, suggest_indexes, time_query,
};
use scanhint_core::{Connection, ConnectionSettings};
use scanhint_driver_mysql::MySqlConnection;
use scanhint_maintenance::{MaintenanceTask, ScheduledJob, Scheduler};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

pub async fn connect(settings: &ConnectionSettings) -> Result<Arc<dyn Connection>> {
    let conn = MySqlConnection::connect(settings)
        .await
        .with_context(|| format!("Failed to connect to {}", settings.connection_url(false)))?;
    Ok(Arc::new(conn))
}

pub async fn close(conn: &dyn Connection) {
    if let Err(e) = conn.close().await {
        tracing::warn!(error = %e, "failed to close connection");
    }
}

/// Prints the plan, suggestions and timing for a query and its optional rewrite
pub async fn analyze(conn: &dyn Connection, args: &AnalyzeArgs) -> Result<()> {
    let policy = args.malformed_rows.into();

    let plan = fetch_plan(conn, &args.query, policy)
        .await
        .context("Failed to fetch the execution plan")?;
    report::print_plan("Original Query Execution Plan", &plan);
    println!();
    report::print_lines(&report::suggestion_lines(&suggest_indexes(
        &plan,
        &args.query,
    )));

    let before = time_query(conn, &args.query)
        .await
        .context("Failed to run the original query")?;
    println!();
    println!("{}", report::timing_line("Original", before));

    let Some(optimized) = &args.optimized else {
        return Ok(());
    };

    println!();
    let optimized_plan = fetch_plan(conn, optimized, policy)
        .await
        .context("Failed to fetch the optimized execution plan")?;
    report::print_plan("Optimized Query Execution Plan", &optimized_plan);

    let after = time_query(conn, optimized)
        .await
        .context("Failed to run the optimized query")?;
    println!();
    println!("{}", report::timing_line("Optimized", after));

    let comparison = TimingComparison::new(before, after);
    println!();
    println!("{}", report::improvement_line(comparison.improvement()));
    Ok(())
}

/// Analyzes EXPLAIN text saved to a file
pub fn explain_file(args: &ExplainFileArgs) -> Result<()> {
    let text = std::fs::read_to_string(&args.path)
        .with_context(|| format!("Failed to read EXPLAIN output from {:?}", args.path))?;
    let plan = parse_tabular_explain(&text, args.malformed_rows.into())
        .with_context(|| format!("Failed to parse EXPLAIN output in {:?}", args.path))?;

    report::print_plan("Execution Plan", &plan);
    println!();
    report::print_lines(&report::suggestion_lines(&suggest_indexes(
        &plan,
        &args.query,
    )));
    Ok(())
}

/// Maintenance task that prints each run's outcome
struct ReportingTask {
    task: MaintenanceTask,
}

#[async_trait]
impl ScheduledJob for ReportingTask {
    fn name(&self) -> &str {
        self.task.name()
    }

    async fn run(&self) -> scanhint_maintenance::Result<()> {
        println!("Starting maintenance task...");
        match self.task.run_once().await {
            Ok(outcome) => {
                report::print_lines(&report::maintenance_lines(&outcome));
                println!();
                Ok(())
            }
            Err(e) => {
                println!("Error during maintenance task: {}", e);
                Err(e)
            }
        }
    }
}

/// Runs the maintenance schedule until Ctrl+C
pub async fn maintain(conn: Arc<dyn Connection>, settings: &MaintenanceSettings) -> Result<()> {
    let task = MaintenanceTask::new(conn).with_table(&settings.table)?;
    let scheduler = Scheduler::new(Duration::from_secs(settings.interval_secs));

    let token = CancellationToken::new();
    let ctrl_c_token = token.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("interrupt received, stopping scheduler");
                ctrl_c_token.cancel();
            }
            Err(e) => tracing::error!(error = %e, "failed to listen for Ctrl+C"),
        }
    });

    println!(
        "Starting scheduled maintenance every {}s on '{}'. Press Ctrl+C to exit.",
        scheduler.interval().as_secs(),
        task.table()
    );
    let stats = scheduler.run(&ReportingTask { task }, token).await;
    println!(
        "Exiting scheduled maintenance ({} runs, {} failed).",
        stats.runs, stats.failures
    );
    Ok(())
}
