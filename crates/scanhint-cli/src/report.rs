//! Terminal output for plans, suggestions, timings and maintenance runs

use comfy_table::{Cell, ContentArrangement, Row, Table, presets::UTF8_FULL_CONDENSED};
use scanhint_analyzer::{IndexSuggestions, Plan};
use scanhint_maintenance::MaintenanceReport;
use std::time::Duration;

const PLAN_HEADER: [&str; 10] = [
    "id",
    "select_type",
    "table",
    "type",
    "possible_keys",
    "key",
    "key_len",
    "ref",
    "rows",
    "Extra",
];

pub const NO_SUGGESTIONS: &str = "No index suggestions based on the current execution plan.";

fn or_null(value: Option<&str>) -> String {
    value.unwrap_or("NULL").to_string()
}

/// Renders a plan the way the mysql client lays out EXPLAIN
pub fn plan_table(plan: &Plan) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(Row::from(PLAN_HEADER.iter().map(Cell::new).collect::<Vec<_>>()));

    for row in plan {
        table.add_row(vec![
            row.id.map(|id| id.to_string()).unwrap_or_else(|| "NULL".to_string()),
            row.select_type.clone(),
            or_null(row.table.as_deref()),
            row.access_type.clone(),
            row.possible_keys
                .as_ref()
                .map(|keys| keys.join(","))
                .unwrap_or_else(|| "NULL".to_string()),
            or_null(row.key.as_deref()),
            or_null(row.key_len.as_deref()),
            or_null(row.ref_cols.as_deref()),
            row.rows.to_string(),
            row.extra.clone(),
        ]);
    }

    table
}

pub fn print_plan(title: &str, plan: &Plan) {
    println!("=== {} ===", title);
    if plan.is_empty() {
        println!("(empty plan)");
    } else {
        println!("{}", plan_table(plan));
    }
}

pub fn suggestion_lines(suggestions: &IndexSuggestions) -> Vec<String> {
    if suggestions.is_empty() {
        return vec![NO_SUGGESTIONS.to_string()];
    }

    std::iter::once("Index Improvement Suggestions:".to_string())
        .chain(suggestions.iter().map(|(_, message)| format!("- {}", message)))
        .collect()
}

pub fn timing_line(label: &str, elapsed: Duration) -> String {
    format!("{} execution time: {:.4} seconds", label, elapsed.as_secs_f64())
}

pub fn improvement_line(percent: f64) -> String {
    format!("Performance improvement: {:.2}%", percent)
}

pub fn maintenance_lines(report: &MaintenanceReport) -> Vec<String> {
    let mut lines = vec![format!(
        "Row count for '{}': {}",
        report.table,
        report
            .row_count
            .map(|count| count.to_string())
            .unwrap_or_else(|| "unknown".to_string())
    )];
    if let Some(bytes) = report.buffer_pool_bytes {
        lines.push(format!("InnoDB Buffer Pool Data: {}", bytes));
    }
    lines.push(format!(
        "Maintenance completed at {}",
        report.committed_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    lines
}

pub fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}
