//! MySQL EXPLAIN parser
//!
//! Turns MySQL's traditional EXPLAIN output into a [`Plan`]. Two inputs are
//! supported:
//! - result rows fetched through a [`Connection`](scanhint_core::Connection)
//!   (named columns, SQL NULLs)
//! - the tab- or pipe-separated text the `mysql` client prints, for
//!   analysing pasted output offline
//!
//! Both the pre-5.7 layout and the layout with `partitions`/`filtered`
//! columns are accepted.
//!
//! # Examples
//!
//! ```
//! use scanhint_analyzer::explain::{MalformedRowPolicy, parse_tabular_explain};
//!
//! let output = "1\tSIMPLE\torders\tALL\tNULL\tNULL\tNULL\tNULL\t1000\tUsing where";
//! let plan = parse_tabular_explain(output, MalformedRowPolicy::Skip).unwrap();
//! assert!(plan.rows()[0].is_unindexed_full_scan());
//! ```

use crate::explain::plan::{Plan, PlanRow};
use scanhint_core::{QueryResult, Row, ScanhintError, Value};
use thiserror::Error;

/// Errors that can occur when reading EXPLAIN output
#[derive(Debug, Error)]
pub enum ExplainError {
    #[error("Empty EXPLAIN output")]
    EmptyOutput,

    #[error("Malformed EXPLAIN row {line}: {reason}")]
    MalformedRow { line: usize, reason: String },

    #[error(transparent)]
    Database(#[from] ScanhintError),
}

/// Result type for EXPLAIN parsing
pub type Result<T> = std::result::Result<T, ExplainError>;

/// What to do with an EXPLAIN row that is missing its access type or has a
/// non-numeric id
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MalformedRowPolicy {
    /// Log a warning and leave the row out of the plan
    #[default]
    Skip,
    /// Abort with [`ExplainError::MalformedRow`]
    Fail,
}

impl MalformedRowPolicy {
    fn handle(self, line: usize, reason: String) -> Result<()> {
        match self {
            Self::Skip => {
                tracing::warn!(line, reason = %reason, "skipping malformed EXPLAIN row");
                Ok(())
            }
            Self::Fail => Err(ExplainError::MalformedRow { line, reason }),
        }
    }
}

/// Builds a plan from EXPLAIN result rows.
///
/// Columns are looked up by name, so the optional `partitions` and
/// `filtered` columns are simply ignored. An empty result is an empty plan.
pub fn plan_from_result(result: &QueryResult, policy: MalformedRowPolicy) -> Result<Plan> {
    let mut rows = Vec::with_capacity(result.rows.len());

    for (idx, row) in result.rows.iter().enumerate() {
        match plan_row_from_result_row(row) {
            Ok(plan_row) => rows.push(plan_row),
            Err(reason) => policy.handle(idx + 1, reason)?,
        }
    }

    Ok(Plan::new(rows))
}

fn plan_row_from_result_row(row: &Row) -> std::result::Result<PlanRow, String> {
    let access_type = match row.get_by_name("type") {
        None => return Err("missing type column".to_string()),
        // "No tables used" and "Impossible WHERE" rows report a NULL type.
        Some(Value::Null) => "NULL".to_string(),
        Some(value) => {
            let text = value.to_string();
            if text.trim().is_empty() {
                return Err("empty access type".to_string());
            }
            text.trim().to_string()
        }
    };

    let id = match row.get_by_name("id") {
        None | Some(Value::Null) => None,
        Some(value) => Some(
            value
                .as_u64()
                .and_then(|id| u32::try_from(id).ok())
                .ok_or_else(|| format!("non-integer id '{}'", value))?,
        ),
    };

    let text = |name: &str| row.get_by_name(name).and_then(Value::to_text);

    Ok(PlanRow {
        id,
        select_type: text("select_type").unwrap_or_default(),
        table: text("table"),
        access_type,
        possible_keys: text("possible_keys").and_then(|keys| split_key_list(&keys)),
        key: text("key"),
        key_len: text("key_len"),
        ref_cols: text("ref"),
        rows: row
            .get_by_name("rows")
            .and_then(Value::as_u64)
            .unwrap_or(0),
        extra: text("Extra").unwrap_or_default(),
    })
}

/// Splits MySQL's comma-separated possible_keys column
fn split_key_list(keys: &str) -> Option<Vec<String>> {
    let trimmed = keys.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("NULL") {
        return None;
    }
    Some(
        trimmed
            .split(',')
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(String::from)
            .collect(),
    )
}

/// Parses the traditional tabular EXPLAIN text.
///
/// Accepts tab-separated output (`mysql -B`) and the boxed `| ... |` format.
/// Header and border lines are skipped.
pub fn parse_tabular_explain(text: &str, policy: MalformedRowPolicy) -> Result<Plan> {
    let lines: Vec<(usize, &str)> = text
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line))
        .filter(|(_, line)| !line.trim().is_empty() && !is_border_line(line))
        .filter(|(_, line)| !is_header_line(line))
        .collect();

    if lines.is_empty() {
        return Err(ExplainError::EmptyOutput);
    }

    let mut rows = Vec::with_capacity(lines.len());
    for (line_no, line) in lines {
        match parse_tabular_row(line) {
            Ok(row) => rows.push(row),
            Err(reason) => policy.handle(line_no, reason)?,
        }
    }

    Ok(Plan::new(rows))
}

fn is_border_line(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.starts_with('+') && trimmed.chars().all(|c| c == '+' || c == '-')
}

fn is_header_line(line: &str) -> bool {
    line.contains("select_type")
}

fn split_fields(line: &str) -> Vec<&str> {
    if line.contains('\t') {
        line.split('\t').map(str::trim).collect()
    } else {
        let trimmed = line.trim();
        let inner = trimmed.strip_prefix('|').unwrap_or(trimmed);
        let inner = inner.strip_suffix('|').unwrap_or(inner);
        inner.split('|').map(str::trim).collect()
    }
}

fn parse_tabular_row(line: &str) -> std::result::Result<PlanRow, String> {
    let parts = split_fields(line);

    // Need at least id, select_type, table, type
    if parts.len() < 4 {
        return Err(format!("expected at least 4 columns, found {}", parts.len()));
    }

    // Without partitions: id | select_type | table | type | possible_keys | key | key_len | ref | rows [| filtered] | Extra
    // With partitions:    id | select_type | table | partitions | type | ...
    let has_partitions = parts.len() >= 12
        || (parts.len() >= 5 && !is_access_type(parts[3]) && is_access_type(parts[4]));
    let base = if has_partitions { 4 } else { 3 };

    let id = match parts[0] {
        s if is_null(s) => None,
        s => Some(
            s.parse::<u32>()
                .map_err(|_| format!("non-integer id '{}'", s))?,
        ),
    };

    let access_type = parts
        .get(base)
        .copied()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| "missing access type".to_string())?;

    let field = |idx: usize| -> Option<String> {
        parts
            .get(idx)
            .copied()
            .filter(|s| !is_null(s))
            .map(String::from)
    };

    let rows_idx = base + 5;
    let extra = if parts.len() > rows_idx + 1 {
        parts.last().copied().filter(|s| !is_null(s)).unwrap_or("")
    } else {
        ""
    };

    Ok(PlanRow {
        id,
        select_type: parts[1].to_string(),
        table: field(2),
        access_type: access_type.to_string(),
        possible_keys: parts.get(base + 1).and_then(|s| split_key_list(s)),
        key: field(base + 2),
        key_len: field(base + 3),
        ref_cols: field(base + 4),
        rows: parts
            .get(rows_idx)
            .and_then(|s| s.parse().ok())
            .unwrap_or(0),
        extra: extra.to_string(),
    })
}

fn is_null(s: &str) -> bool {
    s.is_empty() || s.eq_ignore_ascii_case("NULL")
}

fn is_access_type(s: &str) -> bool {
    matches!(
        s.to_lowercase().as_str(),
        "all"
            | "index"
            | "range"
            | "ref"
            | "eq_ref"
            | "const"
            | "system"
            | "fulltext"
            | "ref_or_null"
            | "index_merge"
            | "unique_subquery"
            | "index_subquery"
    )
}
