//! EXPLAIN plan model and MySQL plan parsing
//!
//! - [`plan`] - flat per-row plan model
//! - [`mysql`] - conversion from EXPLAIN result rows or pasted tabular text
//! - [`source`] - issuing EXPLAIN through a live connection

pub mod mysql;
pub mod plan;
pub mod source;

pub use mysql::{ExplainError, MalformedRowPolicy, parse_tabular_explain, plan_from_result};
pub use plan::{DERIVED_TABLE_LABEL, FULL_SCAN_ACCESS_TYPE, Plan, PlanRow};
pub use source::{explain_sql, fetch_plan};
