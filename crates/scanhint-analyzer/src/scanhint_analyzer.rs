//! scanhint analyzer - execution plan analysis and index suggestions
//!
//! This crate provides functionality for:
//! - Scanning a query's WHERE clause for simple comparison predicates
//! - Parsing MySQL EXPLAIN output into a flat plan model
//! - Flagging full table scans without a usable index and suggesting index columns
//! - Timing queries for before/after comparisons

pub mod explain;
pub mod predicates;
pub mod suggestions;
pub mod timing;

#[cfg(test)]
mod test_support;

pub use explain::*;
pub use predicates::*;
pub use suggestions::*;
pub use timing::*;
