//! Index Suggestions Module
//!
//! Walks an EXPLAIN plan looking for full table scans that no index can
//! serve, and pairs them with the columns the query filters on to produce
//! one recommendation per table.

mod analyzer;

pub use analyzer::*;
