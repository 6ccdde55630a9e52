//! Best-effort predicate scanning
//!
//! Finds the columns a query filters on by pattern matching its WHERE clause.
//! This is not a SQL parser: only `column OP value` fragments joined by
//! AND/OR are recognised. Other extractors plug in through
//! `ConditionColumnExtractor`.

mod scanner;

pub use scanner::*;
