//! Regex-based WHERE clause scanner

use regex::Regex;
use std::sync::LazyLock;

// Everything after the first WHERE, newlines included. Trailing GROUP BY /
// ORDER BY / LIMIT clauses are not cut off.
static WHERE_CLAUSE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)\bWHERE\b(.*)").expect("valid regex"));

static CONJUNCTION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bAND\b|\bOR\b").expect("valid regex"));

static SIMPLE_PREDICATE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z_][A-Za-z0-9_]*)\s*(?:>=|<=|=|>|<)").expect("valid regex")
});

/// Extracts candidate index columns from a query's filter clause
pub trait ConditionColumnExtractor {
    /// Returns the filtered column names in left-to-right order, duplicates included.
    fn extract_columns(&self, query: &str) -> Vec<String>;
}

/// The default extractor: splits the WHERE clause on AND/OR and keeps the
/// identifiers of fragments shaped like `column = value`, `column > value`,
/// `column <= value` and so on.
///
/// `IN (...)`, `LIKE`, `BETWEEN`, function calls and qualified names
/// (`t.col = 1`) are skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct PredicateScanner;

impl ConditionColumnExtractor for PredicateScanner {
    fn extract_columns(&self, query: &str) -> Vec<String> {
        let Some(conditions) = filter_clause(query) else {
            return Vec::new();
        };

        CONJUNCTION_REGEX
            .split(conditions)
            .filter_map(|fragment| {
                SIMPLE_PREDICATE_REGEX
                    .captures(fragment.trim())
                    .and_then(|caps| caps.get(1))
                    .map(|column| column.as_str().to_string())
            })
            .collect()
    }
}

/// Returns the text following the first `WHERE` keyword, if any.
///
/// # Example
///
/// ```
/// use scanhint_analyzer::predicates::filter_clause;
///
/// assert_eq!(filter_clause("SELECT 1 FROM t where a = 1"), Some(" a = 1"));
/// assert_eq!(filter_clause("SELECT 1 FROM t"), None);
/// ```
pub fn filter_clause(query: &str) -> Option<&str> {
    WHERE_CLAUSE_REGEX
        .captures(query)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Extracts candidate columns using the default [`PredicateScanner`].
///
/// # Example
///
/// ```
/// use scanhint_analyzer::predicates::extract_condition_columns;
///
/// let columns = extract_condition_columns(
///     "SELECT * FROM orders WHERE customer_id = 7 AND total > 100",
/// );
/// assert_eq!(columns, vec!["customer_id", "total"]);
/// ```
pub fn extract_condition_columns(query: &str) -> Vec<String> {
    PredicateScanner.extract_columns(query)
}
