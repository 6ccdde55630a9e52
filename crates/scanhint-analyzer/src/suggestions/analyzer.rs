//! Plan Analyzer - Index Suggestions
//!
//! Flags EXPLAIN rows where MySQL reads the whole table (`type = ALL`) and has
//! no index to fall back on, then suggests indexing the columns the query
//! filters on.

use crate::explain::{Plan, PlanRow};
use crate::predicates::{ConditionColumnExtractor, PredicateScanner};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Builds the message for a table with known filter columns
pub fn index_message(table: &str, columns: &[String]) -> String {
    format!(
        "Consider adding an index on table '{}' for columns: {}.",
        table,
        columns.join(", ")
    )
}

/// Builds the fallback message used when no filter columns were found
pub fn review_message(table: &str) -> String {
    format!(
        "Review the WHERE clause for table '{}' and consider adding appropriate indexes.",
        table
    )
}

/// Suggestions keyed by table, in the order tables were first flagged.
///
/// A later row for the same table replaces the earlier message but keeps the
/// table's original position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IndexSuggestions {
    by_table: IndexMap<String, String>,
}

impl IndexSuggestions {
    /// Creates an empty set of suggestions
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a message for a table, replacing any previous one
    pub fn insert(&mut self, table: impl Into<String>, message: impl Into<String>) {
        self.by_table.insert(table.into(), message.into());
    }

    /// Returns the message for a table
    pub fn get(&self, table: &str) -> Option<&str> {
        self.by_table.get(table).map(String::as_str)
    }

    /// Iterates over `(table, message)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.by_table
            .iter()
            .map(|(table, message)| (table.as_str(), message.as_str()))
    }

    /// Tables with a suggestion
    pub fn tables(&self) -> impl Iterator<Item = &str> {
        self.by_table.keys().map(String::as_str)
    }

    /// Number of tables with a suggestion
    pub fn len(&self) -> usize {
        self.by_table.len()
    }

    /// True if nothing was flagged
    pub fn is_empty(&self) -> bool {
        self.by_table.is_empty()
    }

    /// Consumes the suggestions, returning the underlying map
    pub fn into_inner(self) -> IndexMap<String, String> {
        self.by_table
    }
}

impl<K, V> FromIterator<(K, V)> for IndexSuggestions
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut suggestions = Self::new();
        for (table, message) in iter {
            suggestions.insert(table, message);
        }
        suggestions
    }
}

/// Produces index suggestions from a plan and the query it was made for
#[derive(Debug, Clone, Default)]
pub struct PlanAnalyzer<E = PredicateScanner> {
    extractor: E,
}

impl PlanAnalyzer {
    /// Creates an analyzer using the default predicate scanner
    pub fn new() -> Self {
        Self::default()
    }
}

impl<E: ConditionColumnExtractor> PlanAnalyzer<E> {
    /// Creates an analyzer with a custom column extractor
    pub fn with_extractor(extractor: E) -> Self {
        Self { extractor }
    }

    /// Returns the column extractor
    pub fn extractor(&self) -> &E {
        &self.extractor
    }

    /// Analyzes a plan and returns one suggestion per flagged table.
    ///
    /// Rows that are not unindexed full scans are ignored. The result depends
    /// only on the inputs.
    pub fn analyze(&self, plan: &Plan, query: &str) -> IndexSuggestions {
        let candidates = self.extractor.extract_columns(query);
        tracing::debug!(
            rows = plan.len(),
            candidates = ?candidates,
            "analyzing plan for index suggestions"
        );

        let mut suggestions = IndexSuggestions::new();
        for row in plan.unindexed_full_scans() {
            let table = row.table_label();
            tracing::debug!(table, rows = row.rows, "full table scan without usable index");
            suggestions.insert(table, suggestion_for(row, &candidates));
        }

        suggestions
    }
}

fn suggestion_for(row: &PlanRow, candidates: &[String]) -> String {
    if candidates.is_empty() {
        review_message(row.table_label())
    } else {
        index_message(row.table_label(), candidates)
    }
}

/// Analyzes a plan with the default [`PlanAnalyzer`].
///
/// # Example
///
/// ```
/// use scanhint_analyzer::explain::{Plan, PlanRow};
/// use scanhint_analyzer::suggestions::suggest_indexes;
///
/// let plan = Plan::new(vec![PlanRow::new(1, "SIMPLE", Some("orders"), "ALL")]);
/// let suggestions = suggest_indexes(&plan, "SELECT * FROM orders WHERE customer_id = 7");
/// assert_eq!(
///     suggestions.get("orders"),
///     Some("Consider adding an index on table 'orders' for columns: customer_id.")
/// );
/// ```
pub fn suggest_indexes(plan: &Plan, query: &str) -> IndexSuggestions {
    PlanAnalyzer::new().analyze(plan, query)
}

#[cfg(test)]
mod tests;
