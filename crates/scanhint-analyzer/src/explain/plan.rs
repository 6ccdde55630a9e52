//! Plan model - one record per row of MySQL's traditional EXPLAIN output
//!
//! MySQL's tabular EXPLAIN returns one row per table (or derived/union
//! result) touched by the query. The analyzer looks at each row on its own,
//! so the model is a flat ordered list rather than a tree.

use serde::{Deserialize, Serialize};

/// Access type MySQL reports for a full table scan
pub const FULL_SCAN_ACCESS_TYPE: &str = "ALL";

/// Label used in place of the table name for rows without one
pub const DERIVED_TABLE_LABEL: &str = "<derived>";

/// A single row of EXPLAIN output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanRow {
    /// Query block id; NULL for UNION RESULT rows
    pub id: Option<u32>,
    /// SIMPLE, PRIMARY, SUBQUERY, DERIVED, UNION, ...
    pub select_type: String,
    /// Table name; absent for some derived rows
    pub table: Option<String>,
    /// Join/access type ("ALL", "ref", "index", ...)
    pub access_type: String,
    /// Indexes MySQL considered usable
    pub possible_keys: Option<Vec<String>>,
    /// Index MySQL actually chose
    pub key: Option<String>,
    /// Length of the chosen key
    pub key_len: Option<String>,
    /// Columns or constants compared to the key
    pub ref_cols: Option<String>,
    /// Estimated rows examined
    pub rows: u64,
    /// Extra information ("Using where", "Using filesort", ...)
    pub extra: String,
}

impl PlanRow {
    /// Creates a row with the mandatory fields; everything else is absent
    pub fn new(
        id: u32,
        select_type: impl Into<String>,
        table: Option<&str>,
        access_type: impl Into<String>,
    ) -> Self {
        Self {
            id: Some(id),
            select_type: select_type.into(),
            table: table.map(String::from),
            access_type: access_type.into(),
            possible_keys: None,
            key: None,
            key_len: None,
            ref_cols: None,
            rows: 0,
            extra: String::new(),
        }
    }

    /// Overrides the query block id
    pub fn with_id(mut self, id: Option<u32>) -> Self {
        self.id = id;
        self
    }

    /// Sets the possible keys
    pub fn with_possible_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.possible_keys = Some(keys.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the chosen key
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Sets the key length
    pub fn with_key_len(mut self, key_len: impl Into<String>) -> Self {
        self.key_len = Some(key_len.into());
        self
    }

    /// Sets the ref column
    pub fn with_ref(mut self, ref_cols: impl Into<String>) -> Self {
        self.ref_cols = Some(ref_cols.into());
        self
    }

    /// Sets the row estimate
    pub fn with_rows(mut self, rows: u64) -> Self {
        self.rows = rows;
        self
    }

    /// Sets the Extra column
    pub fn with_extra(mut self, extra: impl Into<String>) -> Self {
        self.extra = extra.into();
        self
    }

    /// True when MySQL reads every row of the table
    pub fn is_full_scan(&self) -> bool {
        self.access_type.eq_ignore_ascii_case(FULL_SCAN_ACCESS_TYPE)
    }

    /// True when no index was considered, or none was chosen
    pub fn lacks_usable_index(&self) -> bool {
        let no_possible_keys = self
            .possible_keys
            .as_ref()
            .is_none_or(|keys| keys.is_empty());
        no_possible_keys || self.key.is_none()
    }

    /// A full table scan that no index can help with as things stand
    pub fn is_unindexed_full_scan(&self) -> bool {
        self.is_full_scan() && self.lacks_usable_index()
    }

    /// Table name as reported, or [`DERIVED_TABLE_LABEL`] when absent
    pub fn table_label(&self) -> &str {
        self.table.as_deref().unwrap_or(DERIVED_TABLE_LABEL)
    }
}

/// An execution plan: EXPLAIN rows in the order MySQL returned them
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    rows: Vec<PlanRow>,
}

impl Plan {
    /// Creates a plan from rows
    pub fn new(rows: Vec<PlanRow>) -> Self {
        Self { rows }
    }

    /// Appends a row
    pub fn push(&mut self, row: PlanRow) {
        self.rows.push(row);
    }

    /// All rows in display order
    pub fn rows(&self) -> &[PlanRow] {
        &self.rows
    }

    /// Iterates over the rows
    pub fn iter(&self) -> std::slice::Iter<'_, PlanRow> {
        self.rows.iter()
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True if the plan has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows doing a full scan without a usable index
    pub fn unindexed_full_scans(&self) -> impl Iterator<Item = &PlanRow> {
        self.rows.iter().filter(|row| row.is_unindexed_full_scan())
    }

    /// Sum of the per-row estimates
    pub fn total_rows_estimate(&self) -> u64 {
        self.rows.iter().map(|row| row.rows).sum()
    }
}

impl FromIterator<PlanRow> for Plan {
    fn from_iter<T: IntoIterator<Item = PlanRow>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Plan {
    type Item = &'a PlanRow;
    type IntoIter = std::slice::Iter<'a, PlanRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

impl IntoIterator for Plan {
    type Item = PlanRow;
    type IntoIter = std::vec::IntoIter<PlanRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

#[cfg(test)]
mod tests;
