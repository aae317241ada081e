//! Tabular objects: the row/column capability set a cursor scans.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::column::{Column, ElementKind, Jagged, RawValue};
use crate::error::{Error, Result};

/// A named table of equally-long columns, read one row at a time.
pub trait TabularObject {
    /// Object name as stored in the catalog.
    fn name(&self) -> &str;

    /// Declared number of rows.
    fn row_count(&self) -> u64;

    /// Read `column` at `row`. Sequence values borrow the object's storage and
    /// stay valid only until the next `prefetch`.
    fn read_column(&self, row: u64, column: &str) -> Result<RawValue<'_>>;

    /// Stored kind of `column`, when known without reading data.
    fn column_kind(&self, _column: &str) -> Option<ElementKind> {
        None
    }

    /// Make `row` readable. Called once per row, in increasing order.
    fn prefetch(&mut self, _row: u64) -> Result<()> {
        Ok(())
    }
}

/// In-memory tree backed by typed columns.
///
/// Cloning is cheap: column storage is shared.
#[derive(Debug, Clone)]
pub struct Tree {
    name: String,
    entries: u64,
    columns: Arc<BTreeMap<String, Column>>,
}

impl Tree {
    /// Build a tree. Columns shorter than `entries` fail at `prefetch` time.
    pub fn new(name: impl Into<String>, entries: u64, columns: BTreeMap<String, Column>) -> Self {
        Self { name: name.into(), entries, columns: Arc::new(columns) }
    }

    /// Column names in sorted order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.keys().map(String::as_str).collect()
    }

    /// Find a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.get(name)
    }

    pub(crate) fn columns(&self) -> &BTreeMap<String, Column> {
        &self.columns
    }
}

impl TabularObject for Tree {
    fn name(&self) -> &str {
        &self.name
    }

    fn row_count(&self) -> u64 {
        self.entries
    }

    fn read_column(&self, row: u64, column: &str) -> Result<RawValue<'_>> {
        let col = self.columns.get(column).ok_or_else(|| Error::ColumnMissing {
            column: column.to_string(),
            object: self.name.clone(),
        })?;
        col.value(row as usize).ok_or_else(|| {
            Error::Cursor(format!(
                "entry {row} out of range for column '{column}' ({} entries)",
                col.len()
            ))
        })
    }

    fn column_kind(&self, column: &str) -> Option<ElementKind> {
        self.columns.get(column).map(Column::kind)
    }

    fn prefetch(&mut self, row: u64) -> Result<()> {
        if row >= self.entries {
            return Err(Error::Cursor(format!(
                "entry {row} beyond '{}' ({} entries)",
                self.name, self.entries
            )));
        }
        if let Some((name, col)) = self.columns.iter().find(|(_, c)| (c.len() as u64) <= row) {
            return Err(Error::Format(format!(
                "branch '{name}' truncated: holds {} entries, '{}' declares {}",
                col.len(),
                self.name,
                self.entries
            )));
        }
        Ok(())
    }
}

/// Programmatic construction of trees.
///
/// ```
/// use evscan::{TabularObject, TreeBuilder};
///
/// let tree = TreeBuilder::new("treeJets")
///     .f32("jetMass", vec![1.0, 2.0])
///     .i32("ntowers", vec![3, 4])
///     .build();
/// assert_eq!(tree.row_count(), 2);
/// ```
#[derive(Debug, Default)]
pub struct TreeBuilder {
    name: String,
    entries: Option<u64>,
    columns: BTreeMap<String, Column>,
}

impl TreeBuilder {
    /// Start an empty tree.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Default::default() }
    }

    /// Override the declared entry count (defaults to the longest column).
    pub fn entries(mut self, entries: u64) -> Self {
        self.entries = Some(entries);
        self
    }

    /// Add a column.
    pub fn column(mut self, name: impl Into<String>, column: Column) -> Self {
        self.columns.insert(name.into(), column);
        self
    }

    /// Add an `f32` scalar column.
    pub fn f32(self, name: impl Into<String>, values: Vec<f32>) -> Self {
        self.column(name, Column::F32(values))
    }

    /// Add an `f64` scalar column.
    pub fn f64(self, name: impl Into<String>, values: Vec<f64>) -> Self {
        self.column(name, Column::F64(values))
    }

    /// Add an `i32` scalar column.
    pub fn i32(self, name: impl Into<String>, values: Vec<i32>) -> Self {
        self.column(name, Column::I32(values))
    }

    /// Add an `f32` sequence column.
    pub fn vec_f32(self, name: impl Into<String>, rows: Vec<Vec<f32>>) -> Self {
        self.column(name, Column::VecF32(Jagged::from_nested(rows)))
    }

    /// Finish the tree.
    pub fn build(self) -> Tree {
        let longest = self.columns.values().map(|c| c.len() as u64).max().unwrap_or(0);
        Tree::new(self.name, self.entries.unwrap_or(longest), self.columns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_column_reports_missing_column() {
        let tree = TreeBuilder::new("t").f32("a", vec![1.0]).build();
        let err = tree.read_column(0, "b").unwrap_err();
        assert!(matches!(err, Error::ColumnMissing { ref column, .. } if column == "b"));
        assert_eq!(tree.read_column(0, "a").unwrap(), RawValue::F32(1.0));
    }

    #[test]
    fn prefetch_detects_truncated_branch() {
        let mut tree = TreeBuilder::new("t").f32("a", vec![1.0, 2.0, 3.0]).f32("b", vec![1.0]).build();
        assert_eq!(tree.row_count(), 3);
        tree.prefetch(0).unwrap();
        let err = tree.prefetch(1).unwrap_err();
        assert!(err.to_string().contains("'b' truncated"), "{err}");
    }

    #[test]
    fn builder_entry_override() {
        let tree = TreeBuilder::new("t").i32("n", vec![1, 2, 3]).entries(2).build();
        assert_eq!(tree.row_count(), 2);
        assert_eq!(tree.column_kind("n"), Some(ElementKind::I32));
        assert_eq!(tree.column_kind("m"), None);
        assert_eq!(tree.column_names(), vec!["n"]);
    }
}
