//! Sortable, exportable table model
//!
//! Columns are declared up front; each column name is resolved to a typed
//! accessor when the table is built, so a missing accessor fails at
//! construction rather than at render time. Sorting permutes a row index and
//! never touches the rows themselves.
//!
//! Header clicks: the same column flips direction, a different column starts
//! descending. The initial sort order only seeds that toggle; rows are shown
//! in input order until the first header click.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

use tracing::warn;

use crate::error::{SortError, TableError};

// =============================================================================
// CELLS AND COLUMNS
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{}", s),
            CellValue::Number(n) => write!(f, "{}", n),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<u64> for CellValue {
    fn from(n: u64) -> Self {
        CellValue::Number(n as f64)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableColumn {
    /// Accessor key
    pub name: String,
    /// Header label
    pub display: String,
    pub clickable: bool,
}

impl TableColumn {
    pub fn new(name: impl Into<String>, display: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display: display.into(),
            clickable: false,
        }
    }

    pub fn clickable(mut self) -> Self {
        self.clickable = true;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn sign(self) -> i8 {
        match self {
            SortDirection::Ascending => 1,
            SortDirection::Descending => -1,
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub column_index: usize,
    pub direction: SortDirection,
}

impl SortOrder {
    pub fn new(column_index: usize, direction: SortDirection) -> Self {
        Self {
            column_index,
            direction,
        }
    }
}

type Accessor<R> = Box<dyn Fn(&R) -> CellValue + Send + Sync>;

/// Column name -> accessor closure
pub struct ColumnAccessors<R> {
    by_name: HashMap<String, Accessor<R>>,
}

impl<R> Default for ColumnAccessors<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> ColumnAccessors<R> {
    pub fn new() -> Self {
        Self {
            by_name: HashMap::new(),
        }
    }

    pub fn with<F>(mut self, name: impl Into<String>, accessor: F) -> Self
    where
        F: Fn(&R) -> CellValue + Send + Sync + 'static,
    {
        self.by_name.insert(name.into(), Box::new(accessor));
        self
    }
}

// =============================================================================
// TABLE
// =============================================================================

pub struct Table<R> {
    columns: Vec<TableColumn>,
    accessors: Vec<Accessor<R>>,
    rows: Vec<R>,
    order: Vec<usize>,
    sort: SortOrder,
    initial_sort: SortOrder,
    user_sorted: bool,
}

impl<R> fmt::Debug for Table<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Table")
            .field("columns", &self.columns)
            .field("rows", &self.rows.len())
            .field("sort", &self.sort)
            .field("user_sorted", &self.user_sorted)
            .finish_non_exhaustive()
    }
}

impl<R> Table<R> {
    pub fn new(
        columns: Vec<TableColumn>,
        mut accessors: ColumnAccessors<R>,
        initial_sort: SortOrder,
    ) -> Result<Self, TableError> {
        if initial_sort.column_index >= columns.len() {
            return Err(TableError::InitialSortOutOfRange(initial_sort.column_index));
        }
        let resolved = columns
            .iter()
            .map(|c| {
                accessors
                    .by_name
                    .remove(&c.name)
                    .ok_or_else(|| TableError::MissingAccessor(c.name.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            columns,
            accessors: resolved,
            rows: Vec::new(),
            order: Vec::new(),
            sort: initial_sort,
            initial_sort,
            user_sorted: false,
        })
    }

    pub fn columns(&self) -> &[TableColumn] {
        &self.columns
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn sort_order(&self) -> SortOrder {
        self.sort
    }

    /// True once a header click has been applied
    pub fn is_sorted(&self) -> bool {
        self.user_sorted
    }

    /// Replace the rows; an applied sort is re-applied to the new rows
    pub fn set_rows(&mut self, rows: Vec<R>) {
        self.rows = rows;
        self.order = (0..self.rows.len()).collect();
        if self.user_sorted {
            match self.sorted_order(self.sort) {
                Ok(order) => self.order = order,
                Err(err) => {
                    warn!(%err, "keeping input order for new rows");
                    self.user_sorted = false;
                }
            }
        }
    }

    /// Back to input order and the initial toggle state
    pub fn reset_sort(&mut self) {
        self.sort = self.initial_sort;
        self.user_sorted = false;
        self.order = (0..self.rows.len()).collect();
    }

    /// Apply a header click; on error the previous order and state are kept
    pub fn click_header(&mut self, column_index: usize) -> Result<(), SortError> {
        if column_index >= self.columns.len() {
            return Err(SortError::ColumnOutOfRange(column_index));
        }
        let next = if column_index == self.sort.column_index {
            SortOrder::new(column_index, self.sort.direction.reversed())
        } else {
            SortOrder::new(column_index, SortDirection::Descending)
        };
        self.order = self.sorted_order(next)?;
        self.sort = next;
        self.user_sorted = true;
        Ok(())
    }

    fn sorted_order(&self, sort: SortOrder) -> Result<Vec<usize>, SortError> {
        let accessor = &self.accessors[sort.column_index];
        let keys: Vec<CellValue> = self.rows.iter().map(|r| accessor(r)).collect();

        let mut failure: Option<SortError> = None;
        let mut order: Vec<usize> = (0..self.rows.len()).collect();
        order.sort_by(|&a, &b| match compare_cells(&keys[a], &keys[b]) {
            Some(ordering) => match sort.direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            },
            None => {
                failure.get_or_insert_with(|| SortError::Incomparable {
                    column: self.columns[sort.column_index].name.clone(),
                    left: keys[a].to_string(),
                    right: keys[b].to_string(),
                });
                Ordering::Equal
            }
        });

        match failure {
            Some(err) => Err(err),
            None => Ok(order),
        }
    }

    /// Rows in display order
    pub fn rows_in_order(&self) -> impl Iterator<Item = &R> {
        self.order.iter().filter_map(|i| self.rows.get(*i))
    }

    /// Input index of the row shown at `display_index`
    pub fn row_index(&self, display_index: usize) -> Option<usize> {
        self.order.get(display_index).copied()
    }

    pub fn cell(&self, row: &R, column_index: usize) -> Option<CellValue> {
        self.accessors.get(column_index).map(|accessor| accessor(row))
    }

    /// Header line then one line per row in display order, comma-joined,
    /// values written as they are with no quoting
    pub fn to_csv(&self) -> String {
        let mut lines = Vec::with_capacity(self.rows.len() + 1);
        lines.push(
            self.columns
                .iter()
                .map(|c| c.name.as_str())
                .collect::<Vec<_>>()
                .join(","),
        );
        for row in self.rows_in_order() {
            lines.push(
                self.accessors
                    .iter()
                    .map(|accessor| accessor(row).to_string())
                    .collect::<Vec<_>>()
                    .join(","),
            );
        }
        lines.join("\n")
    }
}

/// Text compares lexicographically, numbers by the sign of their difference;
/// NaN and mixed kinds do not compare
fn compare_cells(a: &CellValue, b: &CellValue) -> Option<Ordering> {
    match (a, b) {
        (CellValue::Text(x), CellValue::Text(y)) => Some(x.cmp(y)),
        (CellValue::Number(x), CellValue::Number(y)) => x.partial_cmp(y),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        name: &'static str,
        revisions: f64,
    }

    fn rows() -> Vec<Row> {
        vec![
            Row {
                name: "b.rs",
                revisions: 3.0,
            },
            Row {
                name: "a.rs",
                revisions: 9.0,
            },
            Row {
                name: "c.rs",
                revisions: 1.0,
            },
        ]
    }

    fn table() -> Table<Row> {
        let columns = vec![
            TableColumn::new("name", "Name").clickable(),
            TableColumn::new("num_revisions", "Revisions"),
        ];
        let accessors = ColumnAccessors::new()
            .with("name", |r: &Row| CellValue::from(r.name))
            .with("num_revisions", |r: &Row| CellValue::from(r.revisions));
        let mut table = Table::new(columns, accessors, SortOrder::new(1, SortDirection::Descending)).unwrap();
        table.set_rows(rows());
        table
    }

    fn names(table: &Table<Row>) -> Vec<&'static str> {
        table.rows_in_order().map(|r| r.name).collect()
    }

    #[test]
    fn test_missing_accessor_fails_at_construction() {
        let columns = vec![TableColumn::new("name", "Name"), TableColumn::new("size", "Size")];
        let accessors = ColumnAccessors::new().with("name", |r: &Row| CellValue::from(r.name));
        let err = Table::new(columns, accessors, SortOrder::new(0, SortDirection::Ascending)).unwrap_err();
        assert_eq!(err, TableError::MissingAccessor("size".to_string()));
    }

    #[test]
    fn test_initial_order_is_input_order() {
        let table = table();
        assert!(!table.is_sorted());
        assert_eq!(names(&table), vec!["b.rs", "a.rs", "c.rs"]);
    }

    #[test]
    fn test_new_column_sorts_descending() {
        let mut table = table();
        table.click_header(0).unwrap();
        assert_eq!(table.sort_order(), SortOrder::new(0, SortDirection::Descending));
        assert_eq!(names(&table), vec!["c.rs", "b.rs", "a.rs"]);
    }

    #[test]
    fn test_same_column_toggles_direction() {
        let mut table = table();
        // Initial state already points at column 1 descending, so the first
        // click on it flips to ascending
        table.click_header(1).unwrap();
        assert_eq!(table.sort_order().direction, SortDirection::Ascending);
        let ascending = names(&table);
        assert_eq!(ascending, vec!["c.rs", "b.rs", "a.rs"]);

        table.click_header(1).unwrap();
        let mut descending = names(&table);
        descending.reverse();
        assert_eq!(descending, ascending);
    }

    #[test]
    fn test_nan_is_a_sort_error() {
        let mut table = table();
        table.set_rows(vec![
            Row {
                name: "x",
                revisions: f64::NAN,
            },
            Row {
                name: "y",
                revisions: 1.0,
            },
        ]);
        let before = names(&table);
        assert!(matches!(table.click_header(1), Err(SortError::Incomparable { .. })));
        assert_eq!(names(&table), before);
        assert!(!table.is_sorted());
    }

    #[test]
    fn test_mixed_kinds_are_a_sort_error() {
        let columns = vec![TableColumn::new("value", "Value")];
        let accessors = ColumnAccessors::new().with("value", |r: &Row| {
            if r.revisions > 2.0 {
                CellValue::from(r.revisions)
            } else {
                CellValue::from(r.name)
            }
        });
        let mut table = Table::new(columns, accessors, SortOrder::new(0, SortDirection::Ascending)).unwrap();
        table.set_rows(rows());
        assert!(table.click_header(0).is_err());
    }

    #[test]
    fn test_csv_follows_display_order() {
        let mut table = table();
        table.click_header(0).unwrap();
        assert_eq!(
            table.to_csv(),
            "name,num_revisions\nc.rs,1\nb.rs,3\na.rs,9"
        );
    }

    #[test]
    fn test_reset_sort_restores_input_order() {
        let mut table = table();
        table.click_header(0).unwrap();
        table.reset_sort();
        assert_eq!(names(&table), vec!["b.rs", "a.rs", "c.rs"]);
        assert_eq!(table.sort_order(), SortOrder::new(1, SortDirection::Descending));
    }

    #[test]
    fn test_row_index_maps_display_to_input() {
        let mut table = table();
        table.click_header(0).unwrap();
        assert_eq!(table.row_index(0), Some(2));
    }
}
