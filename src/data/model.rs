use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Cell – a single value in a non-year column
// ---------------------------------------------------------------------------

/// One cell of the source table. Role columns are expected to hold numbers,
/// but other columns travel with the table untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Number(f64),
    Text(String),
    Empty,
}

impl Cell {
    /// Classify a raw text cell.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Cell::Empty;
        }
        match trimmed.parse::<f64>() {
            Ok(v) if v.is_finite() => Cell::Number(v),
            _ => Cell::Text(raw.to_string()),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Number(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Number(v) => write!(f, "{v}"),
            Cell::Text(s) => write!(f, "{s}"),
            Cell::Empty => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// IndexedTable – the loaded table, keyed by year
// ---------------------------------------------------------------------------

/// The canonical in-memory table: unique years in ascending order, each
/// mapped to one cell per column. Immutable once built by the loader.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedTable {
    year_column: String,
    columns: Vec<String>,
    rows: BTreeMap<i32, Vec<Cell>>,
}

impl IndexedTable {
    /// Every row vector must have exactly `columns.len()` cells.
    pub(super) fn new(
        year_column: String,
        columns: Vec<String>,
        rows: BTreeMap<i32, Vec<Cell>>,
    ) -> Self {
        debug_assert!(rows.values().all(|r| r.len() == columns.len()));
        IndexedTable {
            year_column,
            columns,
            rows,
        }
    }

    /// Header of the year column (the index), e.g. `Ano`.
    pub fn year_column(&self) -> &str {
        &self.year_column
    }

    /// Non-year column headers in source order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Years present in the table, ascending.
    pub fn years(&self) -> Vec<i32> {
        self.rows.keys().copied().collect()
    }

    /// Rows with `start <= year <= end`, ascending. Empty when `start > end`.
    pub fn rows_in_range(&self, start: i32, end: i32) -> impl Iterator<Item = (i32, &[Cell])> {
        // BTreeMap::range panics on an inverted range.
        let range = (start <= end).then(|| self.rows.range(start..=end));
        range
            .into_iter()
            .flatten()
            .map(|(year, cells)| (*year, cells.as_slice()))
    }

    /// Number of years.
    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

#[cfg(test)]
impl IndexedTable {
    pub fn row(&self, year: i32) -> Option<&[Cell]> {
        self.rows.get(&year).map(Vec::as_slice)
    }

    pub fn get(&self, year: i32, column: &str) -> Option<&Cell> {
        let idx = self.column_index(column)?;
        self.rows.get(&year).and_then(|r| r.get(idx))
    }
}

// ---------------------------------------------------------------------------
// RoleColumnSet – columns that are selectable role series
// ---------------------------------------------------------------------------

/// Role column names in header order, original casing preserved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleColumnSet(Vec<String>);

impl RoleColumnSet {
    pub(super) fn new(columns: Vec<String>) -> Self {
        RoleColumnSet(columns)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// ---------------------------------------------------------------------------
// FilterSelection – what the user picked
// ---------------------------------------------------------------------------

/// User input: an inclusive year interval and the roles to show, in the
/// order they should appear. Validated by the range filter, not here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSelection {
    pub year_start: i32,
    pub year_end: i32,
    pub roles: Vec<String>,
}

impl FilterSelection {
    pub fn new(year_start: i32, year_end: i32, roles: Vec<String>) -> Self {
        FilterSelection {
            year_start,
            year_end,
            roles,
        }
    }

    /// The default selection: every year of the table and every role.
    /// `None` when the table has no years.
    pub fn everything(table: &IndexedTable, roles: &RoleColumnSet) -> Option<Self> {
        let years = table.years();
        let (first, last) = (*years.first()?, *years.last()?);
        Some(FilterSelection::new(first, last, roles.as_slice().to_vec()))
    }
}

// ---------------------------------------------------------------------------
// FilteredTable – the slice the charts are drawn from
// ---------------------------------------------------------------------------

/// An [`IndexedTable`] restricted to a year range and a list of columns.
/// Years ascending, columns in requested order.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredTable {
    year_column: String,
    columns: Vec<String>,
    rows: Vec<(i32, Vec<Cell>)>,
}

impl FilteredTable {
    pub(super) fn new(year_column: String, columns: Vec<String>, rows: Vec<(i32, Vec<Cell>)>) -> Self {
        debug_assert!(rows.windows(2).all(|w| w[0].0 < w[1].0));
        FilteredTable {
            year_column,
            columns,
            rows,
        }
    }

    pub fn year_column(&self) -> &str {
        &self.year_column
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[(i32, Vec<Cell>)] {
        &self.rows
    }

    /// Number of years.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
impl FilteredTable {
    pub fn years(&self) -> Vec<i32> {
        self.rows.iter().map(|(y, _)| *y).collect()
    }

    pub fn get(&self, year: i32, column: &str) -> Option<&Cell> {
        let idx = self.columns.iter().position(|c| c == column)?;
        let pos = self.rows.binary_search_by_key(&year, |(y, _)| *y).ok()?;
        self.rows[pos].1.get(idx)
    }
}

// ---------------------------------------------------------------------------
// Derived views
// ---------------------------------------------------------------------------

/// One observation of the long form: a (year, role) cell.
/// `value` is `None` when the cell is not a number.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesRow {
    #[serde(rename = "Ano")]
    pub year: i32,
    #[serde(rename = "Cargo")]
    pub role: String,
    #[serde(rename = "Valor")]
    pub value: Option<f64>,
}

/// Sum of one role over the selected years.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TotalRow {
    #[serde(rename = "Cargo")]
    pub role: String,
    #[serde(rename = "Total")]
    pub total: f64,
}
