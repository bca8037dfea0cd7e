use super::model::{FilteredTable, SeriesRow};

// ---------------------------------------------------------------------------
// Wide → long
// ---------------------------------------------------------------------------

/// Long-form view of a [`FilteredTable`]: one [`SeriesRow`] per
/// (year, role) cell, years ascending, roles in column order.
///
/// Nothing is materialised until iterated, and the view can be iterated
/// any number of times.
#[derive(Debug, Clone, Copy)]
pub struct LongForm<'a> {
    table: &'a FilteredTable,
}

pub fn to_long_form(table: &FilteredTable) -> LongForm<'_> {
    LongForm { table }
}

impl<'a> LongForm<'a> {
    pub fn iter(&self) -> SeriesRows<'a> {
        SeriesRows {
            table: self.table,
            row: 0,
            col: 0,
        }
    }

    /// `years × columns`.
    pub fn len(&self) -> usize {
        self.table.len() * self.table.columns().len()
    }
}

impl<'a> IntoIterator for LongForm<'a> {
    type Item = SeriesRow;
    type IntoIter = SeriesRows<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator behind [`LongForm`].
#[derive(Debug, Clone)]
pub struct SeriesRows<'a> {
    table: &'a FilteredTable,
    row: usize,
    col: usize,
}

impl Iterator for SeriesRows<'_> {
    type Item = SeriesRow;

    fn next(&mut self) -> Option<SeriesRow> {
        let columns = self.table.columns();
        if columns.is_empty() {
            return None;
        }
        let (year, cells) = self.table.rows().get(self.row)?;
        let item = SeriesRow {
            year: *year,
            role: columns[self.col].clone(),
            value: cells[self.col].as_f64(),
        };
        self.col += 1;
        if self.col == columns.len() {
            self.col = 0;
            self.row += 1;
        }
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let width = self.table.columns().len();
        let total = self.table.len() * width;
        let done = self.row * width + self.col;
        let left = total.saturating_sub(done);
        (left, Some(left))
    }
}

impl ExactSizeIterator for SeriesRows<'_> {}
