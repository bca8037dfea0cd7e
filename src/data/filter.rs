use super::error::PipelineError;
use super::model::{FilterSelection, FilteredTable, IndexedTable};

// ---------------------------------------------------------------------------
// Range filter: year interval × role columns
// ---------------------------------------------------------------------------

/// Restrict `table` to the years in `[year_start, year_end]` and to the
/// requested columns.
///
/// * `year_start > year_end` → [`PipelineError::InvalidRange`], checked first
/// * requested names that are not columns of the table are skipped
/// * nothing left after that (or nothing requested) → [`PipelineError::InvalidColumns`]
/// * years outside the table simply contribute no rows
///
/// Output keeps ascending year order and the requested column order;
/// repeated names are kept once.
pub fn filter_range(
    table: &IndexedTable,
    year_start: i32,
    year_end: i32,
    roles: &[String],
) -> Result<FilteredTable, PipelineError> {
    if year_start > year_end {
        return Err(PipelineError::InvalidRange {
            start: year_start,
            end: year_end,
        });
    }

    let mut picked: Vec<(usize, String)> = Vec::with_capacity(roles.len());
    for role in roles {
        if picked.iter().any(|(_, name)| name == role) {
            continue;
        }
        match table.column_index(role) {
            Some(idx) => picked.push((idx, role.clone())),
            None => log::debug!("Ignoring unknown column '{role}' in selection"),
        }
    }

    if picked.is_empty() {
        return Err(PipelineError::InvalidColumns {
            requested: roles.to_vec(),
        });
    }

    let rows = table
        .rows_in_range(year_start, year_end)
        .map(|(year, cells)| {
            let selected = picked.iter().map(|(idx, _)| cells[*idx].clone()).collect();
            (year, selected)
        })
        .collect();

    let columns = picked.into_iter().map(|(_, name)| name).collect();
    Ok(FilteredTable::new(table.year_column().to_string(), columns, rows))
}

/// [`filter_range`] driven by a [`FilterSelection`].
pub fn apply(table: &IndexedTable, selection: &FilterSelection) -> Result<FilteredTable, PipelineError> {
    filter_range(table, selection.year_start, selection.year_end, &selection.roles)
}
