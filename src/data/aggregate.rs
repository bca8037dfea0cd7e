use super::error::PipelineError;
use super::model::{Cell, FilteredTable, TotalRow};

/// Sum each column of `table` over its years and rank the totals, largest
/// first. Equal totals keep column order.
///
/// Blank cells count as zero. Text that is not a number fails the whole
/// computation with [`PipelineError::MalformedValue`]. An empty year range
/// sums to zero.
pub fn totals(table: &FilteredTable) -> Result<Vec<TotalRow>, PipelineError> {
    let mut sums = vec![0.0_f64; table.columns().len()];

    for (year, cells) in table.rows() {
        for ((sum, cell), column) in sums.iter_mut().zip(cells).zip(table.columns()) {
            match cell {
                Cell::Number(v) => *sum += v,
                Cell::Empty => {}
                Cell::Text(raw) => {
                    return Err(PipelineError::MalformedValue {
                        year: *year,
                        column: column.clone(),
                        raw: raw.clone(),
                    });
                }
            }
        }
    }

    let mut ranked: Vec<TotalRow> = table
        .columns()
        .iter()
        .zip(sums)
        .map(|(role, total)| TotalRow {
            role: role.clone(),
            total,
        })
        .collect();
    // sort_by is stable
    ranked.sort_by(|a, b| b.total.total_cmp(&a.total));
    Ok(ranked)
}
