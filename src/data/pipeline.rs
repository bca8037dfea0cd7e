use super::aggregate::totals;
use super::error::PipelineError;
use super::filter;
use super::model::{FilterSelection, FilteredTable, IndexedTable, SeriesRow, TotalRow};
use super::reshape::to_long_form;

/// The three views drawn for one filter selection.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    /// Long form, for the per-role line chart.
    pub series: Vec<SeriesRow>,
    /// Ranked totals, for the bar chart.
    pub totals: Vec<TotalRow>,
    /// The filtered slice itself, for the table.
    pub raw: FilteredTable,
}

/// Filter, then reshape and aggregate. Selection errors surface before any
/// reshaping happens, and no partial output is ever returned.
pub fn run(table: &IndexedTable, selection: &FilterSelection) -> Result<PipelineOutput, PipelineError> {
    log::debug!(
        "Running pipeline for {}-{} with {} role(s)",
        selection.year_start,
        selection.year_end,
        selection.roles.len()
    );

    let raw = filter::apply(table, selection)?;
    let totals = totals(&raw)?;
    let long = to_long_form(&raw);
    let mut series = Vec::with_capacity(long.len());
    series.extend(long);

    Ok(PipelineOutput {
        series,
        totals,
        raw,
    })
}
