use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use super::model::FilteredTable;
use super::pipeline::PipelineOutput;

pub const SERIES_FILE: &str = "serie.csv";
pub const TOTALS_FILE: &str = "totais.csv";
pub const RAW_FILE: &str = "dados_filtrados.csv";

const SERIES_HEADER: [&str; 3] = ["Ano", "Cargo", "Valor"];
const TOTALS_HEADER: [&str; 2] = ["Cargo", "Total"];

/// Write the three views of `output` as CSV files into `dir`.
/// Every file gets its header, even when the view has no rows.
/// Returns the paths written.
pub fn write_views(dir: &Path, output: &PipelineOutput) -> Result<Vec<PathBuf>> {
    let series_path = dir.join(SERIES_FILE);
    write_rows(&series_path, &SERIES_HEADER, &output.series)?;

    let totals_path = dir.join(TOTALS_FILE);
    write_rows(&totals_path, &TOTALS_HEADER, &output.totals)?;

    let raw_path = dir.join(RAW_FILE);
    write_table(&raw_path, &output.raw)?;

    Ok(vec![series_path, totals_path, raw_path])
}

/// `serialize` only emits a header alongside the first row, so the header
/// is written by hand and the serde one is switched off.
fn write_rows<T: Serialize>(path: &Path, header: &[&str], rows: &[T]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(header).context("writing header")?;
    for row in rows {
        writer.serialize(row).context("writing row")?;
    }
    writer.flush().with_context(|| format!("flushing {}", path.display()))?;
    Ok(())
}

fn write_table(path: &Path, table: &FilteredTable) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;

    let mut header = vec![table.year_column().to_string()];
    header.extend(table.columns().iter().cloned());
    writer.write_record(&header).context("writing header")?;

    for (year, cells) in table.rows() {
        let mut record = vec![year.to_string()];
        record.extend(cells.iter().map(|c| c.to_string()));
        writer.write_record(&record).with_context(|| format!("writing year {year}"))?;
    }
    writer.flush().context("flushing table file")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::{LoaderOptions, read_csv, load};
    use crate::data::model::FilterSelection;
    use crate::data::pipeline::run;

    #[test]
    fn writes_all_three_views() {
        let raw = read_csv("Ano,PROMOTOR_A,PROMOTOR_B\n2021,2,5\n2022,3,6\n".as_bytes()).unwrap();
        let table = load(raw, &LoaderOptions::default()).unwrap();
        let sel = FilterSelection::new(2021, 2022, vec!["PROMOTOR_A".into(), "PROMOTOR_B".into()]);
        let output = run(&table, &sel).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let written = write_views(dir.path(), &output).unwrap();
        assert_eq!(written.len(), 3);

        let series = std::fs::read_to_string(dir.path().join(SERIES_FILE)).unwrap();
        assert_eq!(
            series,
            "Ano,Cargo,Valor\n2021,PROMOTOR_A,2.0\n2021,PROMOTOR_B,5.0\n2022,PROMOTOR_A,3.0\n2022,PROMOTOR_B,6.0\n"
        );

        let totals = std::fs::read_to_string(dir.path().join(TOTALS_FILE)).unwrap();
        assert_eq!(totals, "Cargo,Total\nPROMOTOR_B,11.0\nPROMOTOR_A,5.0\n");

        let raw = std::fs::read_to_string(dir.path().join(RAW_FILE)).unwrap();
        assert_eq!(raw, "Ano,PROMOTOR_A,PROMOTOR_B\n2021,2,5\n2022,3,6\n");
    }

    #[test]
    fn empty_views_still_have_headers() {
        let raw = read_csv("Ano,PROMOTOR_A\n2021,2\n".as_bytes()).unwrap();
        let table = load(raw, &LoaderOptions::default()).unwrap();
        let sel = FilterSelection::new(1990, 1991, vec!["PROMOTOR_A".into()]);
        let mut output = run(&table, &sel).unwrap();
        output.totals.clear();

        let dir = tempfile::tempdir().unwrap();
        write_views(dir.path(), &output).unwrap();

        let series = std::fs::read_to_string(dir.path().join(SERIES_FILE)).unwrap();
        assert_eq!(series, "Ano,Cargo,Valor\n");
        let totals = std::fs::read_to_string(dir.path().join(TOTALS_FILE)).unwrap();
        assert_eq!(totals, "Cargo,Total\n");
        let raw = std::fs::read_to_string(dir.path().join(RAW_FILE)).unwrap();
        assert_eq!(raw, "Ano,PROMOTOR_A\n");
    }
}
