use std::collections::{BTreeMap, BTreeSet};
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{
    Array, AsArray, Float32Array, Float64Array, Int16Array, Int32Array, Int64Array,
    StringArray,
};
use arrow::datatypes::DataType;
use arrow::util::display::array_value_to_string;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::classify::ROLE_KEYWORD;
use super::error::PipelineError;
use super::model::{Cell, IndexedTable};

/// File loaded at startup when present in the working directory.
pub const DEFAULT_DATA_FILE: &str = "cargos_ano.csv";

/// Header of the year column in e-SAJ exports.
pub const YEAR_COLUMN: &str = "Ano";

// ---------------------------------------------------------------------------
// Options and raw input
// ---------------------------------------------------------------------------

/// How to interpret a source table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderOptions {
    /// Header of the column used as the year index.
    pub year_column: String,
    /// Token identifying role columns (matched case-insensitively).
    pub role_keyword: String,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        LoaderOptions {
            year_column: YEAR_COLUMN.to_string(),
            role_keyword: ROLE_KEYWORD.to_string(),
        }
    }
}

/// Header row plus text records, as any file front-end produces them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub records: Vec<Vec<String>>,
}

// ---------------------------------------------------------------------------
// Core: RawTable → IndexedTable
// ---------------------------------------------------------------------------

/// Build the year-indexed table.
///
/// * rows whose year does not parse as an integer are dropped
/// * duplicate years: the last row wins
/// * short rows are padded with [`Cell::Empty`], extra cells ignored
/// * repeated headers become `name`, `name.1`, `name.2`, …
pub fn load(raw: RawTable, options: &LoaderOptions) -> Result<IndexedTable, PipelineError> {
    if raw.headers.is_empty() && raw.records.is_empty() {
        return Err(PipelineError::DataUnavailable);
    }

    let headers = dedupe_headers(raw.headers);
    let year_idx = headers
        .iter()
        .position(|h| *h == options.year_column)
        .ok_or_else(|| PipelineError::MissingYearColumn {
            column: options.year_column.clone(),
        })?;

    let columns: Vec<String> = headers
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != year_idx)
        .map(|(_, h)| h.clone())
        .collect();

    let mut rows: BTreeMap<i32, Vec<Cell>> = BTreeMap::new();
    let mut dropped = 0usize;
    let mut duplicates = 0usize;

    for record in &raw.records {
        let Some(year) = record.get(year_idx).and_then(|s| parse_year(s)) else {
            dropped += 1;
            continue;
        };
        let cells: Vec<Cell> = (0..headers.len())
            .filter(|i| *i != year_idx)
            .map(|i| record.get(i).map_or(Cell::Empty, |s| Cell::parse(s)))
            .collect();
        if rows.insert(year, cells).is_some() {
            duplicates += 1;
        }
    }

    if dropped > 0 {
        log::warn!("Dropped {dropped} row(s) with an invalid '{}' value", options.year_column);
    }
    if duplicates > 0 {
        log::warn!("{duplicates} duplicate year row(s); keeping the last occurrence");
    }
    if rows.is_empty() {
        return Err(PipelineError::DataUnavailable);
    }

    Ok(IndexedTable::new(options.year_column.clone(), columns, rows))
}

/// Integer text, or a float with no fractional part (`"2020.0"`).
fn parse_year(raw: &str) -> Option<i32> {
    let text = raw.trim();
    if let Ok(year) = text.parse::<i32>() {
        return Some(year);
    }
    let v = text.parse::<f64>().ok()?;
    let in_range = v >= f64::from(i32::MIN) && v <= f64::from(i32::MAX);
    (v.is_finite() && v.fract() == 0.0 && in_range).then_some(v as i32)
}

fn dedupe_headers(headers: Vec<String>) -> Vec<String> {
    let mut taken: BTreeSet<String> = BTreeSet::new();
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    let mut out = Vec::with_capacity(headers.len());

    for header in headers {
        let name = if taken.contains(&header) {
            let n = counts.entry(header.clone()).or_insert(0);
            loop {
                *n += 1;
                let candidate = format!("{header}.{n}");
                if !taken.contains(&candidate) {
                    break candidate;
                }
            }
        } else {
            header
        };
        taken.insert(name.clone());
        out.push(name);
    }
    out
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a yearly table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, one record per year (the e-SAJ export)
/// * `.json`    – `[{ "Ano": 2020, "PROMOTOR A": 12, ... }, ...]`
/// * `.parquet` – one column per header, any scalar types
pub fn load_file(path: &Path, options: &LoaderOptions) -> Result<IndexedTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let raw = match ext.as_str() {
        "csv" => read_csv(std::fs::File::open(path).context("opening CSV")?)?,
        "json" => read_json(&std::fs::read_to_string(path).context("reading JSON file")?)?,
        "parquet" | "pq" => read_parquet(path)?,
        other => bail!("Unsupported file extension: .{other}"),
    };

    load(raw, options).with_context(|| format!("loading {}", path.display()))
}

// ---------------------------------------------------------------------------
// CSV reader
// ---------------------------------------------------------------------------

/// Comma separated, first row is the header. Ragged rows are accepted.
pub fn read_csv<R: Read>(source: R) -> Result<RawTable> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(source);
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut records = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        records.push(record.iter().map(|c| c.to_string()).collect());
    }

    Ok(RawTable { headers, records })
}

// ---------------------------------------------------------------------------
// JSON reader
// ---------------------------------------------------------------------------

/// Records-oriented JSON (`df.to_json(orient='records')`). Headers are the
/// union of keys in first-seen order; absent keys read as empty cells.
pub fn read_json(text: &str) -> Result<RawTable> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;
    let records = root
        .as_array()
        .context("Expected top-level JSON array")?;

    let mut headers: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        for key in obj.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
    }

    let rows = records
        .iter()
        .filter_map(|rec| rec.as_object())
        .map(|obj| {
            headers
                .iter()
                .map(|h| obj.get(h).map(json_to_text).unwrap_or_default())
                .collect()
        })
        .collect();

    Ok(RawTable {
        headers,
        records: rows,
    })
}

fn json_to_text(val: &JsonValue) -> String {
    match val {
        JsonValue::String(s) => s.clone(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Parquet reader
// ---------------------------------------------------------------------------

/// Every column of every record batch becomes a text column; the loader
/// then parses years and cells the same way as for CSV.
pub fn read_parquet(path: &Path) -> Result<RawTable> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let headers: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        for row in 0..batch.num_rows() {
            let record = batch
                .columns()
                .iter()
                .map(|col| cell_text(col, row))
                .collect::<Result<Vec<String>>>()
                .with_context(|| format!("Row {row}"))?;
            records.push(record);
        }
    }

    Ok(RawTable { headers, records })
}

/// Text form of one Arrow value; nulls become empty text.
fn cell_text(col: &Arc<dyn Array>, row: usize) -> Result<String> {
    if col.is_null(row) {
        return Ok(String::new());
    }
    let text = match col.data_type() {
        DataType::Utf8 => match col.as_any().downcast_ref::<StringArray>() {
            Some(s) => s.value(row).to_string(),
            None => array_value_to_string(col.as_ref(), row)?,
        },
        DataType::LargeUtf8 => col.as_string::<i64>().value(row).to_string(),
        DataType::Int16 => match col.as_any().downcast_ref::<Int16Array>() {
            Some(a) => a.value(row).to_string(),
            None => array_value_to_string(col.as_ref(), row)?,
        },
        DataType::Int32 => match col.as_any().downcast_ref::<Int32Array>() {
            Some(a) => a.value(row).to_string(),
            None => array_value_to_string(col.as_ref(), row)?,
        },
        DataType::Int64 => match col.as_any().downcast_ref::<Int64Array>() {
            Some(a) => a.value(row).to_string(),
            None => array_value_to_string(col.as_ref(), row)?,
        },
        DataType::Float32 => match col.as_any().downcast_ref::<Float32Array>() {
            Some(a) => a.value(row).to_string(),
            None => array_value_to_string(col.as_ref(), row)?,
        },
        DataType::Float64 => match col.as_any().downcast_ref::<Float64Array>() {
            Some(a) => a.value(row).to_string(),
            None => array_value_to_string(col.as_ref(), row)?,
        },
        _ => array_value_to_string(col.as_ref(), row)?,
    };
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(headers: &[&str], records: &[&[&str]]) -> RawTable {
        RawTable {
            headers: headers.iter().map(|s| s.to_string()).collect(),
            records: records
                .iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        }
    }

    #[test]
    fn drops_rows_with_invalid_year() {
        let t = load(
            raw(
                &["Ano", "PROMOTOR_A"],
                &[&["2020", "1"], &["abc", "2"], &["", "3"], &["2021.0", "4"], &["2022.5", "5"]],
            ),
            &LoaderOptions::default(),
        )
        .unwrap();
        assert_eq!(t.years(), vec![2020, 2021]);
        assert_eq!(t.get(2021, "PROMOTOR_A"), Some(&Cell::Number(4.0)));
    }

    #[test]
    fn years_are_sorted_and_duplicates_keep_last() {
        let t = load(
            raw(&["Ano", "A"], &[&["2022", "1"], &["2020", "2"], &["2022", "9"]]),
            &LoaderOptions::default(),
        )
        .unwrap();
        assert_eq!(t.years(), vec![2020, 2022]);
        assert_eq!(t.get(2022, "A"), Some(&Cell::Number(9.0)));
    }

    #[test]
    fn year_column_can_be_anywhere() {
        let t = load(
            raw(&["PROMOTOR_A", "Ano", "OBS"], &[&["7", " 2019 ", "x"]]),
            &LoaderOptions::default(),
        )
        .unwrap();
        assert_eq!(t.columns(), &["PROMOTOR_A", "OBS"]);
        assert_eq!(t.row(2019).unwrap(), &[Cell::Number(7.0), Cell::Text("x".into())]);
    }

    #[test]
    fn no_valid_rows_is_data_unavailable() {
        let err = load(raw(&["Ano", "A"], &[&["x", "1"]]), &LoaderOptions::default()).unwrap_err();
        assert_eq!(err, PipelineError::DataUnavailable);

        let err = load(RawTable::default(), &LoaderOptions::default()).unwrap_err();
        assert_eq!(err, PipelineError::DataUnavailable);

        let err = load(raw(&["Ano", "A"], &[]), &LoaderOptions::default()).unwrap_err();
        assert_eq!(err, PipelineError::DataUnavailable);
    }

    #[test]
    fn missing_year_column() {
        let err = load(raw(&["Year", "A"], &[&["2020", "1"]]), &LoaderOptions::default())
            .unwrap_err();
        assert_eq!(
            err,
            PipelineError::MissingYearColumn {
                column: "Ano".into()
            }
        );
    }

    #[test]
    fn ragged_rows_are_padded() {
        let t = load(
            raw(&["Ano", "A", "B"], &[&["2020", "1"], &["2021", "2", "3", "extra"]]),
            &LoaderOptions::default(),
        )
        .unwrap();
        assert_eq!(t.get(2020, "B"), Some(&Cell::Empty));
        assert_eq!(t.get(2021, "B"), Some(&Cell::Number(3.0)));
    }

    #[test]
    fn repeated_headers_get_suffixes() {
        let headers = vec!["A".into(), "A".into(), "A.1".into(), "A".into()];
        assert_eq!(dedupe_headers(headers), vec!["A", "A.1", "A.1.1", "A.2"]);
    }

    #[test]
    fn read_csv_flexible() {
        let text = "Ano,PROMOTOR A,PROMOTOR B\n2020,1,4\n2021,2\n";
        let raw = read_csv(text.as_bytes()).unwrap();
        assert_eq!(raw.headers, vec!["Ano", "PROMOTOR A", "PROMOTOR B"]);
        assert_eq!(raw.records[1], vec!["2021", "2"]);
    }

    #[test]
    fn read_json_keeps_key_order() {
        let text = r#"[{"Ano": 2020, "Z PROMOTOR": 1, "A PROMOTOR": 2},
                       {"Ano": 2021, "A PROMOTOR": null, "OBS": "x"}]"#;
        let raw = read_json(text).unwrap();
        assert_eq!(raw.headers, vec!["Ano", "Z PROMOTOR", "A PROMOTOR", "OBS"]);
        assert_eq!(raw.records[1], vec!["2021", "", "", "x"]);
    }

    #[test]
    fn read_json_rejects_non_array() {
        assert!(read_json(r#"{"Ano": 2020}"#).is_err());
    }

    #[test]
    fn load_file_csv_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cargos_ano.csv");
        std::fs::write(&path, "Ano,PROMOTOR_A,OTHER\n2020,1,9\n2021,2,9\n").unwrap();

        let t = load_file(&path, &LoaderOptions::default()).unwrap();
        assert_eq!(t.len(), 2);
        assert_eq!(t.columns(), &["PROMOTOR_A", "OTHER"]);
    }

    #[test]
    fn load_file_rejects_unknown_extension() {
        let err = load_file(Path::new("dados.xlsx"), &LoaderOptions::default()).unwrap_err();
        assert!(err.to_string().contains(".xlsx"));
    }

    #[test]
    fn load_file_parquet_from_disk() {
        use arrow::datatypes::{Field, Schema};
        use arrow::record_batch::RecordBatch;
        use parquet::arrow::ArrowWriter;

        let schema = Arc::new(Schema::new(vec![
            Field::new("Ano", DataType::Int64, true),
            Field::new("PROMOTOR_A", DataType::Float64, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(Int64Array::from(vec![Some(2020), None, Some(2021)])),
                Arc::new(Float64Array::from(vec![Some(1.0), Some(5.0), None])),
            ],
        )
        .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cargos_ano.parquet");
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let t = load_file(&path, &LoaderOptions::default()).unwrap();
        assert_eq!(t.years(), vec![2020, 2021]);
        assert_eq!(t.get(2020, "PROMOTOR_A"), Some(&Cell::Number(1.0)));
        assert_eq!(t.get(2021, "PROMOTOR_A"), Some(&Cell::Empty));
    }
}
