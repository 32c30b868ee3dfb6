use std::io::Cursor;
use std::path::Path;

use anyhow::{Context, Result, bail};
use calamine::{Data, Reader, Xlsx, open_workbook_from_rs};
use polars::prelude::*;

use super::model::{CellValue, Dataset, series_from_cells};
use super::sample;
use crate::config::CATEGORICAL_MAX_UNIQUE;
use crate::error::ExploreError;

/// Text cells read as missing.
const NA_VALUES: [&str; 19] = [
    "", "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "NULL", "null", "None", "<NA>",
    "#N/A", "#NA", "#N/A N/A", "1.#IND", "1.#QNAN", "-1.#IND", "-1.#QNAN",
];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Where the next dataset comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    /// An uploaded file, already read into memory.
    Upload { file_name: String, bytes: Vec<u8> },
    /// One of the bundled samples, by name.
    Sample(String),
}

/// Acquire a dataset. `None` (nothing chosen yet) is not an error and
/// yields `Ok(None)`.
pub fn acquire(source: Option<&DataSource>) -> Result<Option<Dataset>, ExploreError> {
    match source {
        None => Ok(None),
        Some(DataSource::Upload { file_name, bytes }) => load_upload(file_name, bytes).map(Some),
        Some(DataSource::Sample(name)) => sample::load_sample(name).map(Some),
    }
}

/// Parse uploaded bytes.  Dispatch by the extension of the declared name.
///
/// Supported formats:
/// * `.csv`  – comma-separated text with a header row
/// * `.xlsx` – first worksheet, first row is the header
pub fn load_upload(file_name: &str, bytes: &[u8]) -> Result<Dataset, ExploreError> {
    let ext = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let parsed = match ext.as_str() {
        "csv" => parse_csv(bytes),
        "xlsx" => parse_xlsx(bytes),
        _ => {
            return Err(ExploreError::UnsupportedFormat {
                file_name: file_name.to_string(),
            })
        }
    };
    parsed.map_err(|e| ExploreError::parse(file_name, &e))
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one record per row. A record
/// may not have more fields than the header.
///
/// Column types come from polars' schema inference over every row; a column
/// whose fields disagree on a type is kept as its raw text.
pub fn parse_csv(bytes: &[u8]) -> Result<Dataset> {
    let text = std::str::from_utf8(bytes).context("file is not valid UTF-8")?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let headers: Vec<String> = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(text.as_bytes())
        .headers()
        .context("reading CSV header")?
        .iter()
        .map(|h| h.to_string())
        .collect();
    if headers.is_empty() {
        bail!("no columns to parse from file");
    }

    let mut frame = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .map_parse_options(|options| options.with_null_values(Some(na_values())))
        .into_reader_with_file_handle(Cursor::new(text.as_bytes()))
        .finish()
        .context("parsing CSV records")?;
    frame
        .set_column_names(unique_column_names(headers))
        .context("naming CSV columns")?;

    Dataset::from_frame(frame, CATEGORICAL_MAX_UNIQUE).context("resolving column types")
}

fn na_values() -> NullValues {
    NullValues::AllColumns(
        NA_VALUES
            .iter()
            .filter(|v| !v.is_empty())
            .map(|v| PlSmallStr::from(*v))
            .collect(),
    )
}

// ---------------------------------------------------------------------------
// XLSX loader
// ---------------------------------------------------------------------------

/// Read the first worksheet of an Excel workbook.
pub fn parse_xlsx(bytes: &[u8]) -> Result<Dataset> {
    let mut workbook: Xlsx<_> =
        open_workbook_from_rs(Cursor::new(bytes)).context("opening workbook")?;
    let range = workbook
        .worksheet_range_at(0)
        .context("workbook has no worksheets")?
        .context("reading first worksheet")?;

    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        bail!("no columns to parse from file");
    };
    let headers: Vec<String> = header.iter().map(|cell| cell.to_string()).collect();

    let mut cells: Vec<Vec<CellValue>> = vec![Vec::new(); headers.len()];
    for row in rows {
        for (i, col_cells) in cells.iter_mut().enumerate() {
            col_cells.push(row.get(i).map(excel_cell).unwrap_or(CellValue::Null));
        }
    }

    build_dataset(headers, cells)
}

fn excel_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Int(i) => CellValue::Integer(*i),
        Data::Float(f) if f.is_nan() => CellValue::Null,
        // Excel stores whole numbers as floats.
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 9.0e15 => CellValue::Integer(*f as i64),
        Data::Float(f) => CellValue::Float(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::String(s) if NA_VALUES.contains(&s.as_str()) => CellValue::Null,
        Data::String(s) => CellValue::String(s.clone()),
        Data::DateTime(_) | Data::DateTimeIso(_) | Data::DurationIso(_) => {
            CellValue::String(cell.to_string())
        }
        Data::Error(_) | Data::Empty => CellValue::Null,
    }
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

fn build_dataset(headers: Vec<String>, cells: Vec<Vec<CellValue>>) -> Result<Dataset> {
    let columns = unique_column_names(headers)
        .iter()
        .zip(&cells)
        .map(|(name, values)| series_from_cells(name, values).into_column())
        .collect();
    let frame = DataFrame::new(columns).context("assembling worksheet columns")?;
    Dataset::from_frame(frame, CATEGORICAL_MAX_UNIQUE).context("resolving column types")
}

/// Blank headers become `Unnamed: {index}`; repeated headers get `.1`,
/// `.2`, … suffixes.
fn unique_column_names(headers: Vec<String>) -> Vec<String> {
    let mut taken = std::collections::HashSet::new();
    let mut names = Vec::with_capacity(headers.len());
    for (i, header) in headers.into_iter().enumerate() {
        let base = if header.trim().is_empty() {
            format!("Unnamed: {i}")
        } else {
            header
        };
        let mut name = base.clone();
        let mut suffix = 1;
        while taken.contains(&name) {
            name = format!("{base}.{suffix}");
            suffix += 1;
        }
        taken.insert(name.clone());
        names.push(name);
    }
    names
}
