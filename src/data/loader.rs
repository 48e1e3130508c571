use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{Array, Date32Array};
use arrow::datatypes::DataType;
use arrow::error::ArrowError;
use arrow::util::display::array_value_to_string;
use chrono::NaiveDate;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::errors::ParquetError;
use thiserror::Error;

use super::model::{Record, SalesTable};

/// Canonical field names, in the fixed positional order of the source file.
pub const COLUMNS: [&str; 17] = [
    "invoice_id",
    "branch",
    "city",
    "customer_type",
    "gender",
    "product_line",
    "unit_price",
    "quantity",
    "tax",
    "total",
    "date",
    "time",
    "payment",
    "cogs",
    "gross_margin",
    "gross_income",
    "rating",
];

/// `month/day/year`, with or without zero padding.
pub const DATE_FORMAT: &str = "%m/%d/%Y";

const DATE_COLUMN: usize = 10;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Every failure here aborts the load; no partial table is ever returned.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("reading data file: {0}")]
    Io(#[from] std::io::Error),
    #[error("parsing CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("reading parquet: {0}")]
    Parquet(#[from] ParquetError),
    #[error("decoding parquet batch: {0}")]
    Arrow(#[from] ArrowError),
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),
    #[error("row {row}: expected 17 columns, found {found}")]
    ColumnCount { row: u64, found: usize },
    #[error("row {row}: date '{value}' does not match month/day/year")]
    InvalidDate { row: u64, value: String },
    #[error("row {row}: column '{column}' has invalid value '{value}'")]
    InvalidField {
        row: u64,
        column: &'static str,
        value: String,
    },
    #[error("data file contains no rows")]
    Empty,
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Delimited-text layout options.
#[derive(Debug, Clone, Copy)]
pub struct CsvLayout {
    /// Skip the first row. Its names are never used.
    pub has_headers: bool,
    pub delimiter: u8,
}

impl Default for CsvLayout {
    fn default() -> Self {
        Self {
            has_headers: true,
            delimiter: b',',
        }
    }
}

/// Load a sales table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – 17 positional columns, optional header row
/// * `.parquet` – same 17 columns by position; the date may be text or `Date32`
pub fn load_file(path: &Path) -> Result<SalesTable, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "csv" => load_csv(path, CsvLayout::default())?,
        "parquet" | "pq" => load_parquet(path)?,
        other => return Err(LoadError::UnsupportedExtension(other.to_string())),
    };
    log::info!("Loaded {} records from {}", table.len(), path.display());
    Ok(table)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

pub fn load_csv(path: &Path, layout: CsvLayout) -> Result<SalesTable, LoadError> {
    let file = std::fs::File::open(path)?;
    load_csv_reader(file, layout)
}

/// Parse delimited text, mapping columns by position.
pub fn load_csv_reader<R: Read>(reader: R, layout: CsvLayout) -> Result<SalesTable, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(layout.has_headers)
        .delimiter(layout.delimiter)
        .flexible(true)
        .from_reader(reader);

    if layout.has_headers {
        let found = reader.headers()?.len();
        if found == 0 {
            return Err(LoadError::Empty);
        }
        if found != COLUMNS.len() {
            return Err(LoadError::ColumnCount { row: 1, found });
        }
    }

    let mut records = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let row = result?;
        let line = row
            .position()
            .map(|p| p.line())
            .unwrap_or(idx as u64 + 1);
        let cells: Vec<&str> = row.iter().collect();
        records.push(record_from_cells(&cells, line)?);
    }

    finish(records)
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with the 17 sales columns in positional order.
///
/// Column names in the schema are ignored. Cells are rendered to text and go
/// through the same conversion as CSV cells, except `Date32` dates which are
/// taken as-is.
pub fn load_parquet(path: &Path) -> Result<SalesTable, LoadError> {
    let file = std::fs::File::open(path)?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;

    let mut records = Vec::new();
    let mut row_no: u64 = 0;

    for batch_result in reader {
        let batch = batch_result?;
        let found = batch.num_columns();
        if found != COLUMNS.len() {
            return Err(LoadError::ColumnCount {
                row: row_no + 1,
                found,
            });
        }

        for row in 0..batch.num_rows() {
            row_no += 1;
            let cells = batch
                .columns()
                .iter()
                .enumerate()
                .map(|(col_idx, col)| parquet_cell(col, col_idx, row))
                .collect::<Result<Vec<String>, ArrowError>>()?;
            let cells: Vec<&str> = cells.iter().map(String::as_str).collect();
            records.push(record_from_cells(&cells, row_no)?);
        }
    }

    finish(records)
}

fn parquet_cell(col: &Arc<dyn Array>, col_idx: usize, row: usize) -> Result<String, ArrowError> {
    if col.is_null(row) {
        return Ok(String::new());
    }
    if col_idx == DATE_COLUMN && col.data_type() == &DataType::Date32 {
        let date = col
            .as_any()
            .downcast_ref::<Date32Array>()
            .and_then(|a| a.value_as_date(row));
        if let Some(date) = date {
            return Ok(date.format(DATE_FORMAT).to_string());
        }
    }
    array_value_to_string(col, row)
}

// -- Shared row conversion --

fn finish(records: Vec<Record>) -> Result<SalesTable, LoadError> {
    let table = SalesTable::new(records);
    if table.is_empty() {
        return Err(LoadError::Empty);
    }
    Ok(table)
}

/// Only the date and the columns the indicators read (`total`, `rating`) are
/// parsed; everything else is kept as text.
fn record_from_cells(cells: &[&str], row: u64) -> Result<Record, LoadError> {
    if cells.len() != COLUMNS.len() {
        return Err(LoadError::ColumnCount {
            row,
            found: cells.len(),
        });
    }

    let text = |idx: usize| cells[idx].to_string();
    let number = |idx: usize| -> Result<f64, LoadError> {
        cells[idx]
            .trim()
            .parse::<f64>()
            .map_err(|_| invalid(row, idx, cells[idx]))
    };

    Ok(Record {
        invoice_id: text(0),
        branch: text(1),
        city: text(2),
        customer_type: text(3),
        gender: text(4),
        product_line: text(5),
        unit_price: text(6),
        quantity: text(7),
        tax: text(8),
        total: number(9)?,
        date: parse_date(cells[DATE_COLUMN], row)?,
        time: text(11),
        payment: text(12),
        cogs: text(13),
        gross_margin: text(14),
        gross_income: text(15),
        rating: number(16)?,
    })
}

fn invalid(row: u64, idx: usize, value: &str) -> LoadError {
    LoadError::InvalidField {
        row,
        column: COLUMNS[idx],
        value: value.to_string(),
    }
}

fn parse_date(s: &str, row: u64) -> Result<NaiveDate, LoadError> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).map_err(|_| LoadError::InvalidDate {
        row,
        value: s.to_string(),
    })
}
