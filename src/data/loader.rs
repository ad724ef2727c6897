//! Spreadsheet Data Loader Module
//! Downloads the trip spreadsheet and builds a typed table using calamine and Polars.

use crate::data::{calendar, schema};
use calamine::{open_workbook_auto_from_rs, Data, DataType as _, Range, Reader};
use chrono::{NaiveDate, NaiveDateTime, Timelike};
use polars::prelude::*;
use std::collections::HashMap;
use std::io::Cursor;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to fetch spreadsheet: {0}")]
    Fetch(#[from] reqwest::Error),
    #[error("Spreadsheet request failed with HTTP status {0}")]
    HttpStatus(u16),
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid spreadsheet: {0}")]
    Spreadsheet(String),
    #[error("Spreadsheet has no worksheet")]
    EmptyWorkbook,
    #[error("Required column '{0}' not found")]
    MissingColumn(String),
    #[error("Column '{0}' must be numeric")]
    NonNumericColumn(String),
    #[error("Unparseable date '{value}' at spreadsheet row {row}")]
    DateParse { row: usize, value: String },
    #[error("Failed to build table: {0}")]
    Polars(#[from] PolarsError),
}

/// Where the spreadsheet bytes come from.
pub trait TableSource: Send + Sync {
    fn fetch(&self) -> Result<Vec<u8>, LoaderError>;

    /// Human readable origin, used in logs and the info banner.
    fn describe(&self) -> String;
}

/// Downloads the spreadsheet with a blocking HTTP GET.
pub struct HttpSource {
    url: String,
    client: reqwest::blocking::Client,
}

impl HttpSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, LoaderError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self {
            url: url.into(),
            client,
        })
    }
}

impl TableSource for HttpSource {
    fn fetch(&self) -> Result<Vec<u8>, LoaderError> {
        debug!(url = %self.url, "Requesting spreadsheet");
        let response = self.client.get(&self.url).send()?;

        let status = response.status();
        if !status.is_success() {
            warn!(url = %self.url, status = status.as_u16(), "Spreadsheet request rejected");
            return Err(LoaderError::HttpStatus(status.as_u16()));
        }

        Ok(response.bytes()?.to_vec())
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Reads the spreadsheet from a local file.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TableSource for FileSource {
    fn fetch(&self) -> Result<Vec<u8>, LoaderError> {
        std::fs::read(&self.path).map_err(|source| LoaderError::Io {
            path: self.path.clone(),
            source,
        })
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Fetches and parses the trip spreadsheet.
pub struct DataLoader {
    source: Box<dyn TableSource>,
}

impl DataLoader {
    pub fn new(source: Box<dyn TableSource>) -> Self {
        Self { source }
    }

    pub fn source_description(&self) -> String {
        self.source.describe()
    }

    /// Fetch the bytes and build the full trip table.
    pub fn load(&self) -> Result<DataFrame, LoaderError> {
        let bytes = self.source.fetch()?;
        info!(
            source = %self.source.describe(),
            bytes = bytes.len(),
            "Spreadsheet downloaded"
        );

        let df = parse_spreadsheet(&bytes)?;
        info!(rows = df.height(), columns = df.width(), "Trip table loaded");
        Ok(df)
    }
}

/// Parse the first worksheet of an `.xlsx`-compatible byte stream.
pub fn parse_spreadsheet(bytes: &[u8]) -> Result<DataFrame, LoaderError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| LoaderError::Spreadsheet(e.to_string()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or(LoaderError::EmptyWorkbook)?
        .map_err(|e| LoaderError::Spreadsheet(e.to_string()))?;

    build_table(&range)
}

/// Build the typed trip table from a worksheet range. The first row is the header.
pub fn build_table(range: &Range<Data>) -> Result<DataFrame, LoaderError> {
    let first_row = range.start().map(|(row, _)| row as usize).unwrap_or(0);
    let mut rows = range.rows().enumerate();

    let headers = rows
        .next()
        .map(|(_, header)| normalize_headers(header))
        .unwrap_or_default();
    debug!(?headers, "Spreadsheet headers");

    for required in schema::required_columns() {
        if !headers.iter().any(|h| h == required) {
            return Err(LoaderError::MissingColumn(required.to_string()));
        }
    }

    // (1-based spreadsheet row number, cells), blank rows dropped
    let body: Vec<(usize, &[Data])> = rows
        .filter(|(_, cells)| cells.iter().any(|c| !matches!(c, Data::Empty)))
        .map(|(idx, cells)| (first_row + idx + 1, cells))
        .collect();

    let mut columns: Vec<Column> = Vec::with_capacity(headers.len() + 2);
    let mut dates: Vec<Option<NaiveDate>> = Vec::new();

    for (idx, header) in headers.iter().enumerate() {
        if header == schema::MONTH || header == schema::WEEK {
            debug!(column = %header, "Replacing spreadsheet column with derived one");
            continue;
        }

        let cells: Vec<(usize, &Data)> = body
            .iter()
            .map(|(row, cells)| (*row, cells.get(idx).unwrap_or(&Data::Empty)))
            .collect();

        if header == schema::DATE {
            dates = parse_date_cells(&cells)?;
            let days: Vec<Option<i32>> = dates
                .iter()
                .map(|d| d.map(calendar::to_epoch_days))
                .collect();
            columns.push(Column::new(header.as_str().into(), days).cast(&DataType::Date)?);
        } else {
            let column = infer_column(header, &cells);
            let numeric = matches!(column.dtype(), DataType::Int64 | DataType::Float64);
            if schema::KPI_COLUMNS.contains(&header.as_str()) && !numeric {
                return Err(LoaderError::NonNumericColumn(header.clone()));
            }
            columns.push(column);
        }
    }

    let months: Vec<Option<String>> = dates.iter().map(|d| d.map(calendar::month_label)).collect();
    let weeks: Vec<Option<String>> = dates.iter().map(|d| d.map(calendar::week_label)).collect();
    columns.push(Column::new(schema::MONTH.into(), months));
    columns.push(Column::new(schema::WEEK.into(), weeks));

    Ok(DataFrame::new(columns)?)
}

/// Header names as a spreadsheet reader would expose them: blanks become
/// `Unnamed: <index>` and repeats get a `.1`, `.2`, ... suffix.
pub fn normalize_headers(cells: &[Data]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();

    cells
        .iter()
        .enumerate()
        .map(|(idx, cell)| {
            let base = cell_text(cell)
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| format!("Unnamed: {}", idx));
            let count = seen.entry(base.clone()).or_insert(0);
            let name = if *count == 0 {
                base
            } else {
                format!("{}.{}", base, count)
            };
            *count += 1;
            name
        })
        .collect()
}

fn parse_date_cells(cells: &[(usize, &Data)]) -> Result<Vec<Option<NaiveDate>>, LoaderError> {
    cells
        .iter()
        .map(|(row, cell)| match cell {
            Data::Empty => Ok(None),
            Data::String(s) if s.trim().is_empty() => Ok(None),
            other => parse_date_cell(other)
                .map(Some)
                .ok_or_else(|| LoaderError::DateParse {
                    row: *row,
                    value: cell_text(other).unwrap_or_else(|| format!("{:?}", other)),
                }),
        })
        .collect()
}

/// Accepts native date cells, serial numbers, ISO text and `DD/MM/YYYY`.
pub fn parse_date_cell(cell: &Data) -> Option<NaiveDate> {
    match cell {
        Data::String(s) | Data::DateTimeIso(s) => parse_date_text(s.trim()),
        Data::DateTime(_) | Data::Float(_) | Data::Int(_) => cell.as_datetime().map(|dt| dt.date()),
        _ => None,
    }
}

fn parse_date_text(text: &str) -> Option<NaiveDate> {
    const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d/%m/%Y", "%Y/%m/%d"];
    const DATETIME_FORMATS: [&str; 4] = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%d/%m/%Y %H:%M:%S",
    ];

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// Text form of a cell; `None` for empty and error cells.
pub fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => Some(s.clone()),
        Data::Float(f) => Some(f.to_string()),
        Data::Int(i) => Some(i.to_string()),
        Data::Bool(b) => Some(b.to_string()),
        Data::DateTime(dt) => {
            let naive = dt.as_datetime()?;
            let text = if dt.as_f64() < 1.0 {
                naive.format("%H:%M:%S").to_string()
            } else if naive.time().num_seconds_from_midnight() == 0 {
                naive.format("%Y-%m-%d").to_string()
            } else {
                naive.format("%Y-%m-%d %H:%M:%S").to_string()
            };
            Some(text)
        }
    }
}

fn infer_column(name: &str, cells: &[(usize, &Data)]) -> Column {
    let present: Vec<&Data> = cells
        .iter()
        .map(|(_, c)| *c)
        .filter(|c| !matches!(c, Data::Empty | Data::Error(_)))
        .collect();

    if !present.is_empty() && present.iter().all(|c| matches!(c, Data::Bool(_))) {
        let values: Vec<Option<bool>> = cells
            .iter()
            .map(|(_, c)| match c {
                Data::Bool(b) => Some(*b),
                _ => None,
            })
            .collect();
        return Column::new(name.into(), values);
    }

    if present
        .iter()
        .all(|c| matches!(c, Data::Float(_) | Data::Int(_)))
    {
        let values: Vec<Option<f64>> = cells
            .iter()
            .map(|(_, c)| match c {
                Data::Float(f) => Some(*f),
                Data::Int(i) => Some(*i as f64),
                _ => None,
            })
            .collect();

        let integral = !values.is_empty()
            && values
                .iter()
                .all(|v| matches!(v, Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64));
        if integral {
            let ints: Vec<i64> = values.iter().map(|v| v.unwrap_or_default() as i64).collect();
            return Column::new(name.into(), ints);
        }
        return Column::new(name.into(), values);
    }

    let values: Vec<Option<String>> = cells.iter().map(|(_, c)| cell_text(c)).collect();
    Column::new(name.into(), values)
}
