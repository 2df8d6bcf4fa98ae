//! Benchmark results loader
//!
//! Reads the results CSV written by the benchmark program. The five required
//! columns can come in any order; further columns are carried along when all
//! of their values are numeric and dropped otherwise.

use crate::types::{
    BenchmarkRecord, ReportError, Result, COL_DATA_STRUCTURE, COL_HEIGHT, COL_INSERTION_TIME,
    COL_N, COL_SEARCH_TIME, REQUIRED_COLUMNS,
};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Load every row of a results file
///
/// # Arguments
/// * `path` - Path to the results CSV
///
/// # Returns
/// * `Result<Vec<BenchmarkRecord>>` - One record per data row, in file order.
///   A file with a header but no rows is an `EmptyInput` error.
pub fn load_records(path: &Path) -> Result<Vec<BenchmarkRecord>> {
    log::info!("Loading benchmark results: {:?}", path);

    let file = File::open(path)?;
    let records = read_records(BufReader::new(file))?;

    if records.is_empty() {
        return Err(ReportError::EmptyInput(path.to_path_buf()));
    }

    log::info!("Loaded {} benchmark rows from {:?}", records.len(), path);
    Ok(records)
}

/// Parse benchmark rows from any reader producing CSV text
pub fn read_records<R: Read>(reader: R) -> Result<Vec<BenchmarkRecord>> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let layout = ColumnLayout::from_headers(&headers)?;

    let rows = csv_reader
        .records()
        .collect::<std::result::Result<Vec<StringRecord>, csv::Error>>()?;

    // An extra column is kept only if every row holds a number in it
    let numeric_extras: Vec<(usize, String)> = layout
        .extras
        .iter()
        .filter(|(idx, name)| {
            let numeric = rows
                .iter()
                .all(|row| row.get(*idx).map_or(false, |v| v.parse::<f64>().is_ok()));
            if !numeric {
                log::debug!("Dropping non-numeric column: {}", name);
            }
            numeric
        })
        .cloned()
        .collect();

    rows.iter()
        .map(|row| layout.parse_row(row, &numeric_extras))
        .collect()
}

/// Positions of the known columns within the header row
#[derive(Debug)]
struct ColumnLayout {
    data_structure: usize,
    n: usize,
    insertion_time: usize,
    search_time: usize,
    height: usize,
    /// (index, header) of every column that is not a required one
    extras: Vec<(usize, String)>,
}

impl ColumnLayout {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| ReportError::MissingColumn(name.to_string()))
        };

        let layout = Self {
            data_structure: find(COL_DATA_STRUCTURE)?,
            n: find(COL_N)?,
            insertion_time: find(COL_INSERTION_TIME)?,
            search_time: find(COL_SEARCH_TIME)?,
            height: find(COL_HEIGHT)?,
            extras: headers
                .iter()
                .enumerate()
                .filter(|(_, h)| !REQUIRED_COLUMNS.contains(h))
                .map(|(idx, h)| (idx, h.to_string()))
                .collect(),
        };

        log::debug!("Column layout: {:?}", layout);
        Ok(layout)
    }

    fn parse_row(
        &self,
        row: &StringRecord,
        numeric_extras: &[(usize, String)],
    ) -> Result<BenchmarkRecord> {
        let line = row.position().map(|p| p.line()).unwrap_or(0);

        let mut record = BenchmarkRecord::new(
            field(row, self.data_structure, COL_DATA_STRUCTURE, line)?,
            parse_field(row, self.n, COL_N, line)?,
            parse_field(row, self.insertion_time, COL_INSERTION_TIME, line)?,
            parse_field(row, self.search_time, COL_SEARCH_TIME, line)?,
            parse_field(row, self.height, COL_HEIGHT, line)?,
        );

        for (idx, name) in numeric_extras {
            let value = parse_field(row, *idx, name, line)?;
            record.extras.insert(name.clone(), value);
        }

        Ok(record)
    }
}

fn field<'r>(row: &'r StringRecord, idx: usize, column: &str, line: u64) -> Result<&'r str> {
    row.get(idx).ok_or_else(|| ReportError::InvalidValue {
        line,
        column: column.to_string(),
        value: String::new(),
    })
}

fn parse_field<T: std::str::FromStr>(
    row: &StringRecord,
    idx: usize,
    column: &str,
    line: u64,
) -> Result<T> {
    let raw = field(row, idx, column, line)?;
    raw.parse().map_err(|_| ReportError::InvalidValue {
        line,
        column: column.to_string(),
        value: raw.to_string(),
    })
}
