//! Core types for the benchmark report library
//!
//! This module defines the raw benchmark rows read from the results CSV, the
//! aggregated per-(DataStructure, N) rows that the charts are drawn from, and
//! the error type shared by every stage of the pipeline.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// Result type for report operations
pub type Result<T> = std::result::Result<T, ReportError>;

/// Column holding the data-structure variant label
pub const COL_DATA_STRUCTURE: &str = "DataStructure";
/// Column holding the node count
pub const COL_N: &str = "N";
/// Column holding the insertion time in microseconds
pub const COL_INSERTION_TIME: &str = "InsertionTime_us";
/// Column holding the average search time in nanoseconds
pub const COL_SEARCH_TIME: &str = "AvgSearchTime_ns";
/// Column holding the tree/list height
pub const COL_HEIGHT: &str = "Height";

/// All columns a results file must provide (order in the file is irrelevant)
pub const REQUIRED_COLUMNS: [&str; 5] = [
    COL_DATA_STRUCTURE,
    COL_N,
    COL_INSERTION_TIME,
    COL_SEARCH_TIME,
    COL_HEIGHT,
];

/// One row of the benchmark results file (a single trial run)
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkRecord {
    /// Data-structure variant label (e.g. "BST", "SkipList_p050")
    pub data_structure: String,
    /// Number of nodes inserted in this trial
    pub n: u64,
    /// Total insertion time in microseconds
    pub insertion_time_us: f64,
    /// Average search time in nanoseconds
    pub avg_search_time_ns: f64,
    /// Height of the resulting tree (or level count of the skip list)
    pub height: f64,
    /// Any further numeric columns (e.g. "Run"), keyed by header name
    pub extras: BTreeMap<String, f64>,
}

impl BenchmarkRecord {
    /// Create a record with no extra columns
    pub fn new(
        data_structure: impl Into<String>,
        n: u64,
        insertion_time_us: f64,
        avg_search_time_ns: f64,
        height: f64,
    ) -> Self {
        Self {
            data_structure: data_structure.into(),
            n,
            insertion_time_us,
            avg_search_time_ns,
            height,
            extras: BTreeMap::new(),
        }
    }

    /// Builder method: attach an extra numeric column
    pub fn with_extra(mut self, column: impl Into<String>, value: f64) -> Self {
        self.extras.insert(column.into(), value);
        self
    }
}

/// One row per distinct (DataStructure, N), numeric columns averaged
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedRecord {
    #[serde(rename = "DataStructure")]
    pub data_structure: String,
    #[serde(rename = "N")]
    pub n: u64,
    #[serde(rename = "InsertionTime_us")]
    pub insertion_time_us: f64,
    #[serde(rename = "AvgSearchTime_ns")]
    pub avg_search_time_ns: f64,
    #[serde(rename = "Height")]
    pub height: f64,
    /// Means of the extra numeric columns
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extras: BTreeMap<String, f64>,
    /// Number of raw rows merged into this one
    pub runs: usize,
}

impl AggregatedRecord {
    /// Read one of the charted metrics
    pub fn metric(&self, metric: Metric) -> f64 {
        match metric {
            Metric::InsertionTime => self.insertion_time_us,
            Metric::SearchTime => self.avg_search_time_ns,
            Metric::Height => self.height,
        }
    }
}

/// The three metrics the report plots against N
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    /// `InsertionTime_us`
    InsertionTime,
    /// `AvgSearchTime_ns`
    SearchTime,
    /// `Height`
    Height,
}

impl Metric {
    /// CSV column this metric is read from
    pub fn column(&self) -> &'static str {
        match self {
            Metric::InsertionTime => COL_INSERTION_TIME,
            Metric::SearchTime => COL_SEARCH_TIME,
            Metric::Height => COL_HEIGHT,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.column())
    }
}

/// Errors that can occur while building a report
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("'{}' not found. Please run the benchmark program first.", .0.display())]
    MissingInput(PathBuf),

    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("Invalid value {value:?} for column {column} on line {line}")]
    InvalidValue {
        line: u64,
        column: String,
        value: String,
    },

    #[error("No benchmark rows in {}", .0.display())]
    EmptyInput(PathBuf),

    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to render chart: {0}")]
    Render(String),

    #[error("Failed to write summary: {0}")]
    Summary(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ReportError {
    /// True for the missing-input case, which callers treat as a clean abort
    pub fn is_missing_input(&self) -> bool {
        matches!(self, ReportError::MissingInput(_))
    }
}
