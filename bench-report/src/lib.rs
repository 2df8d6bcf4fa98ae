//! Benchmark Report Library
//!
//! Turns the `results.csv` written by the data-structure benchmark (BST, AVL,
//! Treap and SkipList variants) into three comparison charts.
//!
//! # Architecture
//!
//! The pipeline is linear and one-shot:
//! - Loads the results CSV (required columns in any order, numeric extras kept)
//! - Averages repeated runs per (DataStructure, N)
//! - Drops the excluded variants for the timing charts
//! - Renders insertion time, search time and height against N
//!
//! The library does NOT:
//! - Run the benchmark itself
//! - Print console status lines (the CLI does, between pipeline steps)
//! - Perform statistical tests on the data
//!
//! # Example Usage
//!
//! ```no_run
//! use bench_report::{ImageFormat, ReportConfig, ReportGenerator};
//!
//! let config = ReportConfig::new()
//!     .with_input("results.csv")
//!     .with_output_dir("plots")
//!     .with_format(ImageFormat::Png);
//!
//! let summary = ReportGenerator::new(config).run().unwrap();
//! for chart in &summary.charts {
//!     println!("Wrote {:?}", chart);
//! }
//! ```

// Public modules
pub mod aggregate;
pub mod chart;
pub mod config;
pub mod generator;
pub mod loader;
pub mod types;

// Re-export main types for convenience
pub use aggregate::{aggregate, exclude_variants, variants};
pub use chart::{render_chart, AxisScale, ChartKind, Series};
pub use config::{ImageFormat, ReportConfig};
pub use generator::{write_summary, ReportData, ReportGenerator, RunSummary};
pub use loader::{load_records, read_records};
pub use types::{AggregatedRecord, BenchmarkRecord, Metric, ReportError, Result};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_basics() {
        // Smoke test: averaging and filtering through the public API
        let rows = read_records(
            "DataStructure,N,InsertionTime_us,AvgSearchTime_ns,Height\n\
             BST,100,5.0,200.0,10\n\
             SkipList_p075,100,3.0,150.0,8\n"
                .as_bytes(),
        )
        .unwrap();

        let data = ReportData::from_records(&rows, &ReportConfig::default().excluded_variants);
        assert_eq!(data.aggregated.len(), 2);
        assert_eq!(variants(&data.filtered), vec!["BST"]);
    }
}
