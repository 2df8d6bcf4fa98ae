//! Report pipeline
//!
//! The ReportGenerator ties the stages together: input check, output
//! directory preparation, loading and averaging, then one render per chart.
//! Each step is public so callers can report progress between them; `run`
//! performs all of them in order.

use crate::aggregate::{aggregate, exclude_variants};
use crate::chart::{render_chart, ChartKind};
use crate::config::ReportConfig;
use crate::loader::load_records;
use crate::types::{AggregatedRecord, BenchmarkRecord, ReportError, Result};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Tables derived from one results file
#[derive(Debug, Clone, PartialEq)]
pub struct ReportData {
    /// Number of raw rows read
    pub raw_rows: usize,
    /// One averaged row per (DataStructure, N), all variants
    pub aggregated: Vec<AggregatedRecord>,
    /// `aggregated` without the excluded variants
    pub filtered: Vec<AggregatedRecord>,
}

impl ReportData {
    /// Build both tables from raw rows
    pub fn from_records(
        records: &[BenchmarkRecord],
        excluded_variants: &[String],
    ) -> Self {
        let aggregated = aggregate(records);
        let filtered = exclude_variants(&aggregated, excluded_variants);
        Self {
            raw_rows: records.len(),
            aggregated,
            filtered,
        }
    }

    /// Table a chart is drawn from
    pub fn table_for(&self, kind: ChartKind) -> &[AggregatedRecord] {
        if kind.uses_filtered_view() {
            &self.filtered
        } else {
            &self.aggregated
        }
    }
}

/// Outcome of a complete run
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// True if the output directory had to be created
    pub created_output_dir: bool,
    /// Number of raw rows read
    pub raw_rows: usize,
    /// Number of (DataStructure, N) groups
    pub groups: usize,
    /// Chart files written, in report order
    pub charts: Vec<PathBuf>,
}

/// Generates the three report charts from a results file
pub struct ReportGenerator {
    config: ReportConfig,
}

impl ReportGenerator {
    /// Create a generator for the given configuration
    pub fn new(config: ReportConfig) -> Self {
        Self { config }
    }

    /// The configuration this generator runs with
    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Fail with `MissingInput` if the results file does not exist
    pub fn check_input(&self) -> Result<()> {
        if self.config.input.exists() {
            Ok(())
        } else {
            Err(ReportError::MissingInput(self.config.input.clone()))
        }
    }

    /// Create the output directory (with parents) if needed
    ///
    /// # Returns
    /// * `Ok(true)` - the directory was created
    /// * `Ok(false)` - it already existed
    pub fn prepare_output_dir(&self) -> Result<bool> {
        let dir = &self.config.output_dir;
        if dir.is_dir() {
            return Ok(false);
        }

        fs::create_dir_all(dir)?;
        log::info!("Created output directory: {:?}", dir);
        Ok(true)
    }

    /// Load the results file and derive the chart tables
    pub fn load(&self) -> Result<ReportData> {
        let records = load_records(&self.config.input)?;
        let data = ReportData::from_records(&records, &self.config.excluded_variants);

        log::info!(
            "{} rows averaged into {} groups ({} after excluding {:?})",
            data.raw_rows,
            data.aggregated.len(),
            data.filtered.len(),
            self.config.excluded_variants
        );

        Ok(data)
    }

    /// Path a chart is written to
    pub fn chart_path(&self, kind: ChartKind) -> PathBuf {
        self.config.output_dir.join(kind.file_name(self.config.format))
    }

    /// Render one chart and return the path written
    pub fn render(&self, kind: ChartKind, data: &ReportData) -> Result<PathBuf> {
        let path = self.chart_path(kind);
        render_chart(
            kind,
            data.table_for(kind),
            &path,
            self.config.format,
            (self.config.width, self.config.height),
        )?;
        log::info!("Saved {} to {:?}", kind, path);
        Ok(path)
    }

    /// Run the whole pipeline, stopping at the first error
    pub fn run(&self) -> Result<RunSummary> {
        self.check_input()?;
        let created_output_dir = self.prepare_output_dir()?;
        let data = self.load()?;

        let mut charts = Vec::with_capacity(ChartKind::ALL.len());
        for kind in ChartKind::ALL {
            log::info!("Generating {}...", kind);
            charts.push(self.render(kind, &data)?);
        }

        log::info!("All plots have been saved to {:?}", self.config.output_dir);

        Ok(RunSummary {
            created_output_dir,
            raw_rows: data.raw_rows,
            groups: data.aggregated.len(),
            charts,
        })
    }
}

/// Write the averaged table as pretty-printed JSON
pub fn write_summary(path: &Path, data: &ReportData) -> Result<()> {
    log::info!("Writing summary: {:?}", path);

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, &data.aggregated)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ImageFormat;

    fn sample_data() -> ReportData {
        let records = vec![
            BenchmarkRecord::new("BST", 100, 5.0, 200.0, 10.0),
            BenchmarkRecord::new("BST", 100, 7.0, 220.0, 12.0),
            BenchmarkRecord::new("SkipList_p025", 100, 3.0, 150.0, 8.0),
        ];
        ReportData::from_records(&records, &ReportConfig::default().excluded_variants)
    }

    #[test]
    fn test_report_data_views() {
        let data = sample_data();

        assert_eq!(data.raw_rows, 3);
        assert_eq!(data.aggregated.len(), 2);
        assert_eq!(data.filtered.len(), 1);

        let insertion = data.table_for(ChartKind::InsertionTime);
        assert_eq!(insertion.len(), 1);
        assert_eq!(insertion[0].data_structure, "BST");
        assert_eq!(data.table_for(ChartKind::SearchTime), insertion);

        let height = data.table_for(ChartKind::Height);
        assert_eq!(height.len(), 2);
        assert!(height.iter().any(|r| r.data_structure == "SkipList_p025"));
    }

    #[test]
    fn test_chart_paths() {
        let generator = ReportGenerator::new(
            ReportConfig::new()
                .with_output_dir("out")
                .with_format(ImageFormat::Svg),
        );

        assert_eq!(
            generator.chart_path(ChartKind::InsertionTime),
            PathBuf::from("out/1_insertion_time.svg")
        );
        assert_eq!(
            generator.chart_path(ChartKind::Height),
            PathBuf::from("out/3_height.svg")
        );
    }

    #[test]
    fn test_check_input_missing() {
        let dir = tempfile::tempdir().unwrap();
        let generator =
            ReportGenerator::new(ReportConfig::new().with_input(dir.path().join("nope.csv")));

        let err = generator.check_input().unwrap_err();
        assert!(err.is_missing_input());
        assert!(err.to_string().contains("nope.csv"));
    }

    #[test]
    fn test_prepare_output_dir_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("nested").join("plots");
        let generator = ReportGenerator::new(ReportConfig::new().with_output_dir(&output));

        assert!(generator.prepare_output_dir().unwrap());
        assert!(output.is_dir());
        assert!(!generator.prepare_output_dir().unwrap());
    }

    #[test]
    fn test_write_summary() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.json");

        write_summary(&path, &sample_data()).unwrap();

        let written: Vec<AggregatedRecord> =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, sample_data().aggregated);
        assert_eq!(written[0].runs, 2);
        assert_eq!(written[0].insertion_time_us, 6.0);
    }

    #[test]
    #[cfg(target_os = "linux")]
    fn test_write_summary_reports_flush_failure() {
        // Writes to /dev/full succeed until the buffer is flushed
        let err = write_summary(Path::new("/dev/full"), &sample_data()).unwrap_err();
        assert!(matches!(err, ReportError::Io(_)));
    }
}
