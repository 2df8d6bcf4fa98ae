//! Benchmark Report CLI Application
//!
//! This is the command-line interface for the benchmark report generator.
//! It uses the bench-report library and adds:
//! - Command-line flags and an optional TOML configuration file
//! - Console status lines between the pipeline steps
//! - Logging setup and process exit codes

use anyhow::{Context, Result};
use bench_report::{write_summary, ChartKind, ImageFormat, ReportConfig, ReportGenerator};
use clap::Parser;
use std::fmt::Display;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

mod config;

/// Exit code when the results file does not exist
const EXIT_MISSING_INPUT: u8 = 2;

/// Benchmark Report - Plot data-structure benchmark results
#[derive(Parser, Debug)]
#[command(name = "bench-report-cli")]
#[command(about = "Plot insertion time, search time and height from benchmark results", long_about = None)]
#[command(version)]
struct Args {
    /// Path to the benchmark results CSV [default: results.csv]
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Directory the charts are written into [default: plots]
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Image format: png, svg, jpeg or bmp [default: png]
    #[arg(short, long, value_name = "FORMAT")]
    format: Option<ImageFormat>,

    /// Variant left out of the timing charts (can be repeated; replaces the defaults)
    #[arg(short = 'x', long, value_name = "LABEL")]
    exclude: Vec<String>,

    /// Keep every variant in the timing charts
    #[arg(long, conflicts_with = "exclude")]
    no_exclude: bool,

    /// Chart width in pixels [default: 1200]
    #[arg(long, value_name = "PX")]
    width: Option<u32>,

    /// Chart height in pixels [default: 800]
    #[arg(long, value_name = "PX")]
    height: Option<u32>,

    /// Also write the averaged table as JSON
    #[arg(long, value_name = "FILE")]
    summary: Option<PathBuf>,

    /// Path to configuration file (TOML); flags override its values
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verbosity level (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<ExitCode> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbose, args.quiet);

    log::info!("Benchmark Report CLI v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using report library v{}", bench_report::VERSION);

    let (config, summary) = resolve_config(&args)?;
    log::debug!("Effective configuration: {:?}", config);

    let mut console = Console::new(io::stdout().lock(), args.quiet);
    match generate_report(config, summary, &mut console)? {
        Outcome::Completed => Ok(ExitCode::SUCCESS),
        Outcome::MissingInput => Ok(ExitCode::from(EXIT_MISSING_INPUT)),
    }
}

/// How a report run ended, when it did not fail outright
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Completed,
    /// The results file was absent; nothing was written
    MissingInput,
}

/// Merge the configuration file (if any) with command-line flags
fn resolve_config(args: &Args) -> Result<(ReportConfig, Option<PathBuf>)> {
    let file_config = match &args.config {
        Some(path) => {
            log::info!("Loading configuration from: {:?}", path);
            config::load_config(path)?
        }
        None => config::AppConfig::default(),
    };

    let summary = args.summary.clone().or_else(|| file_config.summary.clone());
    let mut report = file_config.into_report_config();

    if let Some(input) = &args.input {
        report.input = input.clone();
    }
    if let Some(output_dir) = &args.output_dir {
        report.output_dir = output_dir.clone();
    }
    if let Some(format) = args.format {
        report.format = format;
    }
    if let Some(width) = args.width {
        report.width = width;
    }
    if let Some(height) = args.height {
        report.height = height;
    }
    if args.no_exclude {
        report.excluded_variants.clear();
    } else if !args.exclude.is_empty() {
        report.excluded_variants = args.exclude.clone();
    }

    Ok((report, summary))
}

/// Status lines on stdout, silenced by --quiet
struct Console<W: Write> {
    out: W,
    quiet: bool,
}

impl<W: Write> Console<W> {
    fn new(out: W, quiet: bool) -> Self {
        Self { out, quiet }
    }

    fn line(&mut self, message: impl Display) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        writeln!(self.out, "{}", message)
    }
}

/// Run the report pipeline step by step, printing progress in between
fn generate_report<W: Write>(
    config: ReportConfig,
    summary: Option<PathBuf>,
    console: &mut Console<W>,
) -> Result<Outcome> {
    let generator = ReportGenerator::new(config);
    let input = generator.config().input.clone();
    let output_dir = generator.config().output_dir.clone();

    if let Err(e) = generator.check_input() {
        eprintln!("Error: {}", e);
        return Ok(Outcome::MissingInput);
    }

    let created = generator
        .prepare_output_dir()
        .with_context(|| format!("Failed to create output directory: {:?}", output_dir))?;
    if created {
        console.line(format!("Created directory: '{}'", output_dir.display()))?;
    }

    let data = generator
        .load()
        .with_context(|| format!("Failed to load benchmark results: {:?}", input))?;

    for kind in ChartKind::ALL {
        console.line(format!("Generating {}...", kind))?;
        generator
            .render(kind, &data)
            .with_context(|| format!("Failed to generate {}", kind))?;
    }

    if let Some(path) = summary {
        write_summary(&path, &data)
            .with_context(|| format!("Failed to write summary: {:?}", path))?;
        console.line(format!("Summary written to '{}'", path.display()))?;
    }

    console.line(format!(
        "\nAll plots have been saved to the '{}' directory.",
        output_dir.display()
    ))?;

    Ok(Outcome::Completed)
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
