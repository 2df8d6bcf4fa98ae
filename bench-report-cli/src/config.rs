//! Configuration file loading and parsing

use anyhow::{Context, Result};
use bench_report::{ImageFormat, ReportConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Application configuration (loaded from a TOML file); every key is optional
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    pub input: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub format: Option<ImageFormat>,
    pub excluded_variants: Option<Vec<String>>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// Where to write the averaged table as JSON
    pub summary: Option<PathBuf>,
}

impl AppConfig {
    /// Apply the file's values on top of the library defaults
    pub fn into_report_config(self) -> ReportConfig {
        let defaults = ReportConfig::default();
        ReportConfig {
            input: self.input.unwrap_or(defaults.input),
            output_dir: self.output_dir.unwrap_or(defaults.output_dir),
            format: self.format.unwrap_or(defaults.format),
            excluded_variants: self.excluded_variants.unwrap_or(defaults.excluded_variants),
            width: self.width.unwrap_or(defaults.width),
            height: self.height.unwrap_or(defaults.height),
        }
    }
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let toml_content = r#"
            input = "bench/results.csv"
            output_dir = "charts"
            format = "svg"
            excluded_variants = ["SkipList_p025"]
            summary = "charts/summary.json"
        "#;

        let config: AppConfig = toml::from_str(toml_content).unwrap();
        assert_eq!(config.summary, Some(PathBuf::from("charts/summary.json")));

        let report = config.into_report_config();
        assert_eq!(report.input, PathBuf::from("bench/results.csv"));
        assert_eq!(report.output_dir, PathBuf::from("charts"));
        assert_eq!(report.format, ImageFormat::Svg);
        assert_eq!(report.excluded_variants, vec!["SkipList_p025"]);
        assert_eq!((report.width, report.height), (1200, 800));
    }

    #[test]
    fn test_empty_config_gives_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.into_report_config(), ReportConfig::default());
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let result: std::result::Result<AppConfig, _> = toml::from_str("colour = \"red\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.toml");
        fs::write(&path, "format = \"jpg\"\nwidth = 640\nheight = 480\n").unwrap();

        let report = load_config(&path).unwrap().into_report_config();
        assert_eq!(report.format, ImageFormat::Jpeg);
        assert_eq!((report.width, report.height), (640, 480));
    }

    #[test]
    fn test_load_config_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(&dir.path().join("absent.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
