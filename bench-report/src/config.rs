//! Report configuration types
//!
//! This module defines everything a report run can be parameterised with:
//! where the results come from, where the charts go, which image format they
//! are written in and which variants are left out of the timing charts.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Configuration for a report run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Benchmark results CSV to read
    #[serde(default = "default_input")]
    pub input: PathBuf,

    /// Directory the charts are written into (created if absent)
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Image format of the charts
    #[serde(default)]
    pub format: ImageFormat,

    /// Variants left out of the insertion-time and search-time charts
    #[serde(default = "default_excluded_variants")]
    pub excluded_variants: Vec<String>,

    /// Chart width in pixels
    #[serde(default = "default_width")]
    pub width: u32,

    /// Chart height in pixels
    #[serde(default = "default_height")]
    pub height: u32,
}

fn default_input() -> PathBuf {
    PathBuf::from("results.csv")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("plots")
}

fn default_excluded_variants() -> Vec<String> {
    vec!["SkipList_p025".to_string(), "SkipList_p075".to_string()]
}

fn default_width() -> u32 {
    1200
}

fn default_height() -> u32 {
    800
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            input: default_input(),
            output_dir: default_output_dir(),
            format: ImageFormat::default(),
            excluded_variants: default_excluded_variants(),
            width: default_width(),
            height: default_height(),
        }
    }
}

impl ReportConfig {
    /// Create a new configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the results CSV path
    pub fn with_input(mut self, input: impl AsRef<Path>) -> Self {
        self.input = input.as_ref().to_path_buf();
        self
    }

    /// Builder method: set the output directory
    pub fn with_output_dir(mut self, output_dir: impl AsRef<Path>) -> Self {
        self.output_dir = output_dir.as_ref().to_path_buf();
        self
    }

    /// Builder method: set the image format
    pub fn with_format(mut self, format: ImageFormat) -> Self {
        self.format = format;
        self
    }

    /// Builder method: replace the excluded variant list
    pub fn with_excluded_variants(mut self, variants: Vec<String>) -> Self {
        self.excluded_variants = variants;
        self
    }

    /// Builder method: exclude one more variant
    pub fn add_excluded_variant(mut self, variant: impl Into<String>) -> Self {
        self.excluded_variants.push(variant.into());
        self
    }

    /// Builder method: set the chart size in pixels
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Check if a variant is left out of the timing charts
    pub fn is_excluded(&self, data_structure: &str) -> bool {
        self.excluded_variants.iter().any(|v| v == data_structure)
    }
}

/// Image formats the charts can be written in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    #[default]
    Png,
    Svg,
    #[serde(alias = "jpg")]
    Jpeg,
    Bmp,
}

impl ImageFormat {
    /// File extension (without the dot)
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Svg => "svg",
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Bmp => "bmp",
        }
    }

    /// True for formats drawn through the raster backend
    pub fn is_raster(&self) -> bool {
        !matches!(self, ImageFormat::Svg)
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl FromStr for ImageFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(ImageFormat::Png),
            "svg" => Ok(ImageFormat::Svg),
            "jpg" | "jpeg" => Ok(ImageFormat::Jpeg),
            "bmp" => Ok(ImageFormat::Bmp),
            other => Err(format!(
                "unsupported image format '{}' (expected png, svg, jpeg or bmp)",
                other
            )),
        }
    }
}
