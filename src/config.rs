//! Configuration management and validation.
//!
//! Provides configuration structures for reading EXPLAIN files and for
//! exporting parsed curves, with builder-style setters and validation.

use crate::constants::{CURVE_MARKER, DEFAULT_DELIMITER};
use crate::error::{ExplainError, Result};
use polars::prelude::ParquetCompression;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Settings for the header reader and table extractor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Field delimiter of header lines and table bodies
    pub delimiter: u8,

    /// Regex matched against lines to detect curve boundaries
    pub curve_marker: String,

    /// Convert the `T` column to absolute timestamps using header DATE/TIME
    pub to_timestamp: bool,

    /// Null out fields that fail type parsing instead of failing the table
    pub ignore_errors: bool,

    /// Drop trailing fields of rows longer than the header
    pub truncate_ragged_lines: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
            curve_marker: CURVE_MARKER.to_string(),
            to_timestamp: false,
            ignore_errors: true,
            truncate_ragged_lines: true,
        }
    }
}

impl ParserConfig {
    /// Use a different field delimiter
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Use a different curve boundary pattern
    pub fn with_curve_marker(mut self, marker: impl Into<String>) -> Self {
        self.curve_marker = marker.into();
        self
    }

    /// Enable absolute timestamps on the `T` column
    pub fn with_timestamps(mut self) -> Self {
        self.to_timestamp = true;
        self
    }

    /// Fail the table on unparsable fields
    pub fn strict(mut self) -> Self {
        self.ignore_errors = false;
        self.truncate_ragged_lines = false;
        self
    }

    /// Delimiter as a char, for splitting lines
    pub fn delimiter_char(&self) -> char {
        self.delimiter as char
    }

    /// Compile the curve marker
    pub fn marker_regex(&self) -> Result<Regex> {
        Regex::new(&self.curve_marker).map_err(|e| ExplainError::Configuration {
            message: format!("Invalid curve marker '{}': {}", self.curve_marker, e),
        })
    }

    /// Check the configuration before use
    pub fn validate(&self) -> Result<()> {
        if !self.delimiter.is_ascii() || self.delimiter == b'\n' || self.delimiter == b'\r' {
            return Err(ExplainError::Configuration {
                message: format!("Unsupported delimiter byte 0x{:02x}", self.delimiter),
            });
        }
        if self.curve_marker.is_empty() {
            return Err(ExplainError::Configuration {
                message: "Curve marker must not be empty".to_string(),
            });
        }
        self.marker_regex().map(|_| ())
    }
}

/// Output file formats for exported curves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Parquet,
    Csv,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Parquet => "parquet",
            OutputFormat::Csv => "csv",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = ExplainError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "parquet" => Ok(OutputFormat::Parquet),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(ExplainError::Configuration {
                message: format!("Unknown output format: {} (expected parquet or csv)", s),
            }),
        }
    }
}

/// Supported compression algorithms for parquet files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompressionAlgorithm {
    /// Snappy compression - good balance of speed and compression
    Snappy,
    /// ZSTD compression - better compression ratio, slower
    Zstd,
    /// LZ4 compression - fastest, lower compression ratio
    Lz4,
    /// No compression
    Uncompressed,
}

impl CompressionAlgorithm {
    /// Convert to polars ParquetCompression type
    pub fn to_polars_compression(&self) -> ParquetCompression {
        match self {
            CompressionAlgorithm::Snappy => ParquetCompression::Snappy,
            CompressionAlgorithm::Zstd => ParquetCompression::Zstd(None),
            CompressionAlgorithm::Lz4 => ParquetCompression::Lz4Raw,
            CompressionAlgorithm::Uncompressed => ParquetCompression::Uncompressed,
        }
    }
}

impl FromStr for CompressionAlgorithm {
    type Err = ExplainError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "snappy" => Ok(CompressionAlgorithm::Snappy),
            "zstd" => Ok(CompressionAlgorithm::Zstd),
            "lz4" => Ok(CompressionAlgorithm::Lz4),
            "none" | "uncompressed" => Ok(CompressionAlgorithm::Uncompressed),
            _ => Err(ExplainError::Configuration {
                message: format!(
                    "Unknown compression: {} (expected snappy, zstd, lz4 or none)",
                    s
                ),
            }),
        }
    }
}

/// Settings for writing parsed curves to disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    pub format: OutputFormat,
    pub compression: CompressionAlgorithm,
    /// Replace existing output files
    pub overwrite: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Parquet,
            compression: CompressionAlgorithm::Snappy,
            overwrite: true,
        }
    }
}

impl ExportConfig {
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_compression(mut self, compression: CompressionAlgorithm) -> Self {
        self.compression = compression;
        self
    }

    /// Keep existing output files instead of replacing them
    pub fn without_overwrite(mut self) -> Self {
        self.overwrite = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_parser_config() {
        let config = ParserConfig::default();
        assert_eq!(config.delimiter, b'\t');
        assert_eq!(config.curve_marker, "CURVE");
        assert!(!config.to_timestamp);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_marker_rejected() {
        let config = ParserConfig::default().with_curve_marker("CURVE(");
        match config.validate().unwrap_err() {
            ExplainError::Configuration { message } => assert!(message.contains("CURVE(")),
            other => panic!("Expected Configuration error, got {:?}", other),
        }
    }

    #[test]
    fn test_newline_delimiter_rejected() {
        let config = ParserConfig::default().with_delimiter(b'\n');
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_compression_from_str() {
        assert_eq!(
            "ZSTD".parse::<CompressionAlgorithm>().unwrap(),
            CompressionAlgorithm::Zstd
        );
        assert_eq!(
            "none".parse::<CompressionAlgorithm>().unwrap(),
            CompressionAlgorithm::Uncompressed
        );
        assert!("brotli".parse::<CompressionAlgorithm>().is_err());
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("csv".parse::<OutputFormat>().unwrap(), OutputFormat::Csv);
        assert_eq!(OutputFormat::Parquet.extension(), "parquet");
        assert!("xlsx".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_export_config_builders() {
        let config = ExportConfig::default()
            .with_format(OutputFormat::Csv)
            .with_compression(CompressionAlgorithm::Lz4)
            .without_overwrite();
        assert_eq!(config.format, OutputFormat::Csv);
        assert_eq!(config.compression, CompressionAlgorithm::Lz4);
        assert!(!config.overwrite);
    }
}
