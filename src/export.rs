//! Curve export module
//!
//! Writes parsed curve tables to Parquet or CSV files, one output file per
//! curve, named after the source file and the curve's discovery index.

use crate::config::{ExportConfig, OutputFormat};
use crate::constants::CURVE_FILE_SUFFIX;
use crate::error::{ExplainError, Result};
use crate::models::ExportStats;
use crate::parser::ExperimentParser;

use polars::prelude::{CsvWriter, DataFrame, ParquetWriter, SerWriter};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Output path for curve `index` of `input`: `<dir>/<stem>_curve<index>.<ext>`
pub fn curve_output_path(
    output_dir: &Path,
    input: &Path,
    index: usize,
    format: OutputFormat,
) -> PathBuf {
    let stem = input
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy();
    output_dir.join(format!(
        "{}{}{}.{}",
        stem,
        CURVE_FILE_SUFFIX,
        index,
        format.extension()
    ))
}

/// Write one table to `path` in the configured format
pub fn write_curve(df: &mut DataFrame, path: &Path, config: &ExportConfig) -> Result<()> {
    if !config.overwrite && path.exists() {
        return Err(ExplainError::Export {
            path: path.to_path_buf(),
            reason: "output exists and overwrite is disabled".to_string(),
        });
    }

    let file = File::create(path).map_err(|e| ExplainError::Export {
        path: path.to_path_buf(),
        reason: format!("Failed to create output file: {}", e),
    })?;

    let written = match config.format {
        OutputFormat::Parquet => ParquetWriter::new(file)
            .with_compression(config.compression.to_polars_compression())
            .finish(df)
            .map(|_| ()),
        OutputFormat::Csv => CsvWriter::new(file).include_header(true).finish(df),
    };

    written.map_err(|e| ExplainError::Export {
        path: path.to_path_buf(),
        reason: format!("Failed to write {:?}: {}", config.format, e),
    })?;

    debug!("Wrote {} rows to {}", df.height(), path.display());
    Ok(())
}

/// Write every curve of a loaded experiment, projected through its accessor
pub fn export_experiment(
    experiment: &dyn ExperimentParser,
    input: &Path,
    output_dir: &Path,
    config: &ExportConfig,
) -> Result<ExportStats> {
    std::fs::create_dir_all(output_dir)?;

    let mut stats = ExportStats::default();
    for index in 0..experiment.curve_count()? {
        let mut df = experiment.curve(index)?;
        let path = curve_output_path(output_dir, input, index, config.format);

        write_curve(&mut df, &path, config)?;

        stats.curves_written += 1;
        stats.total_rows += df.height();
        stats.outputs.push(path);
    }
    stats.files_processed = 1;

    info!(
        "Exported {} curves ({} rows) from {}",
        stats.curves_written,
        stats.total_rows,
        input.display()
    );
    Ok(stats)
}
