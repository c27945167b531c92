//! Generic EXPLAIN file loading.
//!
//! [`ExplainFile`] is one fully parsed DTA file: its header plus every
//! curve table in discovery order. [`GamryParser`] wraps it in the
//! Unloaded/Loaded state machine shared by all experiment accessors, and
//! [`ExperimentParser`] is the accessor surface those types have in common.

use crate::config::ParserConfig;
use crate::constants::TIME_COLUMN;
use crate::curve::CurveReader;
use crate::error::{ExplainError, Result};
use crate::header::read_header;
use crate::models::{Curve, ExperimentType, Header};
use polars::prelude::*;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Header and curve tables of one DTA file
#[derive(Debug, Clone)]
pub struct ExplainFile {
    path: Option<PathBuf>,
    header: Header,
    curves: Vec<Curve>,
}

impl ExplainFile {
    /// Parse a DTA file from disk
    pub fn from_path(path: &Path, config: &ParserConfig) -> Result<Self> {
        let file = File::open(path).map_err(|source| ExplainError::FileOpen {
            path: path.to_path_buf(),
            source,
        })?;

        let mut parsed = Self::from_reader(BufReader::new(file), config).map_err(|e| match e {
            ExplainError::Io(source) => ExplainError::FileOpen {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })?;
        parsed.path = Some(path.to_path_buf());

        info!(
            "Loaded {} with {} curves",
            path.display(),
            parsed.curves.len()
        );
        Ok(parsed)
    }

    /// Parse DTA content from any buffered reader
    pub fn from_reader<R: BufRead>(mut reader: R, config: &ParserConfig) -> Result<Self> {
        config.validate()?;

        let header = read_header(&mut reader, config)?;
        let mut curves = CurveReader::new(config)?.read_curves(&mut reader)?;

        if config.to_timestamp {
            apply_timestamps(&header, &mut curves)?;
        }

        debug!(
            "Parsed {} header entries and {} curves",
            header.len(),
            curves.len()
        );

        Ok(Self {
            path: None,
            header,
            curves,
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn curves(&self) -> &[Curve] {
        &self.curves
    }

    pub fn curve_count(&self) -> usize {
        self.curves.len()
    }

    /// Curve by zero-based discovery index
    pub fn curve(&self, index: usize) -> Result<&Curve> {
        self.curves
            .get(index)
            .ok_or(ExplainError::CurveIndexOutOfRange {
                index,
                count: self.curves.len(),
            })
    }
}

/// Replace each curve's `T` seconds column with absolute `Datetime[ms]`
fn apply_timestamps(header: &Header, curves: &mut [Curve]) -> Result<()> {
    let start_ms = header.timestamp()?.and_utc().timestamp_millis();

    for curve in curves.iter_mut() {
        if !curve.keys.iter().any(|key| key == TIME_COLUMN) {
            continue;
        }

        let seconds = curve.data.column(TIME_COLUMN)?.cast(&DataType::Float64)?;
        let millis: Vec<Option<i64>> = seconds
            .f64()?
            .into_iter()
            .map(|t| t.map(|t| start_ms + (t * 1000.0).round() as i64))
            .collect();

        let stamps = Series::new(TIME_COLUMN.into(), millis)
            .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?;
        curve.data.with_column(stamps)?;
    }

    Ok(())
}

/// Unloaded/Loaded holder for a parsed DTA file
#[derive(Debug, Clone, Default)]
pub struct GamryParser {
    config: ParserConfig,
    loaded: Option<ExplainFile>,
}

impl GamryParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ParserConfig) -> Self {
        Self {
            config,
            loaded: None,
        }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parse a file, replacing any previous contents
    ///
    /// On failure the parser is left unloaded.
    pub fn load_file(&mut self, path: &Path) -> Result<()> {
        self.loaded = None;
        self.loaded = Some(ExplainFile::from_path(path, &self.config)?);
        Ok(())
    }

    /// Parse from an in-memory or already-open source
    pub fn load_reader<R: BufRead>(&mut self, reader: R) -> Result<()> {
        self.loaded = None;
        self.loaded = Some(ExplainFile::from_reader(reader, &self.config)?);
        Ok(())
    }

    /// The parsed file, or `NotLoaded`
    pub fn loaded(&self) -> Result<&ExplainFile> {
        self.loaded.as_ref().ok_or(ExplainError::NotLoaded)
    }
}

/// Accessors shared by every experiment type
///
/// Everything except [`load`](ExperimentParser::load) fails with
/// [`ExplainError::NotLoaded`] until a load succeeds.
pub trait ExperimentParser {
    fn parser(&self) -> &GamryParser;

    fn parser_mut(&mut self) -> &mut GamryParser;

    /// The experiment-specific projection of curve `index`
    fn curve(&self, index: usize) -> Result<DataFrame>;

    fn load(&mut self, path: &Path) -> Result<()> {
        self.parser_mut().load_file(path)
    }

    fn is_loaded(&self) -> bool {
        self.parser().loaded().is_ok()
    }

    fn header(&self) -> Result<&Header> {
        Ok(self.parser().loaded()?.header())
    }

    fn curve_count(&self) -> Result<usize> {
        Ok(self.parser().loaded()?.curve_count())
    }

    /// Full parsed table of curve `index`, all columns
    fn table(&self, index: usize) -> Result<&Curve> {
        self.parser().loaded()?.curve(index)
    }

    fn curve_keys(&self, index: usize) -> Result<&[String]> {
        Ok(&self.table(index)?.keys)
    }

    fn curve_units(&self, index: usize) -> Result<&[String]> {
        Ok(&self.table(index)?.units)
    }

    fn experiment_type(&self) -> Result<Option<ExperimentType>> {
        Ok(self.header()?.experiment_type())
    }

    /// Source path; `None` when loaded from a reader
    fn file_path(&self) -> Result<Option<&Path>> {
        Ok(self.parser().loaded()?.path())
    }

    /// Rows in curve `index`; 0 when the file holds no curves
    fn sample_count(&self, index: usize) -> Result<usize> {
        let file = self.parser().loaded()?;
        if file.curve_count() == 0 {
            return Ok(0);
        }
        Ok(file.curve(index)?.row_count())
    }
}

impl ExperimentParser for GamryParser {
    fn parser(&self) -> &GamryParser {
        self
    }

    fn parser_mut(&mut self) -> &mut GamryParser {
        self
    }

    fn curve(&self, index: usize) -> Result<DataFrame> {
        Ok(self.table(index)?.data.clone())
    }
}
