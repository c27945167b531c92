//! Curve table extraction.
//!
//! A curve table is a column-name line, a units line and zero or more
//! delimited data rows, terminated by a line matching the curve marker or by
//! end of file. The marker line is consumed, so repeated calls walk the
//! tables of a file in order.

use crate::config::ParserConfig;
use crate::error::Result;
use crate::models::Curve;
use polars::prelude::*;
use regex::Regex;
use std::io::{BufRead, Cursor};
use tracing::{debug, warn};

/// Reads consecutive curve tables from a positioned stream
#[derive(Debug, Clone)]
pub struct CurveReader {
    config: ParserConfig,
    marker: Regex,
}

impl CurveReader {
    pub fn new(config: &ParserConfig) -> Result<Self> {
        Ok(Self {
            config: config.clone(),
            marker: config.marker_regex()?,
        })
    }

    /// Read one table
    ///
    /// Returns an empty curve when the column-name line is blank or the
    /// stream is exhausted; that is the "no more tables" signal.
    pub fn read_curve<R: BufRead>(&self, reader: &mut R) -> Result<Curve> {
        let column_line = match next_line(reader)? {
            Some(line) if !line.is_empty() => line,
            _ => return Ok(Curve::empty()),
        };

        let raw_units = next_line(reader)?.unwrap_or_default();

        let mut lines = vec![column_line];
        while let Some(line) = next_line(reader)? {
            if self.marker.is_match(&line) {
                debug!("Curve ends at marker line '{}'", line);
                break;
            }
            if line.is_empty() {
                continue;
            }
            lines.push(line);
        }

        let data = self.parse_table(lines)?;
        let keys: Vec<String> = data
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();
        let units = self.split_units(&raw_units, keys.len());

        debug!(
            "Read curve with {} columns and {} rows",
            keys.len(),
            data.height()
        );

        Ok(Curve { keys, units, data })
    }

    /// Read tables until the empty-curve signal
    pub fn read_curves<R: BufRead>(&self, reader: &mut R) -> Result<Vec<Curve>> {
        let mut curves = Vec::new();
        loop {
            let curve = self.read_curve(reader)?;
            if curve.is_empty() {
                break;
            }
            curves.push(curve);
        }
        Ok(curves)
    }

    /// Parse the column line plus body rows; a header-only table gives zero rows
    fn parse_table(&self, lines: Vec<String>) -> Result<DataFrame> {
        let separator = self.config.delimiter;
        let truncate_ragged = self.config.truncate_ragged_lines;
        let mut text = lines.join("\n");
        text.push('\n');

        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(None)
            .with_ignore_errors(self.config.ignore_errors)
            .map_parse_options(|opts| {
                opts.with_separator(separator)
                    .with_truncate_ragged_lines(truncate_ragged)
            })
            .into_reader_with_file_handle(Cursor::new(text.into_bytes()))
            .finish()?;

        Ok(df)
    }

    /// Units line minus the row-index entry, one unit per data column
    fn split_units(&self, raw_units: &str, column_count: usize) -> Vec<String> {
        let mut units: Vec<String> = raw_units
            .split(self.config.delimiter_char())
            .skip(1)
            .map(|unit| unit.trim().to_string())
            .collect();

        let expected = column_count.saturating_sub(1);
        if units.len() != expected {
            warn!(
                "Units line has {} entries for {} data columns; padding or truncating",
                units.len(),
                expected
            );
            units.resize(expected, String::new());
        }
        units
    }
}

/// Raw line including its terminator, `None` at end of stream
///
/// Instrument files are often Windows-1252 rather than UTF-8 (a bare 0xB0
/// for degrees in unit lines), so invalid bytes are replaced instead of
/// failing the read.
pub(crate) fn read_line_lossy<R: BufRead>(reader: &mut R) -> Result<Option<String>> {
    let mut buf = Vec::new();
    if reader.read_until(b'\n', &mut buf)? == 0 {
        return Ok(None);
    }
    Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
}

/// Next line with surrounding whitespace removed, `None` at end of stream
fn next_line<R: BufRead>(reader: &mut R) -> Result<Option<String>> {
    Ok(read_line_lossy(reader)?.map(|line| line.trim().to_string()))
}
