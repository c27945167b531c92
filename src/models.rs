//! Core data structures for EXPLAIN file processing.
//!
//! Defines experiment types, typed header values, the header mapping,
//! parsed curve tables and export statistics used throughout the library.

use crate::constants::{
    HEADER_DATE_FORMAT, HEADER_TIME_FORMAT, TAG_CHRONOA, TAG_EISPOT, header_keys,
};
use crate::error::{ExplainError, Result};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

/// Experiment types recognised from the header `TAG`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExperimentType {
    /// Potentiostatic electrochemical impedance spectroscopy
    Impedance,
    /// Chronoamperometry recorded through the VFP600 software
    Chronoamperometry,
    /// Any other script tag, kept verbatim
    Other(String),
}

impl ExperimentType {
    /// Detect experiment type from a header TAG value
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim() {
            TAG_EISPOT => ExperimentType::Impedance,
            TAG_CHRONOA => ExperimentType::Chronoamperometry,
            other => ExperimentType::Other(other.to_string()),
        }
    }
}

impl fmt::Display for ExperimentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExperimentType::Impedance => write!(f, "Impedance ({})", TAG_EISPOT),
            ExperimentType::Chronoamperometry => write!(f, "Chronoamperometry ({})", TAG_CHRONOA),
            ExperimentType::Other(tag) => write!(f, "{}", tag),
        }
    }
}

/// A typed value from one header line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HeaderValue {
    Text(String),
    Number(f64),
    Integer(i64),
    Toggle(bool),
    TwoParam { enabled: bool, start: f64, finish: f64 },
}

impl HeaderValue {
    /// Numeric view of the value, if it has one
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            HeaderValue::Number(v) => Some(*v),
            HeaderValue::Integer(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            HeaderValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            HeaderValue::Toggle(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for HeaderValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderValue::Text(s) => write!(f, "{}", s),
            HeaderValue::Number(v) => write!(f, "{}", v),
            HeaderValue::Integer(v) => write!(f, "{}", v),
            HeaderValue::Toggle(b) => write!(f, "{}", if *b { "T" } else { "F" }),
            HeaderValue::TwoParam {
                enabled,
                start,
                finish,
            } => write!(
                f,
                "{} {} .. {}",
                if *enabled { "on" } else { "off" },
                start,
                finish
            ),
        }
    }
}

/// Experiment metadata read from the leading lines of a DTA file
///
/// Keys keep the order in which they first appeared in the file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Header {
    values: HashMap<String, HeaderValue>,
    order: Vec<String>,
}

impl Header {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a value; a replaced key keeps its position
    pub fn insert(&mut self, key: impl Into<String>, value: HeaderValue) {
        let key = key.into();
        if !self.values.contains_key(&key) {
            self.order.push(key.clone());
        }
        self.values.insert(key, value);
    }

    pub fn get(&self, key: &str) -> Option<&HeaderValue> {
        self.values.get(key)
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(HeaderValue::as_f64)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(HeaderValue::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Entries in file order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &HeaderValue)> {
        self.order
            .iter()
            .filter_map(|key| self.values.get(key).map(|value| (key.as_str(), value)))
    }

    /// Experiment type from the `TAG` entry
    pub fn experiment_type(&self) -> Option<ExperimentType> {
        self.get_str(header_keys::TAG).map(ExperimentType::from_tag)
    }

    /// Sampling period in seconds: `1 / FREQ`, or 0 when FREQ is missing or zero
    pub fn sample_period(&self) -> f64 {
        match self.get_f64(header_keys::FREQ) {
            Some(freq) if freq != 0.0 && freq.is_finite() => 1.0 / freq,
            _ => 0.0,
        }
    }

    /// Acquisition start combined from the `DATE` and `TIME` entries
    pub fn timestamp(&self) -> Result<NaiveDateTime> {
        let date = self.required_text(header_keys::DATE)?;
        let time = self.required_text(header_keys::TIME)?;

        let date = NaiveDate::parse_from_str(date.trim(), HEADER_DATE_FORMAT).map_err(|e| {
            ExplainError::InvalidHeader {
                key: header_keys::DATE.to_string(),
                reason: format!("'{}' is not a {} date: {}", date, HEADER_DATE_FORMAT, e),
            }
        })?;
        let time = NaiveTime::parse_from_str(time.trim(), HEADER_TIME_FORMAT).map_err(|e| {
            ExplainError::InvalidHeader {
                key: header_keys::TIME.to_string(),
                reason: format!("'{}' is not a {} time: {}", time, HEADER_TIME_FORMAT, e),
            }
        })?;

        Ok(NaiveDateTime::new(date, time))
    }

    fn required_text(&self, key: &str) -> Result<&str> {
        self.get_str(key).ok_or_else(|| ExplainError::InvalidHeader {
            key: key.to_string(),
            reason: "missing or not a text value".to_string(),
        })
    }
}

/// One table segment of a DTA file
#[derive(Debug, Clone)]
pub struct Curve {
    /// Column names from the column-name line
    pub keys: Vec<String>,
    /// Unit labels, one per column after the row-index column
    pub units: Vec<String>,
    pub data: DataFrame,
}

impl Curve {
    /// Result of reading past the last table
    pub fn empty() -> Self {
        Self {
            keys: Vec::new(),
            units: Vec::new(),
            data: DataFrame::empty(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Number of data rows
    pub fn row_count(&self) -> usize {
        self.data.height()
    }
}

/// Export statistics
#[derive(Debug, Default)]
pub struct ExportStats {
    pub files_processed: usize,
    pub files_failed: usize,
    pub curves_written: usize,
    pub total_rows: usize,
    pub outputs: Vec<PathBuf>,
}

impl ExportStats {
    /// Fold another run's statistics into this one
    pub fn merge(&mut self, other: ExportStats) {
        self.files_processed += other.files_processed;
        self.files_failed += other.files_failed;
        self.curves_written += other.curves_written;
        self.total_rows += other.total_rows;
        self.outputs.extend(other.outputs);
    }
}
