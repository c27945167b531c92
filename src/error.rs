//! Error handling for EXPLAIN file parsing.
//!
//! Provides error types with context for file access, loaded-state
//! violations, curve addressing and table conversion failures.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExplainError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read file: {path} - {source}")]
    FileOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("DTA file not loaded. Call load() first")]
    NotLoaded,

    #[error("Curve index {index} out of range ({count} curves parsed)")]
    CurveIndexOutOfRange { index: usize, count: usize },

    #[error("Table error: {0}")]
    Table(#[from] polars::error::PolarsError),

    #[error("Invalid header entry '{key}': {reason}")]
    InvalidHeader { key: String, reason: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Export failed for file: {path} - {reason}")]
    Export { path: PathBuf, reason: String },
}

impl ExplainError {
    /// True for errors caused by calling an accessor before `load`
    pub fn is_not_loaded(&self) -> bool {
        matches!(self, ExplainError::NotLoaded)
    }
}

pub type Result<T> = std::result::Result<T, ExplainError>;
