//! EXPLAIN Processor Library
//!
//! A Rust library for reading Gamry EXPLAIN (`.DTA`) files written by
//! potentiostat control software into Polars DataFrames.
//!
//! This library provides tools for:
//! - Parsing the typed key/value header at the top of each file
//! - Extracting every curve table, with column names and units
//! - Experiment accessors that project fixed column sets (impedance, VFP600
//!   chronoamperometry) and derive sample time from the programmed frequency
//! - Exporting curves to Parquet or CSV
//!
//! ```no_run
//! use explain_processor::{ExperimentParser, Impedance};
//! use std::path::Path;
//!
//! # fn main() -> explain_processor::Result<()> {
//! let mut eis = Impedance::default();
//! eis.load(Path::new("EIS_run1.DTA"))?;
//! let df = eis.curve(0)?;
//! println!("{}", df);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod curve;
pub mod error;
pub mod experiments;
pub mod export;
pub mod header;
pub mod models;
pub mod parser;

pub use config::{CompressionAlgorithm, ExportConfig, OutputFormat, ParserConfig};
pub use error::{ExplainError, Result};
pub use experiments::{ExperimentKind, Impedance, Vfp600, open_experiment};
pub use models::{Curve, ExperimentType, ExportStats, Header, HeaderValue};
pub use parser::{ExperimentParser, ExplainFile, GamryParser};
