//! Experiment-specific accessors
//!
//! Each accessor wraps a [`GamryParser`] and projects a fixed column subset
//! out of the parsed curves:
//! - [`impedance`] - potentiostatic EIS (`EISPOT`)
//! - [`vfp600`] - chronoamperometry recorded by VFP600 (`CHRONOA`)

pub mod impedance;
pub mod vfp600;

pub use impedance::Impedance;
pub use vfp600::Vfp600;

use crate::config::ParserConfig;
use crate::error::{ExplainError, Result};
use crate::models::ExperimentType;
use crate::parser::{ExperimentParser, GamryParser};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

/// Which accessor to apply to a loaded file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExperimentKind {
    /// Pick from the header TAG, falling back to raw tables
    Auto,
    /// All columns, no projection
    Raw,
    Impedance,
    Vfp600,
}

impl FromStr for ExperimentKind {
    type Err = ExplainError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(ExperimentKind::Auto),
            "raw" => Ok(ExperimentKind::Raw),
            "impedance" | "eis" | "eispot" => Ok(ExperimentKind::Impedance),
            "vfp600" | "chronoa" => Ok(ExperimentKind::Vfp600),
            _ => Err(ExplainError::Configuration {
                message: format!(
                    "Unknown experiment kind: {} (expected auto, raw, impedance or vfp600)",
                    s
                ),
            }),
        }
    }
}

impl ExperimentKind {
    /// Resolve `Auto` against a header experiment type
    pub fn resolve(self, detected: Option<&ExperimentType>) -> Self {
        match (self, detected) {
            (ExperimentKind::Auto, Some(ExperimentType::Impedance)) => ExperimentKind::Impedance,
            (ExperimentKind::Auto, Some(ExperimentType::Chronoamperometry)) => {
                ExperimentKind::Vfp600
            }
            (ExperimentKind::Auto, _) => ExperimentKind::Raw,
            (kind, _) => kind,
        }
    }
}

/// Load a file and wrap it in the accessor for `kind`
pub fn open_experiment(
    path: &Path,
    config: &ParserConfig,
    kind: ExperimentKind,
) -> Result<Box<dyn ExperimentParser>> {
    let mut parser = GamryParser::with_config(config.clone());
    parser.load_file(path)?;

    let detected = parser.experiment_type()?;
    let kind = kind.resolve(detected.as_ref());
    debug!("Opening {} as {:?}", path.display(), kind);

    let experiment: Box<dyn ExperimentParser> = match kind {
        ExperimentKind::Impedance => Box::new(Impedance::from(parser)),
        ExperimentKind::Vfp600 => Box::new(Vfp600::from(parser)),
        ExperimentKind::Raw | ExperimentKind::Auto => Box::new(parser),
    };
    Ok(experiment)
}
