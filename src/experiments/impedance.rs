//! Potentiostatic EIS accessor.

use crate::constants::IMPEDANCE_COLUMNS;
use crate::error::Result;
use crate::parser::{ExperimentParser, GamryParser};
use polars::prelude::DataFrame;

/// Potentiostatic impedance experiment (`TAG EISPOT`)
///
/// [`curve`](ExperimentParser::curve) returns, in order:
/// - `T`: time, in seconds (or timestamps with `to_timestamp`)
/// - `Freq`: frequency, in Hz
/// - `Zreal`, `Zimag`: real and imaginary impedance, in ohms
/// - `Zmod`: impedance magnitude, in ohms
/// - `Zphz`: impedance phase angle, in degrees
#[derive(Debug, Clone, Default)]
pub struct Impedance {
    parser: GamryParser,
}

impl Impedance {
    pub fn new(parser: GamryParser) -> Self {
        Self { parser }
    }
}

impl From<GamryParser> for Impedance {
    fn from(parser: GamryParser) -> Self {
        Self::new(parser)
    }
}

impl ExperimentParser for Impedance {
    fn parser(&self) -> &GamryParser {
        &self.parser
    }

    fn parser_mut(&mut self) -> &mut GamryParser {
        &mut self.parser
    }

    fn curve(&self, index: usize) -> Result<DataFrame> {
        Ok(self.table(index)?.data.select(IMPEDANCE_COLUMNS)?)
    }
}
