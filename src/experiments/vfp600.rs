//! Chronoamperometry accessor for files written by the VFP600 software.

use crate::constants::{TIME_COLUMN, VFP600_COLUMNS};
use crate::error::Result;
use crate::parser::{ExperimentParser, GamryParser};
use polars::prelude::*;

/// Chronoamperometry experiment (`TAG CHRONOA`)
///
/// VFP600 tables carry no usable time column, so `T` is rebuilt from the
/// row position and the programmed sample frequency.
#[derive(Debug, Clone, Default)]
pub struct Vfp600 {
    parser: GamryParser,
}

impl Vfp600 {
    pub fn new(parser: GamryParser) -> Self {
        Self { parser }
    }

    /// Programmed sample period in seconds, `1 / FREQ`
    ///
    /// Returns 0 when FREQ is missing, non-numeric or zero.
    pub fn sample_period(&self) -> Result<f64> {
        Ok(self.header()?.sample_period())
    }
}

impl From<GamryParser> for Vfp600 {
    fn from(parser: GamryParser) -> Self {
        Self::new(parser)
    }
}

impl ExperimentParser for Vfp600 {
    fn parser(&self) -> &GamryParser {
        &self.parser
    }

    fn parser_mut(&mut self) -> &mut GamryParser {
        &mut self.parser
    }

    /// `T` (s), `Voltage` (V) and `Current` (A) for curve `index`
    fn curve(&self, index: usize) -> Result<DataFrame> {
        let curve = self.table(index)?;
        let period = self.sample_period()?;

        let times: Vec<f64> = (0..curve.row_count())
            .map(|row| row as f64 * period)
            .collect();

        let mut df = curve.data.clone();
        df.with_column(Series::new(TIME_COLUMN.into(), times))?;
        Ok(df.select(VFP600_COLUMNS)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExplainError;
    use std::io::Cursor;

    fn chronoa(freq_line: &str) -> String {
        format!(
            "EXPLAIN\nTAG\tCHRONOA\n{}CURVE\tTABLE\n\
\tPt\tVoltage\tCurrent\tOver\n\
\t#\tV\tA\tbits\n\
\t0\t0.10\t1.0E-06\t...........\n\
\t1\t0.11\t1.5E-06\t...........\n\
\t2\t0.12\t2.0E-06\t...........\n",
            freq_line
        )
    }

    fn loaded(freq_line: &str) -> Vfp600 {
        let mut ca = Vfp600::default();
        ca.parser_mut()
            .load_reader(Cursor::new(chronoa(freq_line).into_bytes()))
            .unwrap();
        ca
    }

    #[test]
    fn test_sample_period_from_freq() {
        let ca = loaded("FREQ\tQUANT\t4.0\tSample Frequency (Hz)\n");
        assert_eq!(ca.sample_period().unwrap(), 1.0 / 4.0);
    }

    #[test]
    fn test_sample_period_missing_or_zero_freq() {
        assert_eq!(loaded("").sample_period().unwrap(), 0.0);
        assert_eq!(
            loaded("FREQ\tQUANT\t0\tSample Frequency (Hz)\n")
                .sample_period()
                .unwrap(),
            0.0
        );
    }

    #[test]
    fn test_sample_period_before_load() {
        let ca = Vfp600::default();
        assert!(matches!(ca.sample_period(), Err(ExplainError::NotLoaded)));
    }

    #[test]
    fn test_curve_derives_time() {
        let ca = loaded("FREQ\tQUANT\t4.0\tSample Frequency (Hz)\n");
        let df = ca.curve(0).unwrap();

        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|n| n.to_string())
            .collect();
        assert_eq!(names, vec!["T", "Voltage", "Current"]);

        let t = df.column("T").unwrap().f64().unwrap();
        assert_eq!(t.get(0), Some(0.0));
        assert_eq!(t.get(1), Some(0.25));
        assert_eq!(t.get(2), Some(0.5));
    }

    #[test]
    fn test_curve_leaves_stored_table_untouched() {
        let ca = loaded("FREQ\tQUANT\t4.0\tSample Frequency (Hz)\n");
        ca.curve(0).unwrap();

        assert!(!ca.curve_keys(0).unwrap().iter().any(|k| k == "T"));
    }

    #[test]
    fn test_zero_period_gives_zero_time() {
        let df = loaded("").curve(0).unwrap();
        let t = df.column("T").unwrap().f64().unwrap();
        assert!(t.into_iter().all(|v| v == Some(0.0)));
    }

    #[test]
    fn test_sample_count() {
        let ca = loaded("FREQ\tQUANT\t4.0\tSample Frequency (Hz)\n");
        assert_eq!(ca.sample_count(0).unwrap(), 3);
        assert!(ca.sample_count(1).is_err());
    }
}
