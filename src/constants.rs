//! Format constants for Gamry EXPLAIN files
//!
//! Header keys, type tags, column names and defaults shared by the
//! readers, the experiment accessors and the CLI.

// =============================================================================
// File Layout
// =============================================================================

/// Field delimiter used by header lines and table bodies
pub const DEFAULT_DELIMITER: u8 = b'\t';

/// Marker that terminates the header and separates curve tables
pub const CURVE_MARKER: &str = "CURVE";

/// File extension written by the Gamry Framework software
pub const DTA_EXTENSION: &str = "DTA";

// =============================================================================
// Header Keys and Types
// =============================================================================

/// Header keys with special meaning to this crate
pub mod header_keys {
    /// Experiment script tag (EISPOT, CHRONOA, ...)
    pub const TAG: &str = "TAG";

    /// Programmed sampling frequency in Hz
    pub const FREQ: &str = "FREQ";

    /// Free-form notes block; value is the number of following lines
    pub const NOTES: &str = "NOTES";

    /// Acquisition date, `%m/%d/%Y`
    pub const DATE: &str = "DATE";

    /// Acquisition time, `%H:%M:%S`
    pub const TIME: &str = "TIME";
}

/// Type tags in the second field of a header line
pub mod header_types {
    pub const LABEL: &str = "LABEL";
    pub const PSTAT: &str = "PSTAT";
    pub const QUANT: &str = "QUANT";
    pub const POTEN: &str = "POTEN";
    pub const IQUANT: &str = "IQUANT";
    pub const SELECTOR: &str = "SELECTOR";
    pub const TOGGLE: &str = "TOGGLE";
    pub const TWOPARAM: &str = "TWOPARAM";
}

/// Header date format
pub const HEADER_DATE_FORMAT: &str = "%m/%d/%Y";

/// Header time format
pub const HEADER_TIME_FORMAT: &str = "%H:%M:%S";

// =============================================================================
// Experiment Tags and Columns
// =============================================================================

/// TAG value for potentiostatic EIS
pub const TAG_EISPOT: &str = "EISPOT";

/// TAG value for chronoamperometry (VFP600)
pub const TAG_CHRONOA: &str = "CHRONOA";

/// Time column present in most curve tables
pub const TIME_COLUMN: &str = "T";

/// Columns returned by the impedance accessor, in order
pub const IMPEDANCE_COLUMNS: [&str; 6] = ["T", "Freq", "Zreal", "Zimag", "Zmod", "Zphz"];

/// Columns returned by the chronoamperometry accessor, in order
pub const VFP600_COLUMNS: [&str; 3] = ["T", "Voltage", "Current"];

// =============================================================================
// Export Defaults
// =============================================================================

/// Suffix inserted between the file stem and curve number on export
pub const CURVE_FILE_SUFFIX: &str = "_curve";
