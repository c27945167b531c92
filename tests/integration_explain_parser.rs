//! Integration tests for EXPLAIN file loading and the experiment accessors
//!
//! Fixtures mirror the layout written by the Gamry Framework: a typed header,
//! then one or more curve tables introduced by `*CURVE` marker lines.

use explain_processor::{
    ExperimentParser, ExplainError, ExplainFile, GamryParser, Impedance, ParserConfig, Vfp600,
};
use std::io::{Cursor, Write};
use std::path::Path;
use tempfile::NamedTempFile;

const EIS_FILE: &str = "EXPLAIN\r\n\
TAG\tEISPOT\r\n\
TITLE\tLABEL\tPotentiostatic EIS\tTest &Identifier\r\n\
DATE\tLABEL\t5/21/2021\tDate\r\n\
TIME\tLABEL\t13:45:10\tTime\r\n\
PSTAT\tPSTAT\tREF600-12345\tPotentiostat\r\n\
FREQINIT\tQUANT\t1.00000E+005\tInitial Freq. (Hz)\r\n\
FREQFINAL\tQUANT\t1.00000E-001\tFinal Freq. (Hz)\r\n\
PTSPERDEC\tQUANT\t10\tPoints/decade\r\n\
NOTES\tNOTES\t1\t&Notes...\r\n\
\tcell 3, 0.1 M KCl\r\n\
OCVCURVE\tTABLE\t3\r\n\
\tPt\tT\tVf\tVm\tAch\tOver\r\n\
\t#\ts\tV vs. Ref.\tV\tV\tbits\r\n\
\t0\t0.25\t-0.101\t-0.101\t0\t...........\r\n\
\t1\t0.5\t-0.102\t-0.102\t0\t...........\r\n\
\t2\t0.75\t-0.103\t-0.103\t0\t...........\r\n\
ZCURVE\tTABLE\r\n\
\tPt\tTime\tFreq\tZreal\tZimag\tZsig\tZmod\tZphz\tIdc\tVdc\tIERange\tT\r\n\
\t#\ts\tHz\tohm\tohm\tV\tohm\tdeg\tA\tV\t#\ts\r\n\
\t0\t3\t100000\t151.2\t-3.1\t1\t151.23\t-1.17\t1.1E-08\t-0.1\t9\t3\r\n\
\t1\t4\t79433\t151.5\t-3.7\t1\t151.55\t-1.40\t1.2E-08\t-0.1\t9\t4\r\n\
\t2\t5\t63096\t151.9\t-4.5\t1\t151.97\t-1.70\t1.3E-08\t-0.1\t9\t5\r\n\
\t3\t6\t50119\t152.4\t-5.6\t1\t152.50\t-2.10\t1.4E-08\t-0.1\t9\t6\r\n";

const CHRONOA_FILE: &str = "EXPLAIN\n\
TAG\tCHRONOA\n\
TITLE\tLABEL\tChronoamperometry Scan\tTest &Identifier\n\
FREQ\tQUANT\t1.0E+002\tSample Frequency (Hz)\n\
CURVE\tTABLE\n\
\tPt\tVoltage\tCurrent\tOver\n\
\t#\tV\tA\tbits\n\
\t0\t0.500\t2.1E-06\t...........\n\
\t1\t0.500\t2.0E-06\t...........\n\
\t2\t0.500\t1.9E-06\t...........\n\
\t3\t0.500\t1.8E-06\t...........\n\
CURVE\tTABLE\n\
\tPt\tVoltage\tCurrent\tOver\n\
\t#\tV\tA\tbits\n\
\t0\t0.000\t-1.0E-06\t...........\n";

fn write_fixture(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_load_eis_file_curves() {
    let file = write_fixture(EIS_FILE);
    let mut parser = GamryParser::new();
    parser.load(file.path()).unwrap();

    assert_eq!(parser.curve_count().unwrap(), 2);
    assert_eq!(
        parser.curve_keys(0).unwrap(),
        &["Pt", "T", "Vf", "Vm", "Ach", "Over"]
    );
    assert_eq!(parser.table(0).unwrap().data.width(), 6);
    assert_eq!(parser.table(0).unwrap().row_count(), 3);

    assert_eq!(parser.curve_keys(1).unwrap().len(), 12);
    assert_eq!(parser.table(1).unwrap().row_count(), 4);

    for index in 0..2 {
        let curve = parser.table(index).unwrap();
        assert_eq!(curve.units.len(), curve.keys.len() - 1);
    }
    assert_eq!(parser.curve_units(0).unwrap()[1], "V vs. Ref.");
    assert_eq!(parser.file_path().unwrap(), Some(file.path()));
}

#[test]
fn test_eis_header_values() {
    let file = write_fixture(EIS_FILE);
    let mut parser = GamryParser::new();
    parser.load(file.path()).unwrap();

    let header = parser.header().unwrap();
    assert_eq!(header.get_str("TAG"), Some("EISPOT"));
    assert_eq!(header.get_str("PSTAT"), Some("REF600-12345"));
    assert_eq!(header.get_f64("FREQINIT"), Some(100000.0));
    assert_eq!(header.get_str("NOTES"), Some("cell 3, 0.1 M KCl"));
    assert_eq!(
        header.timestamp().unwrap().to_string(),
        "2021-05-21 13:45:10"
    );
}

#[test]
fn test_impedance_accessor() {
    let file = write_fixture(EIS_FILE);
    let mut eis = Impedance::default();
    eis.load(file.path()).unwrap();

    let df = eis.curve(1).unwrap();
    let names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|n| n.to_string())
        .collect();
    assert_eq!(names, vec!["T", "Freq", "Zreal", "Zimag", "Zmod", "Zphz"]);
    assert_eq!(df.height(), 4);

    let zreal = df.column("Zreal").unwrap().f64().unwrap();
    assert_eq!(zreal.get(3), Some(152.4));
}

#[test]
fn test_impedance_curve_out_of_range() {
    let file = write_fixture(EIS_FILE);
    let mut eis = Impedance::default();
    eis.load(file.path()).unwrap();

    match eis.curve(99).unwrap_err() {
        ExplainError::CurveIndexOutOfRange { index, count } => {
            assert_eq!(index, 99);
            assert_eq!(count, 2);
        }
        other => panic!("Expected CurveIndexOutOfRange, got {:?}", other),
    }
}

#[test]
fn test_accessors_before_load() {
    let eis = Impedance::default();
    assert!(matches!(eis.curve(0), Err(ExplainError::NotLoaded)));

    let ca = Vfp600::default();
    assert!(matches!(ca.curve(0), Err(ExplainError::NotLoaded)));
    assert!(matches!(ca.sample_count(0), Err(ExplainError::NotLoaded)));
    assert!(matches!(ca.sample_period(), Err(ExplainError::NotLoaded)));
}

#[test]
fn test_vfp600_accessor() {
    let file = write_fixture(CHRONOA_FILE);
    let mut ca = Vfp600::default();
    ca.load(file.path()).unwrap();

    assert_eq!(ca.sample_period().unwrap(), 1.0 / 100.0);
    assert_eq!(ca.curve_count().unwrap(), 2);
    assert_eq!(ca.sample_count(0).unwrap(), 4);
    assert_eq!(ca.sample_count(1).unwrap(), 1);

    let df = ca.curve(0).unwrap();
    assert_eq!(df.width(), 3);
    let t = df.column("T").unwrap().f64().unwrap();
    assert_eq!(t.get(3), Some(3.0 * (1.0 / 100.0)));

    let current = df.column("Current").unwrap().f64().unwrap();
    assert_eq!(current.get(0), Some(2.1e-6));
}

#[test]
fn test_missing_file_is_file_error() {
    let mut ca = Vfp600::default();
    let result = ca.load(Path::new("/no/such/dir/CHRONOA.DTA"));

    match result.unwrap_err() {
        ExplainError::FileOpen { path, .. } => {
            assert_eq!(path, Path::new("/no/such/dir/CHRONOA.DTA"))
        }
        other => panic!("Expected FileOpen, got {:?}", other),
    }
    assert!(!ca.is_loaded());
}

#[test]
fn test_reload_replaces_contents() {
    let eis_file = write_fixture(EIS_FILE);
    let ca_file = write_fixture(CHRONOA_FILE);

    let mut parser = GamryParser::new();
    parser.load(eis_file.path()).unwrap();
    assert_eq!(parser.header().unwrap().get_str("TAG"), Some("EISPOT"));

    parser.load(ca_file.path()).unwrap();
    assert_eq!(parser.header().unwrap().get_str("TAG"), Some("CHRONOA"));
    assert_eq!(parser.sample_count(0).unwrap(), 4);
}

#[test]
fn test_table_without_trailing_marker_reads_to_eof() {
    let parsed = ExplainFile::from_reader(
        Cursor::new(
            "TAG\tCHRONOA\nCURVE\tTABLE\nPt\tVoltage\tCurrent\n#\tV\tA\n0\t1\t2\n1\t3\t4\n2\t5\t6"
                .as_bytes(),
        ),
        &ParserConfig::default(),
    )
    .unwrap();

    assert_eq!(parsed.curve_count(), 1);
    assert_eq!(parsed.curve(0).unwrap().row_count(), 3);
}

#[test]
fn test_windows_1252_degree_unit() {
    let mut bytes = b"EXPLAIN\r\nTAG\tEISPOT\r\nZCURVE\tTABLE\r\n".to_vec();
    bytes.extend_from_slice(b"\tPt\tFreq\tZphz\r\n\t#\tHz\t\xB0\r\n\t0\t1000\t-1.5\r\n");
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(&bytes).unwrap();
    file.flush().unwrap();

    let mut parser = GamryParser::new();
    parser.load(file.path()).unwrap();

    assert_eq!(parser.curve_count().unwrap(), 1);
    assert_eq!(parser.curve_units(0).unwrap(), &["Hz", "\u{FFFD}"]);
    let zphz = parser.table(0).unwrap().data.column("Zphz").unwrap().f64().unwrap();
    assert_eq!(zphz.get(0), Some(-1.5));
}

#[test]
fn test_file_with_header_only() {
    let parsed = ExplainFile::from_reader(
        Cursor::new("EXPLAIN\nTAG\tCHRONOA\nFREQ\tQUANT\t10\tHz\n".as_bytes()),
        &ParserConfig::default(),
    )
    .unwrap();

    assert_eq!(parsed.curve_count(), 0);
    assert_eq!(parsed.header().sample_period(), 0.1);
}
