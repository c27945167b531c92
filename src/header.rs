//! EXPLAIN header parsing and metadata extraction.
//!
//! Reads `KEY<TAB>TYPE<TAB>VALUE` lines from the top of a DTA file until the
//! first curve marker, typing each value from its TYPE field. The marker
//! line is consumed so the stream is left at the first table's column names.

use crate::config::ParserConfig;
use crate::constants::{header_keys, header_types};
use crate::curve::read_line_lossy;
use crate::error::Result;
use crate::models::{Header, HeaderValue};
use regex::Regex;
use std::io::BufRead;
use tracing::{debug, warn};

/// Read header entries up to and including the first curve marker line
pub fn read_header<R: BufRead>(reader: &mut R, config: &ParserConfig) -> Result<Header> {
    let marker = config.marker_regex()?;
    let delimiter = config.delimiter_char();
    let mut header = Header::new();

    loop {
        let Some(line) = read_line_lossy(reader)? else {
            debug!("Reached end of file before any curve marker");
            break;
        };

        let fields: Vec<&str> = line
            .trim_end_matches(['\r', '\n'])
            .split(delimiter)
            .collect();

        if is_curve_marker(&marker, fields[0]) {
            debug!("Header ends at marker line '{}'", line.trim());
            break;
        }

        if fields.len() < 2 {
            continue;
        }

        let key = fields[0].trim();
        if key.is_empty() {
            continue;
        }

        if key == header_keys::NOTES {
            let notes = read_notes(reader, &fields)?;
            header.insert(key, HeaderValue::Text(notes));
            continue;
        }

        if let Some(value) = parse_entry(key, &fields) {
            header.insert(key, value);
        }
    }

    debug!("Parsed {} header entries", header.len());
    Ok(header)
}

fn is_curve_marker(marker: &Regex, first_field: &str) -> bool {
    marker.is_match(first_field.trim())
}

/// Type one header line
fn parse_entry(key: &str, fields: &[&str]) -> Option<HeaderValue> {
    if key == header_keys::TAG {
        return Some(HeaderValue::Text(fields[1].trim().to_string()));
    }

    let kind = fields[1].trim();
    let raw = fields.get(2).map(|v| v.trim())?;

    let value = match kind {
        header_types::LABEL | header_types::PSTAT => HeaderValue::Text(raw.to_string()),
        header_types::QUANT | header_types::POTEN => match raw.parse::<f64>() {
            Ok(v) => HeaderValue::Number(v),
            Err(_) => {
                warn!("Header {} has non-numeric {} value '{}'", key, kind, raw);
                HeaderValue::Text(raw.to_string())
            }
        },
        header_types::IQUANT | header_types::SELECTOR => match raw.parse::<i64>() {
            Ok(v) => HeaderValue::Integer(v),
            Err(_) => {
                warn!("Header {} has non-integer {} value '{}'", key, kind, raw);
                HeaderValue::Text(raw.to_string())
            }
        },
        header_types::TOGGLE => HeaderValue::Toggle(raw == "T"),
        header_types::TWOPARAM => parse_two_param(key, fields),
        _ => HeaderValue::Text(raw.to_string()),
    };

    Some(value)
}

/// `KEY TWOPARAM enable start finish`
fn parse_two_param(key: &str, fields: &[&str]) -> HeaderValue {
    let number = |index: usize| {
        fields
            .get(index)
            .and_then(|v| v.trim().parse::<f64>().ok())
    };

    match (number(3), number(4)) {
        (Some(start), Some(finish)) => HeaderValue::TwoParam {
            enabled: fields[2].trim() == "T",
            start,
            finish,
        },
        _ => {
            warn!("Could not parse TWOPARAM header {}: {:?}", key, fields);
            HeaderValue::Text(fields[2..].join(" ").trim().to_string())
        }
    }
}

/// The NOTES value is a line count; gather that many following lines
fn read_notes<R: BufRead>(reader: &mut R, fields: &[&str]) -> Result<String> {
    let count = fields
        .get(2)
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(0);

    let mut notes = Vec::with_capacity(count);
    for _ in 0..count {
        let Some(line) = read_line_lossy(reader)? else {
            warn!("File ended inside NOTES block ({} of {} lines)", notes.len(), count);
            break;
        };
        notes.push(line.trim().to_string());
    }

    Ok(notes.join("\n"))
}
