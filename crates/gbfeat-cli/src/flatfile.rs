//! Flat file reader
//!
//! Cuts GenBank and EMBL flat files into records and each record's feature
//! table into per-feature line blocks. Only the layout is interpreted here;
//! the lines of a block are handed to the parser untouched.
//!
//! GenBank feature tables start at the `FEATURES` line and end at the first
//! line that is not indented. EMBL feature tables are the `FT` lines. In both
//! formats a feature starts where column 6 (index 5) holds a key and the
//! columns before it, after the optional `FT` tag, are blank.

use serde::Serialize;
use tracing::debug;

/// Column where feature keys start
const KEY_COLUMN: usize = 5;

/// One entry of a flat file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FlatFileRecord {
    /// Primary accession (empty when the entry has none)
    pub accession: String,
    /// Raw lines of each feature, in file order
    pub blocks: Vec<Vec<String>>,
}

impl FlatFileRecord {
    pub fn feature_count(&self) -> usize {
        self.blocks.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Header,
    GenbankFeatures,
}

/// Read every record in `text`.
///
/// Records end at `//`; trailing content without a terminator still forms a
/// record. Entries with neither an accession nor features are dropped.
pub fn read_records(text: &str) -> Vec<FlatFileRecord> {
    let mut records = Vec::new();
    let mut current = FlatFileRecord::default();
    let mut section = Section::Header;

    for line in text.lines() {
        if line.starts_with("//") {
            flush(&mut records, &mut current);
            section = Section::Header;
            continue;
        }

        if section == Section::GenbankFeatures {
            if line.trim().is_empty() {
                continue;
            }
            if line.starts_with(' ') {
                push_feature_line(&mut current, line);
                continue;
            }
            section = Section::Header;
        }

        if let Some(rest) = line.strip_prefix("ACCESSION") {
            set_accession(&mut current, rest);
        } else if line.starts_with("FEATURES") {
            section = Section::GenbankFeatures;
        } else if let Some(rest) = line.strip_prefix("AC ") {
            set_accession(&mut current, rest);
        } else if is_row_tagged(line, "FT") {
            push_feature_line(&mut current, line);
        }
    }

    flush(&mut records, &mut current);
    records
}

/// Only the first accession of a record counts
fn set_accession(record: &mut FlatFileRecord, rest: &str) {
    if !record.accession.is_empty() {
        return;
    }
    if let Some(first) = rest.split_whitespace().next() {
        record.accession = first.trim_end_matches(';').to_string();
    }
}

fn is_row_tagged(line: &str, tag: &str) -> bool {
    line.strip_prefix(tag)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with(char::is_whitespace))
}

/// A feature key line: blank columns 2..5 and a key at column 5
fn is_key_line(line: &str) -> bool {
    let bytes = line.as_bytes();
    bytes.len() > KEY_COLUMN
        && bytes[2..KEY_COLUMN].iter().all(|b| *b == b' ')
        && !bytes[KEY_COLUMN].is_ascii_whitespace()
}

fn push_feature_line(record: &mut FlatFileRecord, line: &str) {
    if is_key_line(line) {
        record.blocks.push(vec![line.to_string()]);
        return;
    }

    match record.blocks.last_mut() {
        Some(block) => block.push(line.to_string()),
        None => debug!(line, "Skipping feature table line before the first feature key"),
    }
}

fn flush(records: &mut Vec<FlatFileRecord>, current: &mut FlatFileRecord) {
    let record = std::mem::take(current);
    if record.accession.is_empty() && record.blocks.is_empty() {
        return;
    }
    debug!(
        accession = %record.accession,
        features = record.blocks.len(),
        "Read flat file record"
    );
    records.push(record);
}
