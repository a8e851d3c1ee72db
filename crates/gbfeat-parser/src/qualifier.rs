// Qualifier splitting
//
// Input lines come from the line merger: `gene="xyz"`, `codon_start=1`,
// `pseudo`. The leading slash is already gone.

use crate::error::{ParseError, Result};
use crate::models::Qualifier;

/// Remove at most one double quote from each end
fn trim_quotes(value: &str) -> &str {
    let value = value.strip_prefix('"').unwrap_or(value);
    value.strip_suffix('"').unwrap_or(value)
}

/// Split one merged qualifier line into name and value.
///
/// Leading `=` characters are skipped before the name. A line without `=` is
/// a value-less qualifier (e.g. `pseudo`) and gets an empty value.
pub fn split_qualifier(line: &str) -> Result<Qualifier> {
    let line = line.trim();
    if line.is_empty() {
        return Err(ParseError::malformed_qualifier("empty qualifier line"));
    }

    let begin = line
        .find(|c: char| c != '=')
        .ok_or_else(|| ParseError::malformed_qualifier(format!("no qualifier name in '{line}'")))?;
    let body = &line[begin..];

    let qualifier = match body.split_once('=') {
        Some((name, value)) => Qualifier::new(name, trim_quotes(value.trim())),
        None => Qualifier::new(body, ""),
    };

    Ok(qualifier)
}

/// Split every merged qualifier line, preserving order and repeated names.
///
/// Stops at the first malformed line.
pub fn split<S: AsRef<str>>(lines: &[S]) -> Result<Vec<Qualifier>> {
    lines
        .iter()
        .map(|line| split_qualifier(line.as_ref()))
        .collect()
}
