// Line merging for raw feature blocks
//
// A feature block arrives as physical lines:
//
//      CDS             complement(join(100..200,
//                      300..400))
//                      /gene="abc"
//                      /note="spans two
//                      lines"
//
// and leaves as one logical line for the key/location plus one per qualifier.
// EMBL blocks carry an `FT` row tag in front of every line.

use crate::error::{ParseError, Result};
use serde::{Deserialize, Serialize};

/// Row tag used by EMBL feature tables
const ROW_TAG: &str = "FT";

/// Qualifier whose continuation lines are concatenated without a separator
const TRANSLATION_PREFIX: &str = "translation=";

/// Logical lines of one feature: the key/location line and one line per
/// qualifier, with row tags, indentation, qualifier slashes and trailing
/// whitespace removed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MergedLines {
    header: String,
    qualifiers: Vec<String>,
}

impl MergedLines {
    /// The key/location line
    pub fn header(&self) -> &str {
        &self.header
    }

    /// Qualifier lines in `name=value` form
    pub fn qualifiers(&self) -> &[String] {
        &self.qualifiers
    }

    /// Always `1 + qualifiers().len()`
    pub fn len(&self) -> usize {
        1 + self.qualifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn into_parts(self) -> (String, Vec<String>) {
        (self.header, self.qualifiers)
    }
}

/// Remove a leading `FT` row tag, but only when it is a separate token.
fn strip_row_tag(line: &str) -> &str {
    match line.strip_prefix(ROW_TAG) {
        Some(rest) if rest.is_empty() || rest.starts_with(char::is_whitespace) => rest,
        _ => line,
    }
}

/// If `line` opens a new qualifier (optional row tag, indentation, `/`),
/// return the text after the slash.
fn qualifier_start(line: &str) -> Option<&str> {
    let untagged = strip_row_tag(line);
    let content = untagged.trim_start();
    if content.len() == untagged.len() {
        // at least one whitespace character must precede the slash
        return None;
    }
    content.strip_prefix('/')
}

fn continuation_text(line: &str) -> &str {
    strip_row_tag(line).trim()
}

/// Reassemble the physical lines of one feature into logical lines.
///
/// Continuation lines are appended to the line they continue with a single
/// space, except inside `/translation`, where sequence text is concatenated
/// as is.
pub fn merge<S: AsRef<str>>(lines: &[S]) -> Result<MergedLines> {
    if lines.is_empty() {
        return Err(ParseError::malformed_block("feature block contains no lines"));
    }

    let mut logical: Vec<String> = Vec::with_capacity(lines.len());
    let mut current = String::new();

    for line in lines {
        let line = line.as_ref();

        if let Some(rest) = qualifier_start(line) {
            logical.push(std::mem::take(&mut current));
            current.push_str(rest.trim_end());
            continue;
        }

        let text = continuation_text(line);
        if text.is_empty() {
            continue;
        }
        if !current.is_empty() && !current.starts_with(TRANSLATION_PREFIX) {
            current.push(' ');
        }
        current.push_str(text);
    }
    logical.push(current);

    let mut logical = logical.into_iter();
    let header = logical.next().unwrap_or_default();
    let merged = MergedLines {
        header,
        qualifiers: logical.collect(),
    };

    tracing::trace!(
        physical = lines.len(),
        qualifiers = merged.qualifiers.len(),
        "Merged feature block"
    );

    Ok(merged)
}
