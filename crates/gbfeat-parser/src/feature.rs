// Feature assembly: raw block -> Feature

use crate::error::{ParseError, Result};
use crate::location::parse_location;
use crate::merge::merge;
use crate::models::Feature;
use crate::qualifier::split;

/// Split the key/location line into the key and the remaining location text.
///
/// The location text keeps its leading whitespace; the location parser
/// ignores it.
fn split_header(header: &str) -> Result<(&str, &str)> {
    let begin_key = header
        .find(|c: char| !c.is_ascii_whitespace())
        .ok_or_else(|| ParseError::malformed_block("feature block has no key line"))?;
    let end_key = header[begin_key..]
        .find(|c: char| c.is_ascii_whitespace())
        .map_or(header.len(), |offset| begin_key + offset);

    Ok((&header[begin_key..end_key], &header[end_key..]))
}

/// Parse one feature block with id 0.
///
/// See [`assemble_with_id`].
pub fn assemble<S: AsRef<str>>(block: &[S], accession: &str) -> Result<Feature> {
    assemble_with_id(block, accession, 0)
}

/// Parse one feature block: merge its lines, then parse the location and the
/// qualifiers.
///
/// Errors from the merger, location parser and qualifier splitter are
/// returned unchanged.
pub fn assemble_with_id<S: AsRef<str>>(block: &[S], accession: &str, id: usize) -> Result<Feature> {
    let (header, qualifier_lines) = merge(block)?.into_parts();
    let (key, location_text) = split_header(&header)?;

    let location = parse_location(location_text, accession)?;
    let qualifiers = split(&qualifier_lines)?;

    tracing::debug!(
        id,
        key,
        qualifiers = qualifiers.len(),
        "Assembled feature"
    );

    Ok(Feature {
        id,
        key: key.to_string(),
        location,
        qualifiers,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::models::{Location, Qualifier};

    #[test]
    fn test_split_header() {
        assert_eq!(
            split_header("CDS             1..206").unwrap(),
            ("CDS", "             1..206")
        );
        assert_eq!(split_header("  gene 5").unwrap(), ("gene", " 5"));
        assert_eq!(split_header("source").unwrap(), ("source", ""));
        assert!(split_header("   ").is_err());
    }

    #[test]
    fn test_assemble_key_and_location() {
        let feature = assemble(&["     CDS             1..206"], "").unwrap();
        assert_eq!(feature.id, 0);
        assert_eq!(feature.key, "CDS");
        assert_eq!(feature.location, Location::span(1, 206));
        assert!(feature.qualifiers.is_empty());
    }

    #[test]
    fn test_assemble_with_qualifier() {
        let feature = assemble(
            &["     CDS             1..206", "                     /gene=\"xyz\""],
            "",
        )
        .unwrap();
        assert_eq!(feature.qualifiers, vec![Qualifier::new("gene", "xyz")]);
    }

    #[test]
    fn test_assemble_with_id() {
        let feature = assemble_with_id(&["     gene            complement(3..9)"], "NC_1", 7).unwrap();
        assert_eq!(feature.id, 7);
        assert_eq!(feature.location, Location::complement(Location::span(3, 9)));
    }

    #[test]
    fn test_assemble_propagates_sub_parser_errors() {
        assert!(matches!(
            assemble::<&str>(&[], ""),
            Err(ParseError::MalformedBlock(_))
        ));
        assert!(matches!(
            assemble(&["     CDS             join(1..5"], ""),
            Err(ParseError::LocationSyntax { .. })
        ));
        assert!(matches!(
            assemble(&["     source"], ""),
            Err(ParseError::LocationSyntax { .. })
        ));
        assert!(matches!(
            assemble(&["     CDS             1..5", "                     /="], ""),
            Err(ParseError::MalformedQualifier(_))
        ));
    }

    #[test]
    fn test_assemble_without_key_line() {
        let result = assemble(&["                     /translation=\"MKT"], "");
        assert!(matches!(result, Err(ParseError::MalformedBlock(_))));
    }
}
