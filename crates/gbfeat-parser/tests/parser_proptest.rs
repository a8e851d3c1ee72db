//! Property-based tests for the feature table parsers
//!
//! - Rendering a parsed location and parsing it again gives the same value
//! - Single-line qualifiers split into their name and unquoted value
//! - Continuation lines join with one space, or none inside `/translation`

use gbfeat_parser::{merge, parse_location, split_qualifier, AccessionRef, Location, Position};
use proptest::prelude::*;

fn position_strategy() -> impl Strategy<Value = Position> {
    (1u64..1_000_000, 0u8..3).prop_map(|(value, fuzz)| match fuzz {
        0 => Position::exact(value),
        1 => Position::before(value),
        _ => Position::after(value),
    })
}

/// Remote references never name the enclosing record ("REC1") so they survive;
/// versions may carry leading zeros, which must render back unchanged
fn remote_strategy() -> impl Strategy<Value = Option<AccessionRef>> {
    prop_oneof![
        3 => Just(None),
        1 => ("[A-Z]{2}[0-9]{6}", proptest::option::of("[0-9]{1,3}"))
            .prop_map(|(acc, version)| Some(AccessionRef::new(acc, version.as_deref()))),
    ]
}

fn leaf_strategy() -> impl Strategy<Value = Location> {
    prop_oneof![
        (position_strategy(), position_strategy(), remote_strategy())
            .prop_map(|(start, end, remote)| Location::Span { start, end, remote }),
        (position_strategy(), remote_strategy()).prop_map(|(at, remote)| Location::Point { at, remote }),
    ]
}

fn location_strategy() -> impl Strategy<Value = Location> {
    leaf_strategy().prop_recursive(6, 48, 5, |inner| {
        prop_oneof![
            inner.clone().prop_map(Location::complement),
            prop::collection::vec(inner.clone(), 1..5).prop_map(Location::Join),
            prop::collection::vec(inner, 1..5).prop_map(Location::Order),
        ]
    })
}

/// Qualifier names as they appear in feature tables
fn qualifier_name_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z_]{0,15}"
}

/// Quoted values: anything printable except quotes
fn qualifier_value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ,.;:()/=_-]{0,40}".prop_map(|v| v.trim().to_string())
}

fn word_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9,.;()-]{1,12}"
}

proptest! {
    #[test]
    fn rendered_locations_parse_back(location in location_strategy()) {
        let rendered = location.to_string();
        let reparsed = parse_location(&rendered, "REC1").unwrap();
        prop_assert_eq!(&reparsed, &location);
        prop_assert_eq!(reparsed.to_string(), rendered);
    }

    #[test]
    fn whitespace_between_tokens_is_ignored(location in location_strategy()) {
        let rendered = location.to_string();
        let spaced = rendered
            .replace(',', " , ")
            .replace('(', "( ")
            .replace(')', " )")
            .replace("..", " .. ");
        prop_assert_eq!(parse_location(&spaced, "REC1").unwrap(), location);
    }

    #[test]
    fn single_line_qualifiers_split_cleanly(
        name in qualifier_name_strategy(),
        value in qualifier_value_strategy(),
    ) {
        let line = format!("{name}=\"{value}\"");
        let qualifier = split_qualifier(&line).unwrap();
        prop_assert_eq!(&qualifier.name, &name);
        prop_assert_eq!(&qualifier.value, &value);
        prop_assert_eq!(format!("{}=\"{}\"", qualifier.name, qualifier.value), line);
    }

    #[test]
    fn continuation_lines_join_with_one_space(
        words in prop::collection::vec(word_strategy(), 1..6),
    ) {
        let mut block = vec!["     misc_feature    1..10".to_string()];
        block.push(format!("                     /note=\"{}", words[0]));
        for word in &words[1..] {
            block.push(format!("                     {word}"));
        }

        let merged = merge(&block).unwrap();
        prop_assert_eq!(merged.qualifiers().len(), 1);
        prop_assert_eq!(&merged.qualifiers()[0], &format!("note=\"{}", words.join(" ")));
    }

    #[test]
    fn translation_lines_join_without_separator(
        chunks in prop::collection::vec("[ACDEFGHIKLMNPQRSTVWY]{1,58}", 1..6),
    ) {
        let mut block = vec!["     CDS             1..999".to_string()];
        block.push(format!("                     /translation=\"{}", chunks[0]));
        for chunk in &chunks[1..] {
            block.push(format!("                     {chunk}"));
        }

        let merged = merge(&block).unwrap();
        prop_assert_eq!(&merged.qualifiers()[0], &format!("translation=\"{}", chunks.concat()));
    }

    #[test]
    fn complement_rejects_more_than_one_location(
        a in leaf_strategy(),
        b in leaf_strategy(),
    ) {
        let expr = format!("complement({a},{b})");
        prop_assert!(parse_location(&expr, "REC1").is_err());
    }
}
