// Data models for parsed feature table entries
//
// All values are plain owned data: built bottom-up by the parsers and never
// mutated afterwards.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A named attribute of a feature, e.g. `/gene="xyz"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Qualifier {
    pub name: String,
    /// Value with surrounding quotes removed; empty for value-less qualifiers
    pub value: String,
}

impl Qualifier {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// One parsed feature table entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    /// Caller supplied identifier (position of the feature in its table)
    pub id: usize,
    pub key: String,
    pub location: Location,
    /// Qualifiers in file order; names may repeat
    pub qualifiers: Vec<Qualifier>,
}

impl Feature {
    /// First value of the named qualifier
    pub fn qualifier(&self, name: &str) -> Option<&str> {
        self.qualifiers
            .iter()
            .find(|q| q.name == name)
            .map(|q| q.value.as_str())
    }

    /// All values of the named qualifier, in file order
    pub fn qualifiers_named<'a, 'n>(&'a self, name: &'n str) -> impl Iterator<Item = &'a str> + 'n
    where
        'a: 'n,
    {
        self.qualifiers
            .iter()
            .filter(move |q| q.name == name)
            .map(|q| q.value.as_str())
    }

    pub fn has_qualifier(&self, name: &str) -> bool {
        self.qualifiers.iter().any(|q| q.name == name)
    }
}

/// How exactly a position is known
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Fuzziness {
    #[default]
    Exact,
    /// `<n`: the true position lies at or before `n`
    Before,
    /// `>n`: the true position lies at or after `n`
    After,
}

/// A 1-based base position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub value: u64,
    pub fuzziness: Fuzziness,
}

impl Position {
    pub fn exact(value: u64) -> Self {
        Self {
            value,
            fuzziness: Fuzziness::Exact,
        }
    }

    pub fn before(value: u64) -> Self {
        Self {
            value,
            fuzziness: Fuzziness::Before,
        }
    }

    pub fn after(value: u64) -> Self {
        Self {
            value,
            fuzziness: Fuzziness::After,
        }
    }

    pub fn is_fuzzy(&self) -> bool {
        self.fuzziness != Fuzziness::Exact
    }
}

impl From<u64> for Position {
    fn from(value: u64) -> Self {
        Self::exact(value)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.fuzziness {
            Fuzziness::Exact => write!(f, "{}", self.value),
            Fuzziness::Before => write!(f, "<{}", self.value),
            Fuzziness::After => write!(f, ">{}", self.value),
        }
    }
}

/// Reference to another sequence record, e.g. `AB012345.1`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccessionRef {
    pub accession: String,
    /// Version suffix exactly as written (digits only, leading zeros kept)
    pub version: Option<String>,
}

impl AccessionRef {
    pub fn new(accession: impl Into<String>, version: Option<&str>) -> Self {
        Self {
            accession: accession.into(),
            version: version.map(str::to_string),
        }
    }

    /// Split `ACC` or `ACC.version` into its parts.
    ///
    /// A suffix that is not all digits stays part of the accession.
    pub fn parse(text: &str) -> Self {
        match text.rsplit_once('.') {
            Some((accession, version))
                if !accession.is_empty()
                    && !version.is_empty()
                    && version.bytes().all(|b| b.is_ascii_digit()) =>
            {
                Self::new(accession, Some(version))
            },
            _ => Self::new(text, None),
        }
    }

    /// Whether this reference points at the record identified by `accession`.
    ///
    /// Versions only have to agree when both sides carry one, and compare
    /// by numeric value (`01` matches `1`).
    pub fn refers_to(&self, accession: &str) -> bool {
        if accession.is_empty() {
            return false;
        }
        let other = Self::parse(accession);
        self.accession == other.accession
            && match (&self.version, &other.version) {
                (Some(a), Some(b)) => a.trim_start_matches('0') == b.trim_start_matches('0'),
                _ => true,
            }
    }
}

impl fmt::Display for AccessionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(version) => write!(f, "{}.{}", self.accession, version),
            None => f.write_str(&self.accession),
        }
    }
}

/// Orientation of a location relative to the record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strand {
    Forward,
    Reverse,
    /// Some segments are complemented and some are not
    Mixed,
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Strand::Forward => "forward",
            Strand::Reverse => "reverse",
            Strand::Mixed => "mixed",
        })
    }
}

/// A parsed location expression.
///
/// `remote: None` means the segment lies on the record that owns the feature.
///
/// Nesting depth is limited only by memory: `Clone`, `PartialEq`, `Drop`,
/// `Display` and the accessors all walk the tree with a heap stack. The
/// serde and `Debug` impls are derived and recurse.
#[derive(Debug, Serialize, Deserialize)]
pub enum Location {
    Span {
        start: Position,
        end: Position,
        remote: Option<AccessionRef>,
    },
    Point {
        at: Position,
        remote: Option<AccessionRef>,
    },
    Complement(Box<Location>),
    Join(Vec<Location>),
    Order(Vec<Location>),
}

impl Location {
    /// Same-record span with exact bounds
    pub fn span(start: u64, end: u64) -> Self {
        Location::Span {
            start: Position::exact(start),
            end: Position::exact(end),
            remote: None,
        }
    }

    /// Same-record single base
    pub fn point(at: u64) -> Self {
        Location::Point {
            at: Position::exact(at),
            remote: None,
        }
    }

    pub fn complement(inner: Location) -> Self {
        Location::Complement(Box::new(inner))
    }

    /// Span and point segments in document order, each paired with whether it
    /// sits under an odd number of complements.
    fn walk_leaves(&self) -> Vec<(&Location, bool)> {
        let mut leaves = Vec::new();
        let mut stack = vec![(self, false)];

        while let Some((node, reversed)) = stack.pop() {
            match node {
                Location::Span { .. } | Location::Point { .. } => leaves.push((node, reversed)),
                Location::Complement(inner) => stack.push((inner.as_ref(), !reversed)),
                Location::Join(items) | Location::Order(items) => {
                    stack.extend(items.iter().rev().map(|item| (item, reversed)));
                },
            }
        }

        leaves
    }

    /// Span and point segments in document order
    pub fn leaves(&self) -> Vec<&Location> {
        self.walk_leaves().into_iter().map(|(leaf, _)| leaf).collect()
    }

    pub fn strand(&self) -> Strand {
        let leaves = self.walk_leaves();
        if leaves.iter().all(|(_, reversed)| *reversed) {
            Strand::Reverse
        } else if leaves.iter().all(|(_, reversed)| !*reversed) {
            Strand::Forward
        } else {
            Strand::Mixed
        }
    }

    /// Lowest and highest same-record coordinate covered by this location.
    ///
    /// Remote segments are ignored; `None` when nothing lies on this record.
    pub fn bounds(&self) -> Option<(u64, u64)> {
        self.walk_leaves()
            .into_iter()
            .filter_map(|(leaf, _)| match leaf {
                Location::Span {
                    start,
                    end,
                    remote: None,
                } => Some((start.value.min(end.value), start.value.max(end.value))),
                Location::Point { at, remote: None } => Some((at.value, at.value)),
                _ => None,
            })
            .reduce(|(lo, hi), (start, end)| (lo.min(start), hi.max(end)))
    }

    /// Whether any segment lies on another record
    pub fn is_remote(&self) -> bool {
        self.walk_leaves().into_iter().any(|(leaf, _)| {
            matches!(
                leaf,
                Location::Span {
                    remote: Some(_),
                    ..
                } | Location::Point {
                    remote: Some(_),
                    ..
                }
            )
        })
    }

    /// Whether any segment has a `<` or `>` end
    pub fn is_fuzzy(&self) -> bool {
        self.walk_leaves().into_iter().any(|(leaf, _)| match leaf {
            Location::Span { start, end, .. } => start.is_fuzzy() || end.is_fuzzy(),
            Location::Point { at, .. } => at.is_fuzzy(),
            _ => false,
        })
    }
}

/// Pending work while rebuilding a tree bottom-up
enum CloneStep<'a> {
    Visit(&'a Location),
    Complement,
    Join(usize),
    Order(usize),
}

impl Clone for Location {
    fn clone(&self) -> Self {
        let mut steps = vec![CloneStep::Visit(self)];
        let mut built: Vec<Location> = Vec::new();

        while let Some(step) = steps.pop() {
            match step {
                CloneStep::Visit(node) => match node {
                    Location::Span { start, end, remote } => built.push(Location::Span {
                        start: *start,
                        end: *end,
                        remote: remote.clone(),
                    }),
                    Location::Point { at, remote } => built.push(Location::Point {
                        at: *at,
                        remote: remote.clone(),
                    }),
                    Location::Complement(inner) => {
                        steps.push(CloneStep::Complement);
                        steps.push(CloneStep::Visit(inner.as_ref()));
                    },
                    Location::Join(items) | Location::Order(items) => {
                        steps.push(if matches!(node, Location::Join(_)) {
                            CloneStep::Join(items.len())
                        } else {
                            CloneStep::Order(items.len())
                        });
                        steps.extend(items.iter().rev().map(CloneStep::Visit));
                    },
                },
                CloneStep::Complement => {
                    let inner = built.pop().unwrap_or_else(|| Location::point(0));
                    built.push(Location::complement(inner));
                },
                CloneStep::Join(count) => {
                    let items = built.split_off(built.len() - count);
                    built.push(Location::Join(items));
                },
                CloneStep::Order(count) => {
                    let items = built.split_off(built.len() - count);
                    built.push(Location::Order(items));
                },
            }
        }

        built.pop().unwrap_or_else(|| Location::point(0))
    }
}

impl PartialEq for Location {
    fn eq(&self, other: &Self) -> bool {
        let mut pending = vec![(self, other)];

        while let Some(pair) = pending.pop() {
            match pair {
                (
                    Location::Span { start, end, remote },
                    Location::Span {
                        start: other_start,
                        end: other_end,
                        remote: other_remote,
                    },
                ) => {
                    if start != other_start || end != other_end || remote != other_remote {
                        return false;
                    }
                },
                (Location::Point { at, remote }, Location::Point { at: other_at, remote: other_remote }) => {
                    if at != other_at || remote != other_remote {
                        return false;
                    }
                },
                (Location::Complement(a), Location::Complement(b)) => {
                    pending.push((a.as_ref(), b.as_ref()));
                },
                (Location::Join(a), Location::Join(b)) | (Location::Order(a), Location::Order(b)) => {
                    if a.len() != b.len() {
                        return false;
                    }
                    pending.extend(a.iter().zip(b.iter()));
                },
                _ => return false,
            }
        }

        true
    }
}

impl Eq for Location {}

impl Drop for Location {
    fn drop(&mut self) {
        // Move children to the heap so that dropping them never recurses
        let mut pending = Vec::new();
        detach_children(self, &mut pending);
        while let Some(mut node) = pending.pop() {
            detach_children(&mut node, &mut pending);
        }
    }
}

fn detach_children(node: &mut Location, pending: &mut Vec<Location>) {
    match node {
        Location::Complement(inner) => {
            pending.push(std::mem::replace(inner.as_mut(), Location::point(0)));
        },
        Location::Join(items) | Location::Order(items) => pending.append(items),
        Location::Span { .. } | Location::Point { .. } => {},
    }
}

enum RenderStep<'a> {
    Node(&'a Location),
    Text(&'static str),
}

/// Canonical rendering: no whitespace, remote references written in full.
impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut stack = vec![RenderStep::Node(self)];

        while let Some(step) = stack.pop() {
            let node = match step {
                RenderStep::Text(text) => {
                    f.write_str(text)?;
                    continue;
                },
                RenderStep::Node(node) => node,
            };

            match node {
                Location::Span { start, end, remote } => {
                    if let Some(remote) = remote {
                        write!(f, "{remote}:")?;
                    }
                    write!(f, "{start}..{end}")?;
                },
                Location::Point { at, remote } => {
                    if let Some(remote) = remote {
                        write!(f, "{remote}:")?;
                    }
                    write!(f, "{at}")?;
                },
                Location::Complement(inner) => {
                    f.write_str("complement(")?;
                    stack.push(RenderStep::Text(")"));
                    stack.push(RenderStep::Node(inner.as_ref()));
                },
                Location::Join(items) | Location::Order(items) => {
                    let name = if matches!(node, Location::Join(_)) {
                        "join("
                    } else {
                        "order("
                    };
                    f.write_str(name)?;
                    stack.push(RenderStep::Text(")"));
                    for (i, item) in items.iter().enumerate().rev() {
                        stack.push(RenderStep::Node(item));
                        if i > 0 {
                            stack.push(RenderStep::Text(","));
                        }
                    }
                },
            }
        }

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn remote_span(acc: &str, version: Option<&str>, start: u64, end: u64) -> Location {
        Location::Span {
            start: Position::exact(start),
            end: Position::exact(end),
            remote: Some(AccessionRef::new(acc, version)),
        }
    }

    #[test]
    fn test_render_nested() {
        let location = Location::complement(Location::Join(vec![
            Location::span(1, 5),
            Location::span(10, 15),
        ]));
        assert_eq!(location.to_string(), "complement(join(1..5,10..15))");
    }

    #[test]
    fn test_render_fuzzy_and_remote() {
        let location = Location::Order(vec![
            Location::Span {
                start: Position::before(1),
                end: Position::after(206),
                remote: None,
            },
            remote_span("AB012345", Some("1"), 45, 60),
            Location::point(300),
        ]);
        assert_eq!(location.to_string(), "order(<1..>206,AB012345.1:45..60,300)");
    }

    #[test]
    fn test_accession_ref_parse() {
        assert_eq!(AccessionRef::parse("AB012345.1"), AccessionRef::new("AB012345", Some("1")));
        assert_eq!(AccessionRef::parse("AB012345"), AccessionRef::new("AB012345", None));
        assert_eq!(AccessionRef::parse("NC_000913.3").version.as_deref(), Some("3"));
        assert_eq!(AccessionRef::parse("AB1.v2"), AccessionRef::new("AB1.v2", None));
    }

    #[test]
    fn test_accession_ref_keeps_version_text() {
        let reference = AccessionRef::parse("AB012345.01");
        assert_eq!(reference.version.as_deref(), Some("01"));
        assert_eq!(reference.to_string(), "AB012345.01");
        assert!(reference.refers_to("AB012345.1"));
        assert!(!reference.refers_to("AB012345.10"));
    }

    #[test]
    fn test_accession_ref_refers_to() {
        let versioned = AccessionRef::new("XY999999", Some("2"));
        assert!(versioned.refers_to("XY999999"));
        assert!(versioned.refers_to("XY999999.2"));
        assert!(!versioned.refers_to("XY999999.1"));
        assert!(!versioned.refers_to("AB012345"));
        assert!(!AccessionRef::new("", None).refers_to(""));
    }

    #[test]
    fn test_strand() {
        assert_eq!(Location::span(1, 10).strand(), Strand::Forward);
        assert_eq!(
            Location::complement(Location::span(1, 10)).strand(),
            Strand::Reverse
        );
        let mixed = Location::Join(vec![
            Location::span(1, 10),
            Location::complement(Location::span(20, 30)),
        ]);
        assert_eq!(mixed.strand(), Strand::Mixed);
        let double = Location::complement(Location::complement(Location::span(1, 10)));
        assert_eq!(double.strand(), Strand::Forward);
    }

    #[test]
    fn test_bounds_skip_remote_segments() {
        let location = Location::Join(vec![
            remote_span("AB012345", Some("1"), 1, 5000),
            Location::span(40, 90),
            Location::point(12),
        ]);
        assert_eq!(location.bounds(), Some((12, 90)));
        assert!(location.is_remote());
        assert_eq!(remote_span("AB012345", None, 1, 2).bounds(), None);
    }

    #[test]
    fn test_leaves_in_document_order() {
        let location = Location::Join(vec![
            Location::complement(Location::span(1, 2)),
            Location::Order(vec![Location::point(3), Location::span(4, 5)]),
        ]);
        let rendered: Vec<String> = location.leaves().iter().map(|l| l.to_string()).collect();
        assert_eq!(rendered, vec!["1..2", "3", "4..5"]);
    }

    #[test]
    fn test_feature_qualifier_lookup() {
        let feature = Feature {
            id: 1,
            key: "CDS".to_string(),
            location: Location::span(1, 206),
            qualifiers: vec![
                Qualifier::new("db_xref", "GI:1"),
                Qualifier::new("gene", "xyz"),
                Qualifier::new("db_xref", "GeneID:2"),
                Qualifier::new("pseudo", ""),
            ],
        };
        assert_eq!(feature.qualifier("gene"), Some("xyz"));
        assert_eq!(
            feature.qualifiers_named("db_xref").collect::<Vec<_>>(),
            vec!["GI:1", "GeneID:2"]
        );
        assert!(feature.has_qualifier("pseudo"));
        assert_eq!(feature.qualifier("product"), None);
    }

    #[test]
    fn test_qualifier_lookup_outlives_name() {
        let feature = Feature {
            id: 1,
            key: "gene".to_string(),
            location: Location::point(5),
            qualifiers: vec![Qualifier::new("gene", "xyz")],
        };
        let value = {
            let name = String::from("gene");
            feature.qualifier(&name)
        };
        assert_eq!(value, Some("xyz"));
    }

    fn nested(depth: usize) -> Location {
        let mut location = Location::span(1, 2);
        for level in 0..depth {
            location = if level % 2 == 0 {
                Location::complement(location)
            } else {
                Location::Join(vec![Location::point(level as u64), location])
            };
        }
        location
    }

    #[test]
    fn test_deep_tree_clone_eq_drop() {
        let location = nested(300_000);
        let copy = location.clone();
        assert_eq!(copy, location);
        assert_eq!(copy.leaves().len(), location.leaves().len());

        let different = Location::complement(nested(299_999));
        assert_ne!(different, location);
        drop(copy);
        drop(location);
    }

    #[test]
    fn test_clone_and_eq_preserve_structure() {
        let location = Location::Order(vec![
            Location::complement(remote_span("AB012345", Some("01"), 1, 5)),
            Location::Join(vec![Location::point(7), Location::span(9, 12)]),
        ]);
        let copy = location.clone();
        assert_eq!(copy, location);
        assert_eq!(copy.to_string(), "order(complement(AB012345.01:1..5),join(7,9..12))");
        assert_ne!(Location::Join(vec![Location::point(7)]), Location::Order(vec![Location::point(7)]));
        assert_ne!(Location::Join(vec![Location::point(7)]), Location::Join(Vec::new()));
    }
}
