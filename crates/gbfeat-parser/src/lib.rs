//! gbfeat Parser
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Pure parsing functions for the feature table of GenBank and EMBL flat
//! files. Callers hand in the lines of one feature (already cut out of the
//! file) plus the accession of the record; they get back a [`Feature`] with
//! its key, a structured [`Location`] and the ordered [`Qualifier`]s.
//!
//! # Components
//!
//! - [`merge`]: physical lines -> one logical line per qualifier
//! - [`split`]: logical qualifier lines -> name/value pairs
//! - [`parse_location`]: location expressions (`complement(join(1..5,10..15))`)
//! - [`assemble`]: the three above, for a whole feature block
//! - [`parse_feature_table`] / [`FeatureTableParser`]: many blocks in parallel
//!
//! Nothing here performs I/O.
//!
//! # Example
//!
//! ```
//! use gbfeat_parser::{assemble, Location};
//!
//! let block = [
//!     "     CDS             complement(<1..206)",
//!     "                     /gene=\"xyz\"",
//! ];
//! let feature = assemble(&block, "AB000001").unwrap();
//! assert_eq!(feature.key, "CDS");
//! assert_eq!(feature.qualifier("gene"), Some("xyz"));
//! assert_eq!(feature.location.to_string(), "complement(<1..206)");
//! ```

pub mod error;
pub mod feature;
pub mod location;
pub mod merge;
pub mod models;
pub mod qualifier;
pub mod table;

// Re-export commonly used types
pub use error::{ParseError, Result};
pub use feature::{assemble, assemble_with_id};
pub use location::parse_location;
pub use merge::{merge, MergedLines};
pub use models::{AccessionRef, Feature, Fuzziness, Location, Position, Qualifier, Strand};
pub use qualifier::{split, split_qualifier};
pub use table::{parse_feature_table, FeatureTableParser, TableError};
