// Whole feature table parsing
//
// Features are independent of each other, so a table is parsed block by block
// on the rayon pool. Results come back in block order.

use crate::error::{ParseError, Result};
use crate::feature::assemble_with_id;
use crate::location::parse_location;
use crate::models::{Feature, Location};
use rayon::prelude::*;
use thiserror::Error;

/// The first block of a table that failed to parse
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("feature {feature_id} failed to parse: {source}")]
pub struct TableError {
    /// Id the feature would have had (`1 + block index`)
    pub feature_id: usize,
    #[source]
    pub source: ParseError,
}

/// Parse every block of one record's feature table in parallel.
///
/// The result at index `i` belongs to `blocks[i]` and carries id `i + 1`.
/// A failed block does not affect the others.
pub fn parse_feature_table<B>(blocks: &[B], accession: &str) -> Vec<Result<Feature>>
where
    B: AsRef<[String]> + Sync,
{
    blocks
        .par_iter()
        .enumerate()
        .map(|(index, block)| assemble_with_id(block.as_ref(), accession, index + 1))
        .collect()
}

/// Parser bound to one sequence record
#[derive(Debug, Clone, Default)]
pub struct FeatureTableParser {
    accession: String,
}

impl FeatureTableParser {
    /// `accession` may be empty when the record's accession is unknown
    pub fn new(accession: impl Into<String>) -> Self {
        Self {
            accession: accession.into(),
        }
    }

    pub fn accession(&self) -> &str {
        &self.accession
    }

    pub fn parse_feature<S: AsRef<str>>(&self, block: &[S], id: usize) -> Result<Feature> {
        assemble_with_id(block, &self.accession, id)
    }

    pub fn parse_location(&self, expr: &str) -> Result<Location> {
        parse_location(expr, &self.accession)
    }

    /// Parse all blocks, keeping failures in place.
    ///
    /// Failed features are logged and returned as errors at their index.
    pub fn parse_all<B>(&self, blocks: &[B]) -> Vec<Result<Feature>>
    where
        B: AsRef<[String]> + Sync,
    {
        let results = parse_feature_table(blocks, &self.accession);

        for (index, result) in results.iter().enumerate() {
            if let Err(e) = result {
                tracing::warn!(
                    accession = %self.accession,
                    feature_id = index + 1,
                    error = %e,
                    "Failed to parse feature"
                );
            }
        }

        results
    }

    /// Parse all blocks, failing with the error of the first bad block.
    ///
    /// Workers stop picking up new blocks once a failure is seen. The
    /// reported failure is always the one with the lowest id.
    pub fn parse_all_strict<B>(&self, blocks: &[B]) -> std::result::Result<Vec<Feature>, TableError>
    where
        B: AsRef<[String]> + Sync,
    {
        let parse = |index: usize, block: &B| {
            assemble_with_id(block.as_ref(), &self.accession, index + 1).map_err(|source| TableError {
                feature_id: index + 1,
                source,
            })
        };

        let failure = match blocks
            .par_iter()
            .enumerate()
            .map(|(index, block)| parse(index, block))
            .collect::<std::result::Result<Vec<_>, _>>()
        {
            Ok(features) => return Ok(features),
            Err(failure) => failure,
        };

        // Several blocks may fail concurrently; report the earliest
        let earlier = blocks[..failure.feature_id - 1]
            .par_iter()
            .enumerate()
            .find_map_first(|(index, block)| parse(index, block).err());

        Err(earlier.unwrap_or(failure))
    }
}
