//! `gbfeat features` command implementation
//!
//! Parses every feature of every record in a flat file.

use crate::config::Config;
use crate::error::{CliError, Result};
use crate::flatfile::{read_records, FlatFileRecord};
use crate::output::{write_records, RecordReport};
use anyhow::Context;
use gbfeat_parser::FeatureTableParser;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

/// Parse `file` and print one report per record
pub fn run(file: &Path, accession: Option<&str>, config: &Config) -> Result<()> {
    let reports = parse_file(file, accession, config)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    write_records(&mut out, &reports, config.format)?;
    out.flush()?;

    Ok(())
}

/// Read and parse `file` without printing anything.
///
/// `accession` replaces each record's own accession for remote-reference
/// resolution. With `config.fail_fast` the first failing feature aborts the
/// whole run.
pub fn parse_file(file: &Path, accession: Option<&str>, config: &Config) -> Result<Vec<RecordReport>> {
    if !file.exists() {
        return Err(CliError::file_not_found(file.display().to_string()));
    }

    let text = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let records = read_records(&text);
    if records.iter().all(|record| record.blocks.is_empty()) {
        return Err(CliError::no_feature_table(file.display().to_string()));
    }

    info!(
        file = %file.display(),
        records = records.len(),
        threads = ?config.threads,
        "Parsing feature tables"
    );

    match config.threads {
        Some(threads) => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .context("Failed to build parser thread pool")?;
            pool.install(|| parse_records(&records, accession, config.fail_fast))
        },
        None => parse_records(&records, accession, config.fail_fast),
    }
}

fn parse_records(
    records: &[FlatFileRecord],
    accession: Option<&str>,
    fail_fast: bool,
) -> Result<Vec<RecordReport>> {
    let mut reports = Vec::with_capacity(records.len());

    for record in records {
        let accession = accession.unwrap_or(record.accession.as_str());
        let parser = FeatureTableParser::new(accession);

        let report = if fail_fast {
            let features = parser
                .parse_all_strict(&record.blocks)
                .map_err(|e| CliError::feature(accession, e.feature_id, e.source))?;
            RecordReport::from_results(accession, features.into_iter().map(Ok).collect())
        } else {
            RecordReport::from_results(accession, parser.parse_all(&record.blocks))
        };

        debug!(
            accession = %report.accession,
            failed = report.failures.len(),
            parsed = report.features.len(),
            "Parsed feature table"
        );
        reports.push(report);
    }

    Ok(reports)
}
