//! Output formatting for parse results
//!
//! JSON goes out as one pretty-printed document; text is one tab-separated
//! line per feature (or per failure).

use crate::config::OutputFormat;
use crate::error::Result;
use gbfeat_parser::{Feature, Location, ParseError};
use serde::Serialize;
use std::io::Write;

/// Parse outcome of one flat file record
#[derive(Debug, Clone, Serialize)]
pub struct RecordReport {
    pub accession: String,
    pub features: Vec<Feature>,
    pub failures: Vec<FeatureFailure>,
}

/// A feature that failed to parse
#[derive(Debug, Clone, Serialize)]
pub struct FeatureFailure {
    pub feature_id: usize,
    pub error: String,
}

impl RecordReport {
    /// Split parse results into features and failures.
    ///
    /// Result `i` belongs to feature id `i + 1`.
    pub fn from_results(accession: impl Into<String>, results: Vec<gbfeat_parser::Result<Feature>>) -> Self {
        let mut features = Vec::with_capacity(results.len());
        let mut failures = Vec::new();

        for (index, result) in results.into_iter().enumerate() {
            match result {
                Ok(feature) => features.push(feature),
                Err(e) => failures.push(FeatureFailure::new(index + 1, &e)),
            }
        }

        Self {
            accession: accession.into(),
            features,
            failures,
        }
    }
}

impl FeatureFailure {
    pub fn new(feature_id: usize, error: &ParseError) -> Self {
        Self {
            feature_id,
            error: error.to_string(),
        }
    }
}

/// Summary of a single parsed location
#[derive(Debug, Clone, Serialize)]
pub struct LocationReport<'a> {
    pub expression: String,
    pub strand: gbfeat_parser::Strand,
    pub bounds: Option<(u64, u64)>,
    pub remote: bool,
    pub fuzzy: bool,
    pub location: &'a Location,
}

impl<'a> LocationReport<'a> {
    pub fn new(location: &'a Location) -> Self {
        Self {
            expression: location.to_string(),
            strand: location.strand(),
            bounds: location.bounds(),
            remote: location.is_remote(),
            fuzzy: location.is_fuzzy(),
            location,
        }
    }
}

pub fn write_records<W: Write>(out: &mut W, reports: &[RecordReport], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, reports)?;
            writeln!(out)?;
        },
        OutputFormat::Text => {
            for report in reports {
                write_record_text(out, report)?;
            }
        },
    }
    Ok(())
}

fn write_record_text<W: Write>(out: &mut W, report: &RecordReport) -> Result<()> {
    for feature in &report.features {
        writeln!(
            out,
            "{}\t{}\t{}\t{}\t{}",
            report.accession,
            feature.id,
            feature.key,
            feature.location,
            feature.qualifiers.len()
        )?;
    }
    for failure in &report.failures {
        writeln!(
            out,
            "{}\t{}\tERROR\t{}",
            report.accession, failure.feature_id, failure.error
        )?;
    }
    Ok(())
}

pub fn write_location<W: Write>(out: &mut W, location: &Location, format: OutputFormat) -> Result<()> {
    let report = LocationReport::new(location);
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &report)?;
            writeln!(out)?;
        },
        OutputFormat::Text => {
            let bounds = report
                .bounds
                .map(|(start, end)| format!("{start}..{end}"))
                .unwrap_or_else(|| "-".to_string());
            writeln!(out, "location\t{}", report.expression)?;
            writeln!(out, "strand\t{}", report.strand)?;
            writeln!(out, "bounds\t{bounds}")?;
            writeln!(out, "remote\t{}", report.remote)?;
            writeln!(out, "fuzzy\t{}", report.fuzzy)?;
        },
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use gbfeat_parser::assemble_with_id;

    fn sample_report() -> RecordReport {
        let good = assemble_with_id(
            &["     gene            complement(10..20)", "                     /gene=\"abc\""],
            "AB000001",
            1,
        );
        let bad = assemble_with_id(&["     gene            join(1..5"], "AB000001", 2);
        RecordReport::from_results("AB000001", vec![good, bad])
    }

    #[test]
    fn test_report_splits_failures() {
        let report = sample_report();
        assert_eq!(report.features.len(), 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].feature_id, 2);
        assert!(report.failures[0].error.contains("Location syntax error"));
    }

    #[test]
    fn test_text_output() {
        let mut out = Vec::new();
        write_records(&mut out, &[sample_report()], OutputFormat::Text).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "AB000001\t1\tgene\tcomplement(10..20)\t1");
        assert!(lines[1].starts_with("AB000001\t2\tERROR\t"));
    }

    #[test]
    fn test_json_output() {
        let mut out = Vec::new();
        write_records(&mut out, &[sample_report()], OutputFormat::Json).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();

        assert_eq!(json[0]["accession"], "AB000001");
        assert_eq!(json[0]["features"][0]["key"], "gene");
        assert_eq!(json[0]["failures"][0]["feature_id"], 2);
    }

    #[test]
    fn test_location_text_output() {
        let location = gbfeat_parser::parse_location("join(<1..5,AB1.1:7..9)", "").unwrap();
        let mut out = Vec::new();
        write_location(&mut out, &location, OutputFormat::Text).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("location\tjoin(<1..5,AB1.1:7..9)\n"));
        assert!(text.contains("strand\tforward\n"));
        assert!(text.contains("bounds\t1..5\n"));
        assert!(text.contains("remote\ttrue\n"));
        assert!(text.contains("fuzzy\ttrue\n"));
    }
}
