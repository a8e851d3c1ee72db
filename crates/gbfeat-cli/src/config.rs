//! Configuration management for the gbfeat CLI
//!
//! Settings come from defaults, then environment variables (a `.env` file
//! is loaded into the environment at startup). Command-line flags are
//! applied on top by the commands.

use gbfeat_common::{GbfeatError, Result};
use serde::{Deserialize, Serialize};

// ============================================================================
// CLI Configuration Constants
// ============================================================================

/// Environment variable selecting the output format
pub const FORMAT_ENV: &str = "GBFEAT_FORMAT";

/// Environment variable setting the number of parser threads
pub const THREADS_ENV: &str = "GBFEAT_THREADS";

/// Environment variable enabling fail-fast parsing
pub const FAIL_FAST_ENV: &str = "GBFEAT_FAIL_FAST";

/// How parse results are written to stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Pretty-printed JSON
    #[default]
    Json,
    /// Tab-separated summary lines
    Text,
}

impl std::str::FromStr for OutputFormat {
    type Err = GbfeatError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "text" | "tsv" => Ok(OutputFormat::Text),
            _ => Err(GbfeatError::config(format!(
                "Invalid output format '{s}' in {FORMAT_ENV}; expected 'json' or 'text'"
            ))),
        }
    }
}

/// CLI configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub format: OutputFormat,

    /// Parser worker threads; `None` lets rayon decide
    pub threads: Option<usize>,

    /// Stop at the first feature that fails to parse
    #[serde(default)]
    pub fail_fast: bool,
}

impl Config {
    /// Read configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(format) = lookup(FORMAT_ENV) {
            config.format = format.parse()?;
        }

        if let Some(threads) = lookup(THREADS_ENV) {
            let threads: usize = threads.trim().parse().map_err(|_| {
                GbfeatError::config(format!(
                    "{THREADS_ENV} must be a positive integer, got '{threads}'"
                ))
            })?;
            if threads == 0 {
                return Err(GbfeatError::config(format!("{THREADS_ENV} must be at least 1")));
            }
            config.threads = Some(threads);
        }

        if let Some(fail_fast) = lookup(FAIL_FAST_ENV) {
            config.fail_fast = fail_fast.trim().parse().map_err(|_| {
                GbfeatError::config(format!(
                    "{FAIL_FAST_ENV} must be 'true' or 'false', got '{fail_fast}'"
                ))
            })?;
        }

        Ok(config)
    }

    pub fn with_format(mut self, format: Option<OutputFormat>) -> Self {
        if let Some(format) = format {
            self.format = format;
        }
        self
    }

    pub fn with_threads(mut self, threads: Option<usize>) -> Self {
        if threads.is_some() {
            self.threads = threads;
        }
        self
    }

    /// A `--fail-fast` flag can only switch fail-fast on
    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast |= fail_fast;
        self
    }
}
