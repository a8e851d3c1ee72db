//! gbfeat CLI Library
//!
//! Command-line front-end for the feature table parser.
//!
//! # Overview
//!
//! - **Feature tables**: parse every feature of a GenBank or EMBL flat file
//!   (`gbfeat features`)
//! - **Locations**: parse a single location expression (`gbfeat location`)
//!
//! Reading files and cutting the feature table into per-feature blocks
//! happens here ([`flatfile`]); the parsing itself lives in `gbfeat-parser`.

pub mod commands;
pub mod config;
pub mod error;
pub mod flatfile;
pub mod output;

// Re-export commonly used types
pub use config::{Config, OutputFormat};
pub use error::{CliError, Result};

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// gbfeat - GenBank/EMBL feature table parser
#[derive(Parser, Debug)]
#[command(name = "gbfeat")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print the command reference as Markdown and exit
    #[arg(long, hide = true)]
    pub markdown_help: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse every feature in a GenBank or EMBL flat file
    Features {
        /// Flat file to read
        file: PathBuf,

        /// Accession used for remote-reference resolution (defaults to the record's own)
        #[arg(short, long)]
        accession: Option<String>,

        /// Output format (overrides GBFEAT_FORMAT)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Abort on the first feature that fails to parse
        #[arg(long)]
        fail_fast: bool,

        /// Worker threads for parallel parsing (overrides GBFEAT_THREADS)
        #[arg(short, long)]
        threads: Option<usize>,
    },

    /// Parse a single location expression
    Location {
        /// Location expression, e.g. "complement(join(1..5,10..15))"
        expr: String,

        /// Accession of the enclosing record
        #[arg(short, long, default_value = "")]
        accession: String,

        /// Output format (overrides GBFEAT_FORMAT)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },
}
