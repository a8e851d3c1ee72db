//! Build automation tasks for gbfeat
//!
//! Currently generates the CLI reference from the clap definitions.

use anyhow::Context;
use clap::Parser;
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Build automation tasks for gbfeat", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Generate the CLI reference in Markdown
    GenerateCliDocs {
        /// Output directory for generated documentation
        #[arg(short, long, default_value = "docs")]
        output_dir: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::GenerateCliDocs { output_dir } => generate_cli_docs(&output_dir)?,
    }

    Ok(())
}

fn generate_cli_docs(output_dir: &str) -> anyhow::Result<()> {
    println!("Generating CLI documentation...");

    // Generate markdown from clap definitions
    let markdown = clap_markdown::help_markdown::<gbfeat_cli::Cli>();

    let content = format!(
        r#"# gbfeat CLI Reference

This documentation is generated from the CLI source code. Last updated: {}.

## Overview

gbfeat parses the feature tables of GenBank and EMBL flat files into
structured features: a key, a parsed location and the ordered qualifiers.

## Quick Start

```bash
# Parse every feature of a GenBank file as JSON
gbfeat features NC_001416.gbk

# One tab-separated line per feature, stop at the first bad feature
gbfeat features X56734.embl --format text --fail-fast

# Inspect a single location expression
gbfeat location "complement(join(<1..206,300..>400))" --format text
```

## Commands

{}

## Environment Variables

A `.env` file in the working directory is loaded before these are read.
Command-line flags take precedence.

- `GBFEAT_FORMAT` - Output format, `json` (default) or `text`
- `GBFEAT_THREADS` - Worker threads used to parse features in parallel
- `GBFEAT_FAIL_FAST` - `true` to abort on the first feature that fails to parse
- `LOG_LEVEL` - `trace`, `debug`, `info`, `warn` or `error`
- `LOG_OUTPUT` - `console`, `file` or `both`
- `LOG_FORMAT` - `text` or `json`
- `LOG_DIR` - Directory for log files when file output is enabled
- `LOG_FILTER` - Extra tracing filter directives, e.g. `gbfeat_parser=trace`

---

*To update, run `cargo xtask generate-cli-docs`.*
"#,
        chrono::Utc::now().format("%Y-%m-%d"),
        markdown
    );

    let output_path = PathBuf::from(output_dir);
    fs::create_dir_all(&output_path)
        .with_context(|| format!("Failed to create {}", output_path.display()))?;

    let file_path = output_path.join("cli-reference.md");
    fs::write(&file_path, content)
        .with_context(|| format!("Failed to write {}", file_path.display()))?;

    println!("Generated CLI documentation at: {}", file_path.display());

    Ok(())
}
