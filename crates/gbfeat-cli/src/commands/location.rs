//! `gbfeat location` command implementation

use crate::config::Config;
use crate::error::Result;
use crate::output::write_location;
use gbfeat_parser::parse_location;
use std::io::Write;
use tracing::debug;

/// Parse a single location expression and print its summary
pub fn run(expr: &str, accession: &str, config: &Config) -> Result<()> {
    let location = parse_location(expr, accession)?;
    debug!(%location, accession, "Parsed location");

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    write_location(&mut out, &location, config.format)?;
    out.flush()?;

    Ok(())
}
