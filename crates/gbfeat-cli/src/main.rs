//! gbfeat CLI - Main entry point

use clap::Parser;
use gbfeat_cli::{Cli, Commands, Config};
use gbfeat_common::logging::{init_logging, LogConfig, LogLevel, LogOutput};
use std::process;
use tracing::error;

fn main() {
    // Parse command-line arguments
    let cli = Cli::parse();

    // Handle markdown help generation
    if cli.markdown_help {
        println!("{}", clap_markdown::help_markdown::<Cli>());
        return;
    }

    // Ensure a command is provided
    let Some(ref command) = cli.command else {
        eprintln!("Error: A subcommand is required");
        eprintln!();
        eprintln!("For more information, try '--help'.");
        process::exit(2);
    };

    dotenvy::dotenv().ok();

    // Verbose mode logs debug to stderr; otherwise warnings only
    let level = if cli.verbose { LogLevel::Debug } else { LogLevel::Warn };
    let log_config = LogConfig::builder()
        .level(level)
        .output(LogOutput::Console)
        .log_file_prefix("gbfeat")
        .build();

    // Environment variables take precedence
    let log_config = log_config.clone().merge_env().unwrap_or(log_config);

    // The CLI works without logging, so a failed init is not fatal
    let _guard = init_logging(&log_config).ok().flatten();

    if let Err(e) = execute_command(command) {
        error!(error = %e, "Command failed");
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Execute the CLI command
fn execute_command(command: &Commands) -> gbfeat_cli::Result<()> {
    let config = Config::from_env()?;

    match command {
        Commands::Features {
            file,
            accession,
            format,
            fail_fast,
            threads,
        } => {
            let config = config
                .with_format(*format)
                .with_threads(*threads)
                .with_fail_fast(*fail_fast);
            gbfeat_cli::commands::features::run(file, accession.as_deref(), &config)
        },

        Commands::Location {
            expr,
            accession,
            format,
        } => {
            let config = config.with_format(*format);
            gbfeat_cli::commands::location::run(expr, accession, &config)
        },
    }
}
