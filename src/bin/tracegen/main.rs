//! tracegen CLI - tracing shims and stable api ids from vendor C headers

use std::io::IsTerminal;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tracegen::ids::IdError;
use tracegen::scanner::ScanError;
use tracegen::util::diagnostic::{emit, Diagnostic};

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    let color = !cli.no_color && std::io::stderr().is_terminal();

    if let Err(e) = run(cli, color) {
        emit(&to_diagnostic(&e), color);
        std::process::exit(1);
    }
}

fn run(cli: Cli, color: bool) -> Result<()> {
    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("tracegen=debug")
    } else {
        EnvFilter::new("tracegen=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let config = cli.config.as_deref();
    match cli.command {
        Commands::Generate(args) => commands::generate::execute(args, config, color),
        Commands::Validate(args) => commands::validate::execute(args),
        Commands::Scan(args) => commands::scan::execute(args, config),
    }
}

/// Render component errors with their context, anything else as a chain.
fn to_diagnostic(err: &anyhow::Error) -> Diagnostic {
    if let Some(scan) = err.downcast_ref::<ScanError>() {
        return scan.to_diagnostic();
    }
    if let Some(ids) = err.downcast_ref::<IdError>() {
        return ids.to_diagnostic();
    }
    Diagnostic::error(format!("{:#}", err))
}
