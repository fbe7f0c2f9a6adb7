//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// tracegen - tracing shims and stable api ids from vendor C headers
#[derive(Parser)]
#[command(name = "tracegen")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file (defaults to ./tracegen.toml when present)
    #[arg(long, global = true, env = "TRACEGEN_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate shims, id headers and lookup tables
    Generate(GenerateArgs),

    /// Check a shipped id header against a vendor function-id enum
    Validate(ValidateArgs),

    /// Show the functions, callback slots and enums of a header set
    Scan(ScanArgs),
}

#[derive(Args)]
pub struct GenerateArgs {
    /// Directory of the vendor headers
    #[arg(long)]
    pub include_dir: PathBuf,

    /// Output directory
    #[arg(short, long)]
    pub out_dir: PathBuf,

    /// Directory of the id headers (defaults to the output directory)
    #[arg(long)]
    pub id_dir: Option<PathBuf>,

    /// Hand-written hook source scanned for OnEnter/OnExit functions
    #[arg(long)]
    pub hooks: Option<PathBuf>,

    /// Assign ids and rewrite the id headers
    #[arg(long)]
    pub regenerate: bool,

    /// Write a JSON report of the run
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Register functions without a dispatch-table slot one by one
    #[arg(long)]
    pub allow_partial: bool,
}

#[derive(Args)]
pub struct ValidateArgs {
    /// Shipped id header
    #[arg(long)]
    pub id_file: PathBuf,

    /// Vendor header declaring the function-id enum
    #[arg(long)]
    pub vendor_header: PathBuf,

    /// Name of the function-id enum
    #[arg(long)]
    pub enum_name: Option<String>,

    /// Fail on id mismatches, not only on reassigned ids
    #[arg(long)]
    pub strict: bool,

    /// Print findings as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct ScanArgs {
    /// Directory of the vendor headers
    #[arg(long)]
    pub include_dir: PathBuf,

    /// Headers to scan, relative to the include directory
    #[arg(long = "header")]
    pub headers: Vec<String>,

    /// Tolerate functions without a dispatch-table slot
    #[arg(long)]
    pub allow_partial: bool,

    /// Print the scan as JSON
    #[arg(long)]
    pub json: bool,
}
