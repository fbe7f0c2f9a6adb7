//! `tracegen scan` command

use std::path::Path;

use anyhow::Result;

use crate::cli::ScanArgs;
use tracegen::ops::scan::{format_scan, scan, ScanOptions};

pub fn execute(args: ScanArgs, config: Option<&Path>) -> Result<()> {
    let config = super::load_config(config)?;

    let options = ScanOptions {
        include_dir: args.include_dir,
        headers: args.headers,
        allow_partial: args.allow_partial,
    };

    let report = scan(&config, &options)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", format_scan(&report));
    }

    Ok(())
}
