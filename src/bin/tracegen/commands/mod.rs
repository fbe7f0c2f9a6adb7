//! Command implementations

pub mod generate;
pub mod scan;
pub mod validate;

use std::path::Path;

use anyhow::{Context, Result};
use tracegen::util::config::Config;

/// Configuration of this invocation.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let cwd = std::env::current_dir().context("failed to read the current directory")?;
    Config::discover(explicit, &cwd)
}
