//! Implementation of `tracegen scan`.

use std::fmt::Write;
use std::path::PathBuf;

use anyhow::{bail, Result};
use serde::Serialize;

use crate::core::Param;
use crate::scanner::HeaderSource;
use crate::tables::{SymbolTables, SymbolTablesBuilder};
use crate::util::config::Config;
use crate::util::fs::header_files;

#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    pub include_dir: PathBuf,
    /// Headers relative to `include_dir`; empty uses the traced category's
    pub headers: Vec<String>,
    pub allow_partial: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub headers: Vec<String>,
    pub api_version: Option<String>,
    pub functions: Vec<ScannedFunction>,
    pub uncovered: Vec<String>,
    pub enums: Vec<ScannedEnum>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScannedFunction {
    pub name: String,
    pub callback: String,
    pub param_struct: String,
    pub params: Vec<Param>,
    /// `Group.pfnLeafCb`, absent for uncovered functions
    pub slot: Option<String>,
    pub guard: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScannedEnum {
    pub name: String,
    pub members: usize,
    pub resolved: usize,
}

/// Scan a header set and describe what the generator would see.
pub fn scan(config: &Config, opts: &ScanOptions) -> Result<ScanReport> {
    let headers = if opts.headers.is_empty() {
        match config.category.iter().find(|c| c.is_traced()) {
            Some(category) => category.headers.clone(),
            None => bail!("no headers given and no traced category configured"),
        }
    } else {
        opts.headers.clone()
    };

    let sources = headers
        .iter()
        .map(|h| HeaderSource::open(&opts.include_dir.join(h)))
        .collect::<Result<Vec<_>, _>>()?;
    let enum_sources = header_files(&opts.include_dir)?
        .iter()
        .map(|p| HeaderSource::open(p))
        .collect::<Result<Vec<_>, _>>()?;

    let tables = SymbolTablesBuilder::new(&config.dialect)
        .tolerate_partial_coverage(config.scan.tolerate_partial_coverage || opts.allow_partial)
        .build(&sources, &enum_sources)?;

    Ok(report(config, headers, &tables))
}

fn report(config: &Config, headers: Vec<String>, tables: &SymbolTables) -> ScanReport {
    let functions = tables
        .functions
        .iter()
        .map(|f| {
            let group = tables.group(&f.name);
            ScannedFunction {
                name: f.name.clone(),
                callback: config.dialect.callback_type(&f.name),
                param_struct: f.param_struct.clone(),
                params: f.params.clone(),
                slot: group.map(|g| g.member_path()),
                guard: group.and_then(|g| g.guard()).map(|g| g.to_string()),
            }
        })
        .collect();

    let enums = tables
        .enums
        .values()
        .map(|def| ScannedEnum {
            name: def.name.clone(),
            members: def.len(),
            resolved: def.resolved().count(),
        })
        .collect();

    ScanReport {
        headers,
        api_version: tables.api_version.clone(),
        functions,
        uncovered: tables.uncovered.clone(),
        enums,
    }
}

/// Human readable listing of a scan.
pub fn format_scan(report: &ScanReport) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "Headers: {}", report.headers.join(", "));
    if let Some(version) = &report.api_version {
        let _ = writeln!(output, "Version: {}", version);
    }
    let _ = writeln!(output, "\nFunctions ({}):", report.functions.len());
    for function in &report.functions {
        let slot = function.slot.as_deref().unwrap_or("(registered per function)");
        let _ = writeln!(output, "  {} -> {}", function.name, slot);
        if let Some(guard) = &function.guard {
            let _ = writeln!(output, "      #if {}", guard);
        }
        for param in &function.params {
            let _ = writeln!(output, "      {} {}", param.ty, param.name);
        }
    }

    let _ = writeln!(output, "\nEnums ({}):", report.enums.len());
    for def in &report.enums {
        let _ = writeln!(
            output,
            "  {} ({} members, {} resolved)",
            def.name, def.members, def.resolved
        );
    }

    output
}
