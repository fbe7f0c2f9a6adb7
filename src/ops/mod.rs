//! High-level operations.
//!
//! This module contains the implementation of tracegen commands.

pub mod generate;
pub mod scan;
pub mod validate;

pub use generate::{generate, GenerateOptions, GenerateReport, OutputLayout};
pub use scan::{format_scan, scan, ScanOptions, ScanReport};
pub use validate::{validate, ValidateOptions, ValidateReport};
