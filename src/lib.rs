//! tracegen - tracing shims and stable api ids from vendor C headers
//!
//! This crate scans the callback declarations of a vendor C API, renders the
//! enter/exit shims that forward to hand-written hooks, and keeps the numeric
//! id of every api function stable across header revisions.

pub mod core;
pub mod emit;
pub mod ids;
pub mod ops;
pub mod scanner;
pub mod tables;
pub mod util;

/// Shared header fixtures for unit tests.
#[cfg(test)]
pub mod test_support;

pub use core::{ApiIdRecord, Category, EnumDefinition, Function, Guard};
pub use ids::{assign_ids, ExistingIds, IdAssignment};
pub use tables::{SymbolTables, SymbolTablesBuilder};
