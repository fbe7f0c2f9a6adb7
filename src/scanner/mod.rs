//! Header scanner.
//!
//! Pattern-based scanning of vendor headers written in a stable dialect:
//! one declaration per line, struct bodies delimited by the first `{` and
//! `}` after their name, and at most one flat level of preprocessor
//! conditionals inside a body. This is not a C parser.

pub mod dialect;
pub mod error;
pub mod id_enum;
pub mod recognize;
pub mod source;

pub use dialect::{Acronym, Dialect};
pub use error::ScanError;
pub use id_enum::{function_ids, IdEnumSpec};
pub use source::{GuardedLine, HeaderSource};
