//! Api-id stability engine.
//!
//! Numeric ids are a contract with compiled consumers. This module reads the
//! ids shipped by the previous run, assigns ids for the current header and
//! checks shipped ids against vendor-published ones.

pub mod assign;
pub mod error;
pub mod existing;
pub mod validate;

pub use assign::{assign_ids, IdAssignment, IdEvent};
pub use error::IdError;
pub use existing::ExistingIds;
pub use validate::{validate_against_vendor, Finding, FindingLevel};
