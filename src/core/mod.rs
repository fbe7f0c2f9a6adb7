//! Core data structures for tracegen.
//!
//! This module contains the value types threaded through a generation run:
//! - Functions, parameters and their callback-group paths
//! - Preprocessor guards attached to dispatch-table fields
//! - Resolved enum definitions
//! - Id categories and the persistent api-id records

pub mod api_id;
pub mod category;
pub mod enums;
pub mod function;
pub mod guard;

pub use api_id::{ApiEntry, ApiIdRecord, RecordOrigin, RESERVED_ID};
pub use category::Category;
pub use enums::{EnumDefinition, EnumMember, EnumValue};
pub use function::{CallbackGroupPath, Function, Param};
pub use guard::Guard;
