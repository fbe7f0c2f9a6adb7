//! Persistent api-id records.
//!
//! A record is the identity contract of one function inside one category:
//! once a `(name, id)` pair has been emitted, consumers may be compiled
//! against it, so it is never reassigned to another function.

use serde::Serialize;

use super::category::Category;

/// Id 0 is the `reserved_<category>_id` sentinel ("no function").
pub const RESERVED_ID: u32 = 0;

/// A function as seen by the id engine: its name and, when the vendor header
/// hard-codes one, its explicit id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiEntry {
    pub name: String,
    pub default_id: Option<u32>,
}

impl ApiEntry {
    pub fn new(name: impl Into<String>) -> Self {
        ApiEntry {
            name: name.into(),
            default_id: None,
        }
    }

    pub fn with_default(name: impl Into<String>, id: u32) -> Self {
        ApiEntry {
            name: name.into(),
            default_id: Some(id),
        }
    }
}

/// Whether a record belongs to a function of the current header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordOrigin {
    /// The id the current header's function is known by
    Current,
    /// A previously shipped pair kept for older consumers
    Residual,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiIdRecord {
    /// Base function name, without version tag
    pub function_name: String,
    pub numeric_id: u32,
    pub category: Category,
    /// `Some(n)` renders as `_vN`; always >= 2
    pub version: Option<u32>,
    pub origin: RecordOrigin,
}

impl ApiIdRecord {
    /// Name including the version tag, e.g. `urEnqueueKernelLaunch_v2`.
    pub fn versioned_name(&self) -> String {
        versioned_name(&self.function_name, self.version)
    }

    /// Enumerator name in the generated id header, e.g. `zeInit_id`.
    pub fn enumerator(&self) -> String {
        format!("{}_id", self.versioned_name())
    }
}

/// Split a trailing `_vN` tag (N >= 2) off a name.
pub fn split_version(name: &str) -> (&str, Option<u32>) {
    if let Some(pos) = name.rfind("_v") {
        let digits = &name[pos + 2..];
        if !digits.is_empty() && pos > 0 && digits.chars().all(|c| c.is_ascii_digit()) {
            if let Ok(version) = digits.parse::<u32>() {
                if version >= 2 {
                    return (&name[..pos], Some(version));
                }
            }
        }
    }
    (name, None)
}

/// Join a base name and an optional version into `base[_vN]`.
pub fn versioned_name(base: &str, version: Option<u32>) -> String {
    match version {
        Some(v) => format!("{}_v{}", base, v),
        None => base.to_string(),
    }
}
