//! Function-id enums.
//!
//! Some vendors publish the id of every api function in an enum such as
//!
//! ```c
//! typedef enum ur_function_t {
//!     UR_FUNCTION_CONTEXT_CREATE = 1, ///< Enumerator for ::urContextCreate
//!     /// Enumerator for ::urAdapterGet
//!     UR_FUNCTION_ADAPTER_GET = 179,
//!     UR_FUNCTION_FORCE_UINT32 = 0x7fffffff
//! } ur_function_t;
//! ```
//!
//! Those ids become the explicit defaults of the category.

use serde::{Deserialize, Serialize};

use crate::core::ApiEntry;

use super::error::ScanError;
use super::recognize;
use super::source::HeaderSource;

/// Where and how to read a function-id enum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdEnumSpec {
    pub enum_name: String,
    /// Prefix of every entry line, e.g. `UR_FUNCTION_`
    pub entry_prefix: String,
    /// Text preceding the api name in the entry's doc comment
    pub name_marker: String,
    /// Entry that closes the list
    pub terminator: String,
}

impl Default for IdEnumSpec {
    fn default() -> Self {
        IdEnumSpec {
            enum_name: "ur_function_t".to_string(),
            entry_prefix: "UR_FUNCTION_".to_string(),
            name_marker: "Enumerator for ::".to_string(),
            terminator: "FORCE_UINT32".to_string(),
        }
    }
}

/// Read `(api name, id)` entries from a function-id enum, in declaration order.
pub fn function_ids(source: &HeaderSource, spec: &IdEnumSpec) -> Result<Vec<ApiEntry>, ScanError> {
    let start = source
        .lines()
        .iter()
        .position(|l| l.contains("typedef enum") && l.contains(spec.enum_name.as_str()))
        .ok_or_else(|| ScanError::StructureNotFound {
            file: source.name().to_string(),
            name: spec.enum_name.clone(),
        })?;

    let unrecognized = |index: usize, text: &str, expected: &'static str| {
        ScanError::UnrecognizedDeclaration {
            file: source.name().to_string(),
            line: index + 1,
            text: text.to_string(),
            expected,
        }
    };

    let mut entries = Vec::new();
    let mut pending_name: Option<String> = None;

    for (index, raw) in source.lines().iter().enumerate().skip(start + 1) {
        let line = raw.trim();
        if line.starts_with('}') || line.contains(spec.terminator.as_str()) {
            break;
        }

        if line.starts_with("///") {
            if let Some(name) = name_after_marker(line, &spec.name_marker) {
                pending_name = Some(name);
            }
            continue;
        }

        if !line.starts_with(spec.entry_prefix.as_str()) || !line.contains('=') {
            continue;
        }

        let value = line
            .split_once('=')
            .map(|(_, rhs)| rhs.split(',').next().unwrap_or(rhs).trim())
            .unwrap_or_default();
        let id = recognize::parse_literal(value)
            .and_then(|v| u32::try_from(v).ok())
            .ok_or_else(|| unrecognized(index, line, "numeric function id"))?;

        let name = name_after_marker(line, &spec.name_marker)
            .or_else(|| pending_name.take())
            .ok_or_else(|| unrecognized(index, line, "function name after the enumerator marker"))?;
        pending_name = None;

        entries.push(ApiEntry::with_default(name, id));
    }

    Ok(entries)
}

fn name_after_marker(line: &str, marker: &str) -> Option<String> {
    let (_, rest) = line.split_once(marker)?;
    let name: String = rest
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();
    (!name.is_empty()).then_some(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::fixtures;

    #[test]
    fn test_function_ids_from_fixture() {
        let source = HeaderSource::from_text("ur_api.h", fixtures::UR_API_H);
        let entries = function_ids(&source, &IdEnumSpec::default()).unwrap();

        assert_eq!(
            entries,
            vec![
                ApiEntry::with_default("urContextCreate", 1),
                ApiEntry::with_default("urContextRetain", 2),
                ApiEntry::with_default("urAdapterGet", 5),
            ]
        );
    }

    #[test]
    fn test_missing_enum() {
        let source = HeaderSource::from_text("ur_api.h", "typedef enum ur_other_t {\n} ur_other_t;\n");
        let err = function_ids(&source, &IdEnumSpec::default()).unwrap_err();
        assert!(matches!(err, ScanError::StructureNotFound { .. }));
    }

    #[test]
    fn test_entry_without_name() {
        let text = "typedef enum ur_function_t {\n    UR_FUNCTION_X = 3,\n} ur_function_t;\n";
        let source = HeaderSource::from_text("ur_api.h", text);
        let err = function_ids(&source, &IdEnumSpec::default()).unwrap_err();
        assert!(matches!(err, ScanError::UnrecognizedDeclaration { line: 2, .. }));
    }
}
