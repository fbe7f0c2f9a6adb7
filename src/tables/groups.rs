//! Dispatch-table decoding.
//!
//! The dispatch table is a struct of group structs, each a struct of callback
//! pointers:
//!
//! ```c
//! typedef struct _ze_callbacks_t {
//!     ze_global_callbacks_t Global;
//!     ze_command_list_callbacks_t CommandList;
//! } ze_callbacks_t;
//! ```

use std::collections::BTreeMap;

use crate::core::CallbackGroupPath;
use crate::scanner::{recognize, Dialect, GuardedLine, HeaderSource, ScanError};

/// Map every callback in the dispatch table to its group path.
pub fn read_groups(
    headers: &[HeaderSource],
    dialect: &Dialect,
) -> Result<BTreeMap<String, CallbackGroupPath>, ScanError> {
    let table = &dialect.dispatch_table;
    let (source, group_lines) = struct_fields(headers, table)?;
    if group_lines.is_empty() {
        return Err(ScanError::EmptyStructure {
            file: source.name().to_string(),
            name: table.clone(),
        });
    }

    let mut groups: BTreeMap<String, CallbackGroupPath> = BTreeMap::new();

    for group_line in &group_lines {
        let group = field(source, group_line)?;
        let (leaf_source, leaf_lines) = struct_fields(headers, &group.ty)?;

        for leaf_line in &leaf_lines {
            let leaf = field(leaf_source, leaf_line)?;
            let function = dialect.function_from_callback(&leaf.ty).ok_or_else(|| {
                ScanError::UnrecognizedDeclaration {
                    file: leaf_source.name().to_string(),
                    line: leaf_line.number,
                    text: leaf_line.text.clone(),
                    expected: "callback pointer field",
                }
            })?;

            let path = CallbackGroupPath {
                group_field: group.field.clone(),
                group_guard: group_line.guard.clone(),
                leaf_field: leaf.field,
                leaf_guard: leaf_line.guard.clone(),
            };

            if let Some(first) = groups.get(&function) {
                return Err(ScanError::DuplicateGroupEntry {
                    function,
                    first: first.member_path(),
                    second: path.member_path(),
                });
            }
            tracing::debug!("{} -> {}", function, path.member_path());
            groups.insert(function, path);
        }
    }

    Ok(groups)
}

/// Guarded body lines of the first header declaring `name`.
fn struct_fields<'a>(
    headers: &'a [HeaderSource],
    name: &str,
) -> Result<(&'a HeaderSource, Vec<GuardedLine>), ScanError> {
    let source = headers
        .iter()
        .find(|h| h.contains(name))
        .ok_or_else(|| ScanError::StructureNotFound {
            file: header_names(headers),
            name: name.to_string(),
        })?;
    let range = source.struct_range(name)?;
    Ok((source, source.guarded_lines(range)?))
}

fn field(source: &HeaderSource, line: &GuardedLine) -> Result<recognize::StructField, ScanError> {
    recognize::struct_field(&line.text).map_err(|m| ScanError::UnrecognizedDeclaration {
        file: source.name().to_string(),
        line: line.number,
        text: line.text.clone(),
        expected: m.0,
    })
}

pub(crate) fn header_names(headers: &[HeaderSource]) -> String {
    headers
        .iter()
        .map(|h| h.name())
        .collect::<Vec<_>>()
        .join(", ")
}
