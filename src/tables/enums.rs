//! Enum discovery and value resolution.

use std::collections::BTreeMap;

use crate::core::{EnumDefinition, EnumMember, EnumValue};
use crate::scanner::{recognize, HeaderSource, ScanError};

/// Collects `typedef enum` blocks across headers, rejecting duplicates.
#[derive(Debug, Default)]
pub struct EnumCollector {
    enums: BTreeMap<String, EnumDefinition>,
    origins: BTreeMap<String, String>,
}

impl EnumCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add every enum declared in `source`.
    pub fn scan(&mut self, source: &HeaderSource) -> Result<(), ScanError> {
        for (index, line) in source.lines().iter().enumerate() {
            let line = line.trim();
            let name = recognize::enum_typedef(line).map_err(|m| {
                ScanError::UnrecognizedDeclaration {
                    file: source.name().to_string(),
                    line: index + 1,
                    text: line.to_string(),
                    expected: m.0,
                }
            })?;
            let Some(name) = name else { continue };

            if let Some(first) = self.origins.get(&name) {
                return Err(ScanError::DuplicateEnum {
                    name,
                    first: first.clone(),
                    second: source.name().to_string(),
                });
            }

            let definition = read_enum(source, index, &name)?;
            tracing::debug!("enum {} ({} members)", name, definition.len());
            self.origins.insert(name.clone(), source.name().to_string());
            self.enums.insert(name, definition);
        }
        Ok(())
    }

    pub fn finish(self) -> BTreeMap<String, EnumDefinition> {
        self.enums
    }
}

/// Read and resolve one enum whose typedef sits on line `index`.
///
/// Literal values resolve; an implicit member is the previous value plus one,
/// starting at 0. After a symbolic value the following implicit members stay
/// symbolic (`PREV + 1`).
pub fn read_enum(
    source: &HeaderSource,
    index: usize,
    name: &str,
) -> Result<EnumDefinition, ScanError> {
    let range = source.struct_range_at(index, name)?;
    let mut members: Vec<EnumMember> = Vec::new();
    let mut next: Option<i64> = Some(0);

    for line in source.guarded_lines(range)? {
        let parsed =
            recognize::enum_member(&line.text).map_err(|m| ScanError::UnrecognizedDeclaration {
                file: source.name().to_string(),
                line: line.number,
                text: line.text.clone(),
                expected: m.0,
            })?;

        if members.iter().any(|m| m.name == parsed.name) {
            return Err(ScanError::DuplicateEnumMember {
                name: name.to_string(),
                member: parsed.name,
                file: source.name().to_string(),
                line: line.number,
            });
        }

        let value = match parsed.value {
            Some(expr) => match recognize::parse_literal(&expr) {
                Some(v) => EnumValue::Resolved(v),
                None => EnumValue::Unresolved(expr),
            },
            None => match (next, members.last()) {
                (Some(v), _) => EnumValue::Resolved(v),
                (None, Some(prev)) => EnumValue::Unresolved(format!("{} + 1", prev.name)),
                (None, None) => EnumValue::Unresolved("0".to_string()),
            },
        };

        next = value.as_i64().and_then(|v| v.checked_add(1));
        members.push(EnumMember {
            name: parsed.name,
            value,
        });
    }

    if members.is_empty() {
        return Err(ScanError::EmptyStructure {
            file: source.name().to_string(),
            name: name.to_string(),
        });
    }

    Ok(EnumDefinition::new(name, members))
}
