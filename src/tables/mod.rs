//! Symbol tables.
//!
//! Turns scanned headers into one immutable [`SymbolTables`] value: the
//! function list, each function's parameters, its callback-group path and the
//! resolved enums.

pub mod enums;
pub mod groups;
pub mod params;

use std::collections::{BTreeMap, HashSet};

use crate::core::{CallbackGroupPath, EnumDefinition, Function, Param};
use crate::scanner::{Dialect, HeaderSource, ScanError};

pub use enums::EnumCollector;

#[derive(Debug, Clone, Default)]
pub struct SymbolTables {
    /// Interceptable functions in header order
    pub functions: Vec<Function>,
    pub groups: BTreeMap<String, CallbackGroupPath>,
    pub enums: BTreeMap<String, EnumDefinition>,
    /// Functions without a dispatch-table slot (tolerated runs only)
    pub uncovered: Vec<String>,
    /// Version line of the first header, if any
    pub api_version: Option<String>,
}

impl SymbolTables {
    pub fn function(&self, name: &str) -> Option<&Function> {
        self.functions.iter().find(|f| f.name == name)
    }

    pub fn params(&self, name: &str) -> Option<&[Param]> {
        self.function(name).map(|f| f.params.as_slice())
    }

    pub fn group(&self, name: &str) -> Option<&CallbackGroupPath> {
        self.groups.get(name)
    }

    pub fn enum_def(&self, name: &str) -> Option<&EnumDefinition> {
        self.enums.get(name)
    }

    /// Functions with a dispatch-table slot, in header order.
    pub fn mapped_functions(&self) -> impl Iterator<Item = (&Function, &CallbackGroupPath)> {
        self.functions
            .iter()
            .filter_map(|f| self.groups.get(&f.name).map(|g| (f, g)))
    }

    pub fn function_names(&self) -> impl Iterator<Item = &str> {
        self.functions.iter().map(|f| f.name.as_str())
    }
}

/// Builder for [`SymbolTables`].
pub struct SymbolTablesBuilder<'a> {
    dialect: &'a Dialect,
    tolerate_partial_coverage: bool,
}

impl<'a> SymbolTablesBuilder<'a> {
    pub fn new(dialect: &'a Dialect) -> Self {
        SymbolTablesBuilder {
            dialect,
            tolerate_partial_coverage: false,
        }
    }

    /// Report functions without a callback group instead of failing.
    pub fn tolerate_partial_coverage(mut self, tolerate: bool) -> Self {
        self.tolerate_partial_coverage = tolerate;
        self
    }

    /// Build the tables from the api headers and the enum headers.
    pub fn build(
        self,
        headers: &[HeaderSource],
        enum_headers: &[HeaderSource],
    ) -> Result<SymbolTables, ScanError> {
        let dialect = self.dialect;

        let mut seen = HashSet::new();
        let mut names = Vec::new();
        for header in headers {
            for name in header.callback_functions(dialect)? {
                if seen.insert(name.clone()) {
                    names.push(name);
                } else {
                    tracing::debug!("{} declared again in {}, ignored", name, header.name());
                }
            }
        }

        let mut functions = Vec::with_capacity(names.len());
        for name in names {
            let param_struct = dialect.param_struct_name(&name);
            let source = headers
                .iter()
                .find(|h| h.contains(&param_struct))
                .ok_or_else(|| ScanError::StructureNotFound {
                    file: groups::header_names(headers),
                    name: param_struct.clone(),
                })?;
            let params = params::read_params(source, &name, &param_struct)?;
            functions.push(Function {
                name,
                params,
                param_struct,
                return_type: dialect.result_type.clone(),
            });
        }

        let groups = groups::read_groups(headers, dialect)?;

        let mut uncovered = Vec::new();
        for function in &functions {
            if groups.contains_key(&function.name) {
                continue;
            }
            if !self.tolerate_partial_coverage {
                return Err(ScanError::GroupMapping {
                    function: function.name.clone(),
                    table: dialect.dispatch_table.clone(),
                });
            }
            tracing::warn!(
                "{} has no slot in {}, registering it per function",
                function.name,
                dialect.dispatch_table
            );
            uncovered.push(function.name.clone());
        }

        let mut collector = EnumCollector::new();
        for header in enum_headers {
            collector.scan(header)?;
        }

        let enums = collector.finish();

        let api_version = headers
            .first()
            .and_then(|h| h.version_line(&dialect.version_marker));

        tracing::debug!(
            "{} functions, {} mapped, {} enums",
            functions.len(),
            groups.len(),
            enums.len()
        );

        Ok(SymbolTables {
            functions,
            groups,
            enums,
            uncovered,
            api_version,
        })
    }
}
