//! Structural scan errors.
//!
//! Every variant means the header no longer matches the dialect the generator
//! understands. None of them is recoverable: partial output would be wrong.

use std::path::PathBuf;

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::util::diagnostic::Diagnostic;

#[derive(Debug, Error, MietteDiagnostic)]
pub enum ScanError {
    #[error("failed to read header `{}`", .path.display())]
    #[diagnostic(code(tracegen::scan::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("structure `{name}` not found in `{file}`")]
    #[diagnostic(
        code(tracegen::scan::structure_not_found),
        help("Check that the vendor header version matches the generator dialect")
    )]
    StructureNotFound { file: String, name: String },

    #[error("no `{expected}` found for `{name}` after {file}:{line}")]
    #[diagnostic(code(tracegen::scan::unbalanced_brace))]
    UnbalancedBrace {
        file: String,
        name: String,
        line: usize,
        expected: char,
    },

    #[error("{message} at {file}:{line}: `{text}`")]
    #[diagnostic(code(tracegen::scan::unbalanced_conditional))]
    UnbalancedConditional {
        file: String,
        line: usize,
        text: String,
        message: &'static str,
    },

    #[error("unrecognized declaration at {file}:{line}: `{text}` (expected {expected})")]
    #[diagnostic(code(tracegen::scan::unrecognized_declaration))]
    UnrecognizedDeclaration {
        file: String,
        line: usize,
        text: String,
        expected: &'static str,
    },

    #[error("cannot parse parameter of `{function}` at {file}:{line}: `{text}` ({reason})")]
    #[diagnostic(
        code(tracegen::scan::parameter_parse),
        help("Parameter struct fields must look like `type* pName;`")
    )]
    ParameterParse {
        file: String,
        function: String,
        line: usize,
        text: String,
        reason: &'static str,
    },

    #[error("function `{function}` has no callback group in `{table}`")]
    #[diagnostic(
        code(tracegen::scan::group_mapping),
        help("The function list and the dispatch table disagree; pass --allow-partial to register it per function")
    )]
    GroupMapping { function: String, table: String },

    #[error("function `{function}` appears in callback groups `{first}` and `{second}`")]
    #[diagnostic(code(tracegen::scan::duplicate_group_entry))]
    DuplicateGroupEntry {
        function: String,
        first: String,
        second: String,
    },

    #[error("enum `{name}` is defined in both `{first}` and `{second}`")]
    #[diagnostic(code(tracegen::scan::duplicate_enum))]
    DuplicateEnum {
        name: String,
        first: String,
        second: String,
    },

    #[error("enum `{name}` declares `{member}` twice ({file}:{line})")]
    #[diagnostic(code(tracegen::scan::duplicate_enum_member))]
    DuplicateEnumMember {
        name: String,
        member: String,
        file: String,
        line: usize,
    },

    #[error("`{name}` in `{file}` has no members")]
    #[diagnostic(code(tracegen::scan::empty_structure))]
    EmptyStructure { file: String, name: String },
}

impl ScanError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let mut diag = Diagnostic::error(self.to_string());

        match self {
            ScanError::Io { path, source } => {
                diag = diag
                    .with_location(path)
                    .with_context(source.to_string())
                    .with_suggestion("Check the --include-dir and the category header list");
            }
            ScanError::StructureNotFound { .. } | ScanError::UnbalancedBrace { .. } => {
                diag = diag
                    .with_context("invariant: every referenced type has a `{ ... }` body")
                    .with_suggestion("Check that the vendor header version matches the dialect");
            }
            ScanError::UnbalancedConditional { .. } => {
                diag = diag.with_context(
                    "invariant: one flat `#if/#else/#endif` level inside struct bodies",
                );
            }
            ScanError::UnrecognizedDeclaration { .. } | ScanError::ParameterParse { .. } => {
                diag = diag.with_context("invariant: one declaration per line");
            }
            ScanError::GroupMapping { function, .. } => {
                diag = diag
                    .with_context(format!(
                        "invariant: `{}` must have exactly one dispatch-table slot",
                        function
                    ))
                    .with_suggestion("Pass --allow-partial to register it per function");
            }
            ScanError::DuplicateGroupEntry { .. } => {
                diag = diag.with_context("invariant: one dispatch-table slot per function");
            }
            ScanError::DuplicateEnum { .. } | ScanError::DuplicateEnumMember { .. } => {
                diag = diag.with_context("invariant: enum and member names are unique");
            }
            ScanError::EmptyStructure { .. } => {}
        }

        if let Some(code) = self.code() {
            diag = diag.with_context(format!("code: {}", code));
        }

        diag
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_mapping_diagnostic() {
        let err = ScanError::GroupMapping {
            function: "zeFooBar".to_string(),
            table: "ze_callbacks_t".to_string(),
        };

        let output = err.to_diagnostic().format(false);
        assert!(output.contains("error: function `zeFooBar` has no callback group"));
        assert!(output.contains("tracegen::scan::group_mapping"));
        assert!(output.contains("--allow-partial"));
    }
}
