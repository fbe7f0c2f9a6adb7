//! Id engine errors.

use std::path::PathBuf;

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::util::diagnostic::Diagnostic;

#[derive(Debug, Error, MietteDiagnostic)]
pub enum IdError {
    #[error("api id {id} is used by both `{first}` and `{second}` in {scope}")]
    #[diagnostic(
        code(tracegen::ids::duplicated_api_id),
        help("Each numeric id may name exactly one function per category")
    )]
    DuplicatedApiId {
        scope: String,
        id: u32,
        first: String,
        second: String,
    },

    #[error("api name `{name}` appears twice in {scope}")]
    #[diagnostic(code(tracegen::ids::duplicated_api_name))]
    DuplicatedApiName { scope: String, name: String },

    #[error("`{name}` claims the reserved id 0 in {scope}")]
    #[diagnostic(code(tracegen::ids::reserved_id))]
    ReservedId { scope: String, name: String },

    #[error("malformed id entry at {file}:{line}: `{text}`")]
    #[diagnostic(
        code(tracegen::ids::malformed_id_file),
        help("Entries must look like `name_id=N,`")
    )]
    MalformedIdFile {
        file: String,
        line: usize,
        text: String,
    },

    #[error("id file `{}` does not exist", .path.display())]
    #[diagnostic(
        code(tracegen::ids::missing_id_file),
        help("Run `tracegen generate --regenerate` once to create it")
    )]
    MissingIdFile { path: PathBuf },

    #[error("failed to read id file `{}`", .path.display())]
    #[diagnostic(code(tracegen::ids::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{errors} validation error(s) in `{file}`")]
    #[diagnostic(code(tracegen::ids::validation_failed))]
    ValidationFailed { file: String, errors: usize },
}

impl IdError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let mut diag = Diagnostic::error(self.to_string());

        match self {
            IdError::DuplicatedApiId { .. } | IdError::DuplicatedApiName { .. } => {
                diag = diag
                    .with_context("invariant: ids and names are pairwise distinct per category")
                    .with_suggestion(
                        "Restore the previous id header from version control, or fix the vendor header defaults",
                    );
            }
            IdError::ReservedId { .. } => {
                diag = diag.with_context("invariant: id 0 is the `reserved_` sentinel");
            }
            IdError::MalformedIdFile { .. } => {
                diag = diag.with_suggestion("Do not edit generated id headers by hand");
            }
            IdError::MissingIdFile { path } => {
                diag = diag
                    .with_location(path)
                    .with_suggestion("Run `tracegen generate --regenerate` to create it");
            }
            IdError::Io { path, source } => {
                diag = diag.with_location(path).with_context(source.to_string());
            }
            IdError::ValidationFailed { .. } => {
                diag = diag.with_suggestion(
                    "Fix the id header, or drop --strict to accept id mismatches",
                );
            }
        }

        if let Some(code) = self.code() {
            diag = diag.with_context(format!("code: {}", code));
        }

        diag
    }
}
