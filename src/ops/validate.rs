//! Implementation of `tracegen validate`.

use std::path::PathBuf;

use anyhow::Result;
use serde::Serialize;

use crate::ids::{validate_against_vendor, ExistingIds, Finding, FindingLevel, IdError};
use crate::scanner::{function_ids, HeaderSource, IdEnumSpec};

#[derive(Debug, Clone, Default)]
pub struct ValidateOptions {
    /// Shipped id header
    pub id_file: PathBuf,
    /// Vendor header carrying the function-id enum
    pub vendor_header: PathBuf,
    pub id_enum: IdEnumSpec,
    /// Fail on error-level findings too
    pub strict: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidateReport {
    pub id_file: PathBuf,
    pub checked: usize,
    pub strict: bool,
    pub findings: Vec<Finding>,
}

impl ValidateReport {
    pub fn count(&self, level: FindingLevel) -> usize {
        self.findings.iter().filter(|f| f.level == level).count()
    }

    /// Fatal findings always fail; errors fail in strict mode.
    pub fn failures(&self) -> usize {
        let errors = if self.strict {
            self.count(FindingLevel::Error)
        } else {
            0
        };
        self.count(FindingLevel::Fatal) + errors
    }

    /// [`IdError::ValidationFailed`] when any finding fails the run.
    pub fn check(&self) -> Result<(), IdError> {
        match self.failures() {
            0 => Ok(()),
            errors => Err(IdError::ValidationFailed {
                file: self.id_file.display().to_string(),
                errors,
            }),
        }
    }
}

/// Check an id header against the vendor's function-id enum.
///
/// The report carries every finding; callers show it and then call
/// [`ValidateReport::check`] to turn failing findings into an error.
pub fn validate(opts: &ValidateOptions) -> Result<ValidateReport> {
    let existing = ExistingIds::load(&opts.id_file)?.ok_or_else(|| IdError::MissingIdFile {
        path: opts.id_file.clone(),
    })?;
    let vendor_source = HeaderSource::open(&opts.vendor_header)?;
    let vendor = function_ids(&vendor_source, &opts.id_enum)?;

    let findings = validate_against_vendor(&existing, &vendor);
    for finding in &findings {
        match finding.level {
            FindingLevel::Warning => tracing::warn!("{}", finding),
            FindingLevel::Error | FindingLevel::Fatal => tracing::error!("{}", finding),
        }
    }

    let report = ValidateReport {
        id_file: opts.id_file.clone(),
        checked: vendor.len(),
        strict: opts.strict,
        findings,
    };

    tracing::info!(
        "{}: {} vendor ids checked, {} warnings, {} errors",
        opts.id_file.display(),
        report.checked,
        report.count(FindingLevel::Warning),
        report.count(FindingLevel::Error)
    );
    Ok(report)
}
