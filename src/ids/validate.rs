//! Cross-checking an id header against a vendor function-id enum.

use std::fmt;

use serde::Serialize;

use crate::core::ApiEntry;

use super::existing::ExistingIds;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingLevel {
    Warning,
    Error,
    Fatal,
}

impl fmt::Display for FindingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FindingLevel::Warning => write!(f, "WARNING"),
            FindingLevel::Error => write!(f, "ERROR"),
            FindingLevel::Fatal => write!(f, "FATAL"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub level: FindingLevel,
    pub function: String,
    pub vendor_id: u32,
    pub message: String,
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.level, self.message)
    }
}

/// Compare every vendor `(name, id)` with the shipped id header.
///
/// - a vendor name missing from the header is a warning;
/// - a different id is an error, unless the header's owner of the vendor id
///   is a versioned name of the same function;
/// - a mismatching vendor id that the header gives to some other name is
///   additionally fatal: the vendor renumbered a shipped id.
pub fn validate_against_vendor(existing: &ExistingIds, vendor: &[ApiEntry]) -> Vec<Finding> {
    let mut findings = Vec::new();

    for entry in vendor {
        let Some(vendor_id) = entry.default_id else {
            continue;
        };
        let name = entry.name.as_str();
        let finding = |level: FindingLevel, message: String| Finding {
            level,
            function: name.to_string(),
            vendor_id,
            message,
        };

        let Some(shipped_id) = existing.get(name) else {
            findings.push(finding(
                FindingLevel::Warning,
                format!("vendor id {} for {} not found in the id header", vendor_id, name),
            ));
            continue;
        };

        let owner = existing.name_of(vendor_id);
        if shipped_id == vendor_id || owner.is_some_and(|o| o.starts_with(name)) {
            continue;
        }

        findings.push(finding(
            FindingLevel::Error,
            format!(
                "vendor id {} for {} does not match the shipped id {}",
                vendor_id, name, shipped_id
            ),
        ));
        if let Some(owner) = owner {
            findings.push(finding(
                FindingLevel::Fatal,
                format!(
                    "vendor id {} for {} has changed: the id header gives it to {}",
                    vendor_id, name, owner
                ),
            ));
        }
    }

    findings
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shipped() -> ExistingIds {
        ExistingIds::from_pairs(
            "runtime_sycl",
            [
                ("urContextCreate", 1),
                ("urContextRetain", 2),
                ("urEnqueueKernelLaunch", 3),
                ("urEnqueueKernelLaunch_v2", 9),
                ("urAdapterGet", 5),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_matching_ids_have_no_findings() {
        let vendor = vec![
            ApiEntry::with_default("urContextCreate", 1),
            ApiEntry::with_default("urEnqueueKernelLaunch", 9),
        ];
        assert!(validate_against_vendor(&shipped(), &vendor).is_empty());
    }

    #[test]
    fn test_missing_name_is_a_warning() {
        let vendor = vec![ApiEntry::with_default("urNew", 40)];
        let findings = validate_against_vendor(&shipped(), &vendor);

        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].level, FindingLevel::Warning);
        assert!(findings[0].to_string().starts_with("[WARNING]"));
    }

    #[test]
    fn test_mismatch_and_renumbering() {
        let vendor = vec![
            ApiEntry::with_default("urContextRetain", 30),
            ApiEntry::with_default("urAdapterGet", 1),
        ];
        let findings = validate_against_vendor(&shipped(), &vendor);

        let levels: Vec<FindingLevel> = findings.iter().map(|f| f.level).collect();
        assert_eq!(
            levels,
            vec![FindingLevel::Error, FindingLevel::Error, FindingLevel::Fatal]
        );
        assert!(findings[2].message.contains("urContextCreate"));
    }
}
