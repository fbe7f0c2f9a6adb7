//! Previously emitted id headers.
//!
//! The id header is the only state carried between runs. Its entries are read
//! back as `versioned name -> id`:
//!
//! ```c
//! typedef enum _pti_api_id_driver_levelzero {
//!   reserved_driver_levelzero_id=0,
//!   zeInit_id=1,
//!   zeDriverGet_id=2,
//! } pti_api_id_driver_levelzero;
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use crate::core::api_id::split_version;
use crate::core::RESERVED_ID;

use super::error::IdError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExistingIds {
    entries: BTreeMap<String, u32>,
    next_free_hint: u32,
}

impl Default for ExistingIds {
    fn default() -> Self {
        Self::new()
    }
}

/// The prior record of a base name chosen for an incoming function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prior {
    pub name: String,
    pub id: u32,
    pub version: Option<u32>,
}

impl ExistingIds {
    /// No shipped ids; minting starts at 1.
    pub fn new() -> Self {
        ExistingIds {
            entries: BTreeMap::new(),
            next_free_hint: RESERVED_ID + 1,
        }
    }

    /// Build from `(versioned name, id)` pairs, rejecting duplicates.
    pub fn from_pairs<I, S>(scope: &str, pairs: I) -> Result<Self, IdError>
    where
        I: IntoIterator<Item = (S, u32)>,
        S: Into<String>,
    {
        let mut ids = Self::new();
        for (name, id) in pairs {
            ids.insert(scope, name.into(), id)?;
        }
        Ok(ids)
    }

    /// Parse the text of an id header.
    ///
    /// Entries are the `name_id=N,` lines after the `reserved_` sentinel, up
    /// to the closing brace.
    pub fn parse(file: &str, text: &str) -> Result<Self, IdError> {
        let mut ids = Self::new();
        if text.trim().is_empty() {
            return Ok(ids);
        }

        let lines: Vec<&str> = text.lines().collect();
        let start = lines
            .iter()
            .position(|l| l.contains("reserved_"))
            .ok_or_else(|| IdError::MalformedIdFile {
                file: file.to_string(),
                line: 1,
                text: "no `reserved_` sentinel".to_string(),
            })?;

        for (index, raw) in lines.iter().enumerate().skip(start + 1) {
            let line = raw.trim();
            if line.starts_with('}') || line.contains("pti_api_id_") {
                break;
            }
            if line.is_empty() || line.starts_with("//") {
                continue;
            }

            let malformed = || IdError::MalformedIdFile {
                file: file.to_string(),
                line: index + 1,
                text: line.to_string(),
            };

            let (lhs, rhs) = line.split_once('=').ok_or_else(malformed)?;
            let name = lhs
                .trim()
                .strip_suffix("_id")
                .filter(|n| !n.is_empty())
                .ok_or_else(malformed)?;
            let id = rhs
                .trim()
                .trim_end_matches(',')
                .trim()
                .parse::<u32>()
                .map_err(|_| malformed())?;

            ids.insert(file, name.to_string(), id)?;
        }

        Ok(ids)
    }

    /// Load an id header. A missing file yields `None`.
    pub fn load(path: &Path) -> Result<Option<Self>, IdError> {
        if !path.exists() {
            return Ok(None);
        }
        let text = std::fs::read_to_string(path).map_err(|source| IdError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file = path.display().to_string();
        Self::parse(&file, &text).map(Some)
    }

    /// Override where minting starts.
    pub fn with_next_free_hint(mut self, hint: u32) -> Self {
        self.next_free_hint = hint;
        self
    }

    pub fn next_free_hint(&self) -> u32 {
        self.next_free_hint
    }

    pub fn get(&self, versioned_name: &str) -> Option<u32> {
        self.entries.get(versioned_name).copied()
    }

    /// Entries ordered by versioned name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.entries.iter().map(|(n, id)| (n.as_str(), *id))
    }

    /// Name owning `id`, if any.
    pub fn name_of(&self, id: u32) -> Option<&str> {
        self.iter().find(|(_, i)| *i == id).map(|(n, _)| n)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The record an incoming function continues from.
    ///
    /// Among the entries sharing `base`, the one already carrying the
    /// function's explicit default wins; otherwise the highest version.
    pub fn prior_for(&self, base: &str, default_id: Option<u32>) -> Option<Prior> {
        let mut best: Option<Prior> = None;
        for (name, id) in self.iter() {
            let (entry_base, version) = split_version(name);
            if entry_base != base {
                continue;
            }
            let candidate = Prior {
                name: name.to_string(),
                id,
                version,
            };
            if default_id == Some(id) {
                return Some(candidate);
            }
            let better = match &best {
                None => true,
                Some(b) => version.unwrap_or(1) > b.version.unwrap_or(1),
            };
            if better {
                best = Some(candidate);
            }
        }
        best
    }

    fn insert(&mut self, scope: &str, name: String, id: u32) -> Result<(), IdError> {
        if id == RESERVED_ID {
            return Err(IdError::ReservedId {
                scope: scope.to_string(),
                name,
            });
        }
        if let Some(first) = self.name_of(id) {
            return Err(IdError::DuplicatedApiId {
                scope: scope.to_string(),
                id,
                first: first.to_string(),
                second: name,
            });
        }
        if self.entries.contains_key(&name) {
            return Err(IdError::DuplicatedApiName {
                scope: scope.to_string(),
                name,
            });
        }
        self.entries.insert(name, id);
        self.next_free_hint = self.next_free_hint.max(id.saturating_add(1));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID_FILE: &str = "\
// ApiFile: ze_api.h
#ifndef PTI_API_ID_DRIVER_LEVELZERO_H_
#define PTI_API_ID_DRIVER_LEVELZERO_H_

typedef enum _pti_api_id_driver_levelzero {
  reserved_driver_levelzero_id=0,
  zeInit_id=1,
  zeDriverGet_id=2,
  zeDriverGet_v2_id=7,
} pti_api_id_driver_levelzero;

#endif
";

    #[test]
    fn test_parse_id_file() {
        let ids = ExistingIds::parse("pti_driver_levelzero_api_ids.h", ID_FILE).unwrap();

        assert_eq!(ids.len(), 3);
        assert_eq!(ids.get("zeInit"), Some(1));
        assert_eq!(ids.get("zeDriverGet_v2"), Some(7));
        assert_eq!(ids.next_free_hint(), 8);
        assert_eq!(ids.name_of(2), Some("zeDriverGet"));
    }

    #[test]
    fn test_empty_file_starts_at_one() {
        let ids = ExistingIds::parse("x.h", "").unwrap();
        assert!(ids.is_empty());
        assert_eq!(ids.next_free_hint(), 1);
    }

    #[test]
    fn test_duplicates_are_fatal() {
        let dup_id = ID_FILE.replace("zeDriverGet_v2_id=7", "zeDriverGet_v2_id=2");
        assert!(matches!(
            ExistingIds::parse("x.h", &dup_id),
            Err(IdError::DuplicatedApiId { id: 2, .. })
        ));

        let dup_name = ID_FILE.replace("zeDriverGet_v2_id=7", "zeInit_id=9");
        assert!(matches!(
            ExistingIds::parse("x.h", &dup_name),
            Err(IdError::DuplicatedApiName { .. })
        ));
    }

    #[test]
    fn test_malformed_entry() {
        let bad = ID_FILE.replace("zeInit_id=1,", "zeInit_id=one,");
        let err = ExistingIds::parse("x.h", &bad).unwrap_err();
        assert!(matches!(err, IdError::MalformedIdFile { line: 7, .. }));
    }

    #[test]
    fn test_prior_for() {
        let ids = ExistingIds::parse("x.h", ID_FILE).unwrap();

        let prior = ids.prior_for("zeDriverGet", None).unwrap();
        assert_eq!(prior.name, "zeDriverGet_v2");
        assert_eq!(prior.version, Some(2));

        let prior = ids.prior_for("zeDriverGet", Some(2)).unwrap();
        assert_eq!(prior.name, "zeDriverGet");
        assert_eq!(prior.id, 2);

        assert!(ids.prior_for("zeDriver", None).is_none());
    }

    #[test]
    fn test_load_missing_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        assert!(ExistingIds::load(&tmp.path().join("none.h")).unwrap().is_none());
    }
}
