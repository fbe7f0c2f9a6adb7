//! Id assignment.
//!
//! Given the functions of a category in header order and the ids shipped by
//! the previous run, produce the records of this run. Shipped pairs are never
//! renumbered; a contested or changed id moves the old pair to a fresh
//! `_vN` name instead.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use serde::Serialize;

use crate::core::api_id::{split_version, versioned_name};
use crate::core::{ApiEntry, ApiIdRecord, Category, RecordOrigin, RESERVED_ID};

use super::error::IdError;
use super::existing::{ExistingIds, Prior};

/// Something the engine did to keep the id contract that deserves a warning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IdEvent {
    /// The header changed a function's explicit id. The old pair stays and
    /// the function continues under a new version tag.
    Reversioned {
        function: String,
        retained: String,
        retained_id: u32,
        minted: String,
        minted_id: u32,
    },
    /// A shipped id was claimed by another function's explicit default. The
    /// evicted pair is re-emitted under a new version with a fresh id.
    Recycled {
        evicted: String,
        id: u32,
        claimant: String,
        reassigned: String,
        reassigned_id: u32,
    },
}

/// Records of one category, ascending by id.
#[derive(Debug, Clone, Serialize)]
pub struct IdAssignment {
    pub category: Category,
    pub records: Vec<ApiIdRecord>,
    pub events: Vec<IdEvent>,
}

impl IdAssignment {
    /// Records taken verbatim from a shipped id header, for runs that do not
    /// regenerate ids.
    pub fn from_existing(category: Category, existing: &ExistingIds) -> Self {
        let mut records: Vec<ApiIdRecord> = existing
            .iter()
            .map(|(name, id)| {
                let (base, version) = split_version(name);
                ApiIdRecord {
                    function_name: base.to_string(),
                    numeric_id: id,
                    category: category.clone(),
                    version,
                    origin: RecordOrigin::Current,
                }
            })
            .collect();
        records.sort_by_key(|r| r.numeric_id);

        IdAssignment {
            category,
            records,
            events: Vec::new(),
        }
    }

    /// The id assigned to a versioned name.
    pub fn id_of(&self, versioned_name: &str) -> Option<u32> {
        self.records
            .iter()
            .find(|r| r.versioned_name() == versioned_name)
            .map(|r| r.numeric_id)
    }

    /// What the next run will read back from the emitted header.
    pub fn to_existing(&self) -> Result<ExistingIds, IdError> {
        ExistingIds::from_pairs(
            &self.category.key(),
            self.records.iter().map(|r| (r.versioned_name(), r.numeric_id)),
        )
    }
}

struct Assigner<'a> {
    category: &'a Category,
    claims: BTreeMap<u32, &'a str>,
    used: BTreeSet<u32>,
    versions: HashMap<String, u32>,
    hint: u32,
    running_max: u32,
    records: Vec<ApiIdRecord>,
    events: Vec<IdEvent>,
}

impl<'a> Assigner<'a> {
    /// Smallest free id at or above both the hint and the last minted id.
    fn mint(&mut self) -> u32 {
        let mut candidate = self.hint.max(self.running_max + 1).max(RESERVED_ID + 1);
        while self.used.contains(&candidate) {
            candidate += 1;
        }
        self.used.insert(candidate);
        self.running_max = candidate;
        candidate
    }

    /// Next version tag of a base name.
    fn bump(&mut self, base: &str) -> u32 {
        let next = self.versions.get(base).copied().unwrap_or(1) + 1;
        self.versions.insert(base.to_string(), next);
        next
    }

    /// The function claiming `id` by explicit default, when it is not `base`.
    fn claimant(&self, id: u32, base: &str) -> Option<&'a str> {
        self.claims.get(&id).copied().filter(|c| *c != base)
    }

    fn push(&mut self, base: &str, version: Option<u32>, id: u32, origin: RecordOrigin) {
        self.records.push(ApiIdRecord {
            function_name: base.to_string(),
            numeric_id: id,
            category: self.category.clone(),
            version,
            origin,
        });
    }

    /// Re-emit a pair whose id went to `claimant` under a fresh version and id.
    fn recycle(&mut self, base: &str, evicted: &Prior, claimant: &str, origin: RecordOrigin) {
        let version = self.bump(base);
        let fresh = self.mint();
        self.push(base, Some(version), fresh, origin);
        let event = IdEvent::Recycled {
            evicted: evicted.name.clone(),
            id: evicted.id,
            claimant: claimant.to_string(),
            reassigned: versioned_name(base, Some(version)),
            reassigned_id: fresh,
        };
        tracing::warn!(
            "{}: id {} of `{}` is now claimed by `{}`, re-emitted as `{}` = {}",
            self.category.key(),
            evicted.id,
            evicted.name,
            claimant,
            versioned_name(base, Some(version)),
            fresh
        );
        self.events.push(event);
    }
}

/// Assign ids to `entries` (header order) continuing from `existing`.
pub fn assign_ids(
    category: &Category,
    entries: &[ApiEntry],
    existing: &ExistingIds,
) -> Result<IdAssignment, IdError> {
    let scope = category.key();

    let mut claims: BTreeMap<u32, &str> = BTreeMap::new();
    let mut names = HashSet::new();
    for entry in entries {
        if !names.insert(entry.name.as_str()) {
            return Err(IdError::DuplicatedApiName {
                scope,
                name: entry.name.clone(),
            });
        }
        if let Some(id) = entry.default_id {
            if id == RESERVED_ID {
                return Err(IdError::ReservedId {
                    scope,
                    name: entry.name.clone(),
                });
            }
            if let Some(first) = claims.insert(id, entry.name.as_str()) {
                return Err(IdError::DuplicatedApiId {
                    scope,
                    id,
                    first: first.to_string(),
                    second: entry.name.clone(),
                });
            }
        }
    }

    let mut versions = HashMap::new();
    for (name, _) in existing.iter() {
        let (base, version) = split_version(name);
        let known = versions.entry(base.to_string()).or_insert(1);
        *known = (*known).max(version.unwrap_or(1));
    }

    let mut used: BTreeSet<u32> = existing.iter().map(|(_, id)| id).collect();
    used.extend(claims.keys().copied());

    let mut engine = Assigner {
        category,
        claims,
        used,
        versions,
        hint: existing.next_free_hint(),
        running_max: RESERVED_ID,
        records: Vec::new(),
        events: Vec::new(),
    };
    let mut consumed: HashSet<String> = HashSet::new();

    for entry in entries {
        let base = entry.name.as_str();

        let Some(prior) = existing.prior_for(base, entry.default_id) else {
            let id = match entry.default_id {
                Some(id) => id,
                None => engine.mint(),
            };
            tracing::debug!("{}: new `{}` = {}", scope, base, id);
            engine.push(base, None, id, RecordOrigin::Current);
            continue;
        };
        consumed.insert(prior.name.clone());

        match entry.default_id {
            Some(default) if default != prior.id => {
                match engine.claimant(prior.id, base) {
                    Some(claimant) => {
                        engine.recycle(base, &prior, claimant, RecordOrigin::Residual);
                    }
                    None => engine.push(base, prior.version, prior.id, RecordOrigin::Residual),
                }

                let version = engine.bump(base);
                engine.push(base, Some(version), default, RecordOrigin::Current);
                let minted = versioned_name(base, Some(version));
                tracing::warn!(
                    "{}: `{}` changed its id from {} to {}, kept `{}` and added `{}`",
                    scope,
                    base,
                    prior.id,
                    default,
                    prior.name,
                    minted
                );
                engine.events.push(IdEvent::Reversioned {
                    function: base.to_string(),
                    retained: prior.name.clone(),
                    retained_id: prior.id,
                    minted,
                    minted_id: default,
                });
            }
            _ => match engine.claimant(prior.id, base) {
                Some(claimant) => engine.recycle(base, &prior, claimant, RecordOrigin::Current),
                None => engine.push(base, prior.version, prior.id, RecordOrigin::Current),
            },
        }
    }

    let mut residuals: Vec<(&str, u32)> = existing
        .iter()
        .filter(|(name, _)| !consumed.contains(*name))
        .collect();
    residuals.sort_by_key(|(_, id)| *id);

    for (name, id) in residuals {
        let (base, version) = split_version(name);
        let prior = Prior {
            name: name.to_string(),
            id,
            version,
        };
        match engine.claimant(id, base) {
            Some(claimant) => engine.recycle(base, &prior, claimant, RecordOrigin::Residual),
            None => engine.push(base, version, id, RecordOrigin::Residual),
        }
    }

    let mut records = engine.records;
    let events = engine.events;
    check_unique(&scope, &records)?;
    records.sort_by_key(|r| r.numeric_id);

    Ok(IdAssignment {
        category: category.clone(),
        records,
        events,
    })
}

fn check_unique(scope: &str, records: &[ApiIdRecord]) -> Result<(), IdError> {
    let mut by_id: BTreeMap<u32, String> = BTreeMap::new();
    let mut names = HashSet::new();

    for record in records {
        let name = record.versioned_name();
        if let Some(first) = by_id.get(&record.numeric_id) {
            return Err(IdError::DuplicatedApiId {
                scope: scope.to_string(),
                id: record.numeric_id,
                first: first.clone(),
                second: name,
            });
        }
        if !names.insert(name.clone()) {
            return Err(IdError::DuplicatedApiName {
                scope: scope.to_string(),
                name,
            });
        }
        by_id.insert(record.numeric_id, name);
    }
    Ok(())
}
