//! Instance Catalog Types
//!
//! Every hierarchy node references a row in one of seven catalogs. The
//! catalog is selected by the node's `instance_type_id`, which is resolved
//! into an [`InstanceType`] through a fixed [`InstanceTypeMapping`].
//!
//! The mapping is configuration, never inferred from catalog labels: an id
//! absent from the mapping is reported as unknown rather than guessed.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::node::InstanceId;

/// Closed set of instance catalogs referenced by hierarchy nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstanceType {
    Direction,
    Department,
    Area,
    SectorChief,
    Supervisor,
    School,
    Annex,
}

impl InstanceType {
    /// All catalogs, ordered from the top of the containment tree down
    pub const ALL: [InstanceType; 7] = [
        InstanceType::Direction,
        InstanceType::Department,
        InstanceType::Area,
        InstanceType::SectorChief,
        InstanceType::Supervisor,
        InstanceType::School,
        InstanceType::Annex,
    ];

    /// Human-readable catalog name used in dependency chains
    pub fn label(self) -> &'static str {
        match self {
            InstanceType::Direction => "Direction",
            InstanceType::Department => "Department",
            InstanceType::Area => "Area",
            InstanceType::SectorChief => "Sector Chief",
            InstanceType::Supervisor => "Supervisor",
            InstanceType::School => "School",
            InstanceType::Annex => "Annex",
        }
    }

    /// Backing table in the relational store
    pub fn table_name(self) -> &'static str {
        match self {
            InstanceType::Direction => "directions",
            InstanceType::Department => "departments",
            InstanceType::Area => "areas",
            InstanceType::SectorChief => "sector_chiefs",
            InstanceType::Supervisor => "supervisions",
            InstanceType::School => "schools",
            InstanceType::Annex => "annexes",
        }
    }

    /// Conventional `instance_type_id` (Direction=1 … Annex=7)
    pub fn default_type_id(self) -> i64 {
        match self {
            InstanceType::Direction => 1,
            InstanceType::Department => 2,
            InstanceType::Area => 3,
            InstanceType::SectorChief => 4,
            InstanceType::Supervisor => 5,
            InstanceType::School => 6,
            InstanceType::Annex => 7,
        }
    }
}

impl fmt::Display for InstanceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A row of an instance catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceRecord {
    /// Catalog-local identifier
    pub instance_id: InstanceId,

    /// Display name
    pub name: String,

    /// Location reference (municipality/locality), if recorded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_id: Option<i64>,
}

impl InstanceRecord {
    pub fn new(instance_id: InstanceId, name: impl Into<String>) -> Self {
        Self {
            instance_id,
            name: name.into(),
            location_id: None,
        }
    }

    pub fn with_location(mut self, location_id: i64) -> Self {
        self.location_id = Some(location_id);
        self
    }
}

/// Fixed `instance_type_id → InstanceType` mapping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstanceTypeMapping {
    entries: BTreeMap<i64, InstanceType>,
}

impl Default for InstanceTypeMapping {
    fn default() -> Self {
        Self {
            entries: InstanceType::ALL
                .iter()
                .map(|kind| (kind.default_type_id(), *kind))
                .collect(),
        }
    }
}

impl InstanceTypeMapping {
    /// Build a mapping from explicit `(type_id, kind)` pairs
    pub fn from_pairs(pairs: impl IntoIterator<Item = (i64, InstanceType)>) -> Self {
        Self {
            entries: pairs.into_iter().collect(),
        }
    }

    /// Resolve a stored `instance_type_id`
    pub fn resolve(&self, type_id: i64) -> Option<InstanceType> {
        self.entries.get(&type_id).copied()
    }

    /// Reverse lookup: the type id configured for a catalog
    pub fn type_id_of(&self, kind: InstanceType) -> Option<i64> {
        self.entries
            .iter()
            .find(|(_, k)| **k == kind)
            .map(|(id, _)| *id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Catalogs mapped by more than one type id
    pub fn duplicate_kinds(&self) -> Vec<InstanceType> {
        let mut seen = Vec::new();
        let mut duplicates = Vec::new();
        for kind in self.entries.values() {
            if seen.contains(kind) {
                if !duplicates.contains(kind) {
                    duplicates.push(*kind);
                }
            } else {
                seen.push(*kind);
            }
        }
        duplicates
    }
}
