//! Zones and per-zone capacity plans.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CapacityResult;
use crate::vector::CapacityVector;

/// A set of zone names identifying one logical group of machines.
///
/// `{"east"}` and `{"east", "west"}` are distinct zone sets. The empty set
/// stands for machines without a zone.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZoneSet(BTreeSet<String>);

impl ZoneSet {
    pub fn new<I, S>(zones: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(zones.into_iter().map(Into::into).collect())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.0.iter()
    }
}

impl fmt::Display for ZoneSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.0.iter().map(String::as_str).collect();
        write!(f, "[{}]", names.join(","))
    }
}

/// Capacity per zone set, iterated in zone-set order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapacityPerZones {
    zones: BTreeMap<ZoneSet, CapacityVector>,
}

impl CapacityPerZones {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capacity of `zone`, `None` when the zone has no entry.
    pub fn get(&self, zone: &ZoneSet) -> Option<&CapacityVector> {
        self.zones.get(zone)
    }

    pub fn contains(&self, zone: &ZoneSet) -> bool {
        self.zones.contains_key(zone)
    }

    pub fn set(&mut self, zone: ZoneSet, capacity: CapacityVector) {
        self.zones.insert(zone, capacity);
    }

    pub fn remove(&mut self, zone: &ZoneSet) -> Option<CapacityVector> {
        self.zones.remove(zone)
    }

    pub fn zones(&self) -> impl Iterator<Item = &ZoneSet> {
        self.zones.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ZoneSet, &CapacityVector)> {
        self.zones.iter()
    }

    /// Sum over all zones.
    pub fn total(&self) -> CapacityResult<CapacityVector> {
        CapacityVector::checked_sum(self.zones.values())
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}

impl FromIterator<(ZoneSet, CapacityVector)> for CapacityPerZones {
    fn from_iter<I: IntoIterator<Item = (ZoneSet, CapacityVector)>>(iter: I) -> Self {
        Self {
            zones: iter.into_iter().collect(),
        }
    }
}

/// Serialized as a list of `{ zones, capacity }` entries, since JSON and
/// TOML object keys cannot be sets.
impl Serialize for CapacityPerZones {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let entries: Vec<ZoneCapacityEntry> = self
            .zones
            .iter()
            .map(|(zones, capacity)| ZoneCapacityEntry {
                zones: zones.clone(),
                capacity: *capacity,
            })
            .collect();
        entries.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for CapacityPerZones {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = Vec::<ZoneCapacityEntry>::deserialize(deserializer)?;
        Ok(entries.into_iter().map(|e| (e.zones, e.capacity)).collect())
    }
}

#[derive(Serialize, Deserialize)]
struct ZoneCapacityEntry {
    zones: ZoneSet,
    capacity: CapacityVector,
}
