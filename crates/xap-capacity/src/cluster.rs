//! Per-agent capacity maps.

use std::collections::BTreeMap;
use std::collections::btree_map;

use serde::{Deserialize, Serialize};

use crate::error::{CapacityError, CapacityResult};
use crate::vector::CapacityVector;

/// Unique identifier of an agent (a machine able to host containers).
pub type AgentId = String;

/// Capacity per agent, iterated in ascending agent-id order.
///
/// Used both for a deployment's aggregated allocation and for the pool of
/// unallocated capacity. Agents without an entry read as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClusterCapacity {
    agents: BTreeMap<AgentId, CapacityVector>,
}

impl ClusterCapacity {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capacity recorded for `agent`, zero when absent.
    pub fn get(&self, agent: &str) -> CapacityVector {
        self.agents.get(agent).copied().unwrap_or_default()
    }

    pub fn contains(&self, agent: &str) -> bool {
        self.agents.contains_key(agent)
    }

    /// Overwrite the capacity of `agent`.
    pub fn set(&mut self, agent: impl Into<AgentId>, capacity: CapacityVector) {
        self.agents.insert(agent.into(), capacity);
    }

    /// Add `capacity` to `agent`, creating the entry if needed. On
    /// overflow the entry is left unchanged.
    pub fn add(&mut self, agent: &str, capacity: &CapacityVector) -> CapacityResult<()> {
        let sum = self.get(agent).checked_add(capacity)?;
        self.agents.insert(agent.to_string(), sum);
        Ok(())
    }

    /// Subtract `capacity` from `agent`. The entry is kept even when it
    /// reaches zero.
    pub fn subtract(&mut self, agent: &str, capacity: &CapacityVector) -> CapacityResult<()> {
        let current = self.get(agent);
        let Some(remaining) = current.checked_sub(capacity) else {
            return Err(CapacityError::NegativeForAgent {
                agent: agent.to_string(),
                minuend: current.to_string(),
                subtrahend: capacity.to_string(),
            });
        };
        self.agents.insert(agent.to_string(), remaining);
        Ok(())
    }

    /// Remove and return the entry for `agent`.
    pub fn remove(&mut self, agent: &str) -> Option<CapacityVector> {
        self.agents.remove(agent)
    }

    /// Drop every entry whose capacity is zero.
    pub fn prune_zeros(&mut self) {
        self.agents.retain(|_, capacity| !capacity.is_zero());
    }

    /// Sum over all agents.
    pub fn total(&self) -> CapacityResult<CapacityVector> {
        CapacityVector::checked_sum(self.agents.values())
    }

    pub fn agents(&self) -> impl Iterator<Item = &AgentId> {
        self.agents.keys()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, AgentId, CapacityVector> {
        self.agents.iter()
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}

impl FromIterator<(AgentId, CapacityVector)> for ClusterCapacity {
    fn from_iter<I: IntoIterator<Item = (AgentId, CapacityVector)>>(iter: I) -> Self {
        Self {
            agents: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ClusterCapacity {
    type Item = (&'a AgentId, &'a CapacityVector);
    type IntoIter = btree_map::Iter<'a, AgentId, CapacityVector>;

    fn into_iter(self) -> Self::IntoIter {
        self.agents.iter()
    }
}

impl IntoIterator for ClusterCapacity {
    type Item = (AgentId, CapacityVector);
    type IntoIter = btree_map::IntoIter<AgentId, CapacityVector>;

    fn into_iter(self) -> Self::IntoIter {
        self.agents.into_iter()
    }
}
