//! Scenario files: the planner's inputs serialized as TOML.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;
use xap_autoscale::ZoneCapacityLimits;
use xap_binpacking::SolverConfig;
use xap_capacity::{CapacityPerZones, CapacityVector, ClusterCapacity, ZoneSet};

/// Input for one scale-out or scale-in solve.
///
/// The `[solver]` table may be left out when the limits come from a
/// separate config file.
#[derive(Debug, Clone, Deserialize)]
pub struct SolverScenario {
    #[serde(default)]
    pub solver: Option<SolverConfig>,
    pub target: CapacityVector,
    #[serde(default)]
    pub agents: BTreeMap<String, AgentEntry>,
}

/// One agent as reported by discovery.
///
/// An agent without `unallocated` capacity is no longer discovered; only
/// its leftover allocation is known.
#[derive(Debug, Clone, Deserialize)]
pub struct AgentEntry {
    #[serde(default)]
    pub unallocated: Option<CapacityVector>,
    #[serde(default)]
    pub allocated: CapacityVector,
}

impl SolverScenario {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading scenario {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("parsing scenario {}", path.display()))
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let scenario: SolverScenario = toml::from_str(content)?;
        if let Some(solver) = &scenario.solver {
            solver.validate()?;
        }
        Ok(scenario)
    }

    /// Solver limits: from `config_path` when given, else the scenario's
    /// own `[solver]` table.
    pub fn solver_config(&self, config_path: Option<&Path>) -> anyhow::Result<SolverConfig> {
        match config_path {
            Some(path) => Ok(SolverConfig::from_file(path)?),
            None => self
                .solver
                .clone()
                .context("scenario has no [solver] table and no --config was given"),
        }
    }

    /// Split the agents into `(allocated, unallocated)` maps.
    pub fn capacity_maps(&self) -> (ClusterCapacity, ClusterCapacity) {
        let mut allocated = ClusterCapacity::new();
        let mut unallocated = ClusterCapacity::new();
        for (agent, entry) in &self.agents {
            if !entry.allocated.is_zero() {
                allocated.set(agent.clone(), entry.allocated);
            }
            if let Some(free) = entry.unallocated {
                unallocated.set(agent.clone(), free);
            }
        }
        (allocated, unallocated)
    }
}

/// Input for one cycle of per-zone planning.
#[derive(Debug, Clone, Deserialize)]
pub struct ZoneScenario {
    pub limits: ZoneCapacityLimits,
    pub zones: Vec<ZoneEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ZoneEntry {
    pub zones: ZoneSet,
    #[serde(default)]
    pub last_enforced: Option<CapacityVector>,
    #[serde(default)]
    pub desired: Option<CapacityVector>,
}

impl ZoneScenario {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading scenario {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("parsing scenario {}", path.display()))
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let scenario: ZoneScenario = toml::from_str(content)?;
        scenario.limits.validate()?;
        Ok(scenario)
    }

    pub fn all_zones(&self) -> BTreeSet<ZoneSet> {
        self.zones.iter().map(|entry| entry.zones.clone()).collect()
    }

    pub fn last_enforced(&self) -> CapacityPerZones {
        self.zones
            .iter()
            .filter_map(|entry| Some((entry.zones.clone(), entry.last_enforced?)))
            .collect()
    }

    pub fn desired(&self) -> CapacityPerZones {
        self.zones
            .iter()
            .filter_map(|entry| Some((entry.zones.clone(), entry.desired?)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xap_capacity::CpuCores;

    const SOLVER_SCENARIO: &str = include_str!("../../../demos/scale-out.toml");
    const ZONE_SCENARIO: &str = include_str!("../../../demos/zones.toml");

    #[test]
    fn parses_demo_solver_scenario() {
        let scenario = SolverScenario::parse(SOLVER_SCENARIO).unwrap();
        let solver = scenario.solver_config(None).unwrap();
        assert_eq!(solver.container_memory_mb, 512);
        assert_eq!(solver.min_machines, 2);
        assert_eq!(scenario.target.memory_mb, 2048);

        let (allocated, unallocated) = scenario.capacity_maps();
        assert_eq!(allocated.len(), 2);
        assert_eq!(unallocated.len(), 3);
        assert!(!unallocated.contains("gsa-lost"));
    }

    #[test]
    fn parses_demo_zone_scenario() {
        let scenario = ZoneScenario::parse(ZONE_SCENARIO).unwrap();
        assert_eq!(scenario.all_zones().len(), 3);
        assert_eq!(scenario.last_enforced().len(), 3);
        assert_eq!(scenario.desired().len(), 2);
    }

    #[test]
    fn agent_without_pool_entry_is_vanished() {
        let scenario = SolverScenario::parse(
            r#"
[solver]
container_memory_mb = 128
max_memory_mb = 1024

[target]
cpu = "1/2"
memory_mb = 256

[agents.host-a]
unallocated = { cpu = 4, memory_mb = 1024 }

[agents.host-b]
allocated = { memory_mb = 128 }
"#,
        )
        .unwrap();

        assert_eq!(scenario.target.cpu, CpuCores::new(1, 2).unwrap());
        let (allocated, unallocated) = scenario.capacity_maps();
        assert_eq!(allocated.get("host-b"), CapacityVector::memory(128));
        assert!(!unallocated.contains("host-b"));
        assert!(!allocated.contains("host-a"));
    }

    #[test]
    fn config_file_overrides_solver_table() {
        let scenario = SolverScenario::parse(SOLVER_SCENARIO).unwrap();
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos/solver.toml");

        let solver = scenario.solver_config(Some(&path)).unwrap();
        assert_eq!(solver, SolverConfig::new(256, 2048));
    }

    #[test]
    fn missing_solver_table_needs_config_file() {
        let scenario = SolverScenario::parse(
            r#"
[target]
memory_mb = 256
"#,
        )
        .unwrap();

        assert!(scenario.solver.is_none());
        let err = scenario.solver_config(None).unwrap_err();
        assert!(err.to_string().contains("--config"));
    }

    #[test]
    fn unreadable_config_file_is_reported() {
        let scenario = SolverScenario::parse(SOLVER_SCENARIO).unwrap();
        let err = scenario
            .solver_config(Some(Path::new("does/not/exist.toml")))
            .unwrap_err();
        assert!(err.to_string().contains("does/not/exist.toml"));
    }

    #[test]
    fn rejects_invalid_solver_config() {
        let err = SolverScenario::parse(
            r#"
[solver]
container_memory_mb = 0
max_memory_mb = 1024

[target]
memory_mb = 0
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("container memory"));
    }

    #[test]
    fn rejects_inconsistent_zone_limits() {
        let err = ZoneScenario::parse(
            r#"
zones = []

[limits]
total_min = { memory_mb = 500 }
total_max = { memory_mb = 100 }
max_per_zone = { memory_mb = 100 }
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("exceeds maximum"));
    }
}
