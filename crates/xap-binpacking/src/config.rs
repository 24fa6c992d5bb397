//! Solver configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{SolverError, SolverResult};

fn default_min_machines() -> usize {
    1
}

/// Limits applied to every solve of a deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Memory of one container; the indivisible allocation quantum.
    pub container_memory_mb: u64,
    /// Maximum total memory the deployment may hold across all agents.
    pub max_memory_mb: u64,
    /// Minimum number of distinct agents the deployment should span.
    #[serde(default = "default_min_machines")]
    pub min_machines: usize,
    /// Optional cap on the deployment's memory on any single agent.
    #[serde(default)]
    pub max_memory_per_machine_mb: Option<u64>,
}

impl SolverConfig {
    pub fn new(container_memory_mb: u64, max_memory_mb: u64) -> Self {
        Self {
            container_memory_mb,
            max_memory_mb,
            min_machines: default_min_machines(),
            max_memory_per_machine_mb: None,
        }
    }

    pub fn with_min_machines(mut self, min_machines: usize) -> Self {
        self.min_machines = min_machines;
        self
    }

    pub fn with_max_memory_per_machine(mut self, memory_mb: u64) -> Self {
        self.max_memory_per_machine_mb = Some(memory_mb);
        self
    }

    pub fn validate(&self) -> SolverResult<()> {
        if self.container_memory_mb == 0 {
            return Err(SolverError::ZeroContainerMemory);
        }
        if let Some(per_machine_mb) = self.max_memory_per_machine_mb
            && per_machine_mb < self.container_memory_mb
        {
            return Err(SolverError::PerMachineBelowContainer {
                per_machine_mb,
                container_memory_mb: self.container_memory_mb,
            });
        }
        Ok(())
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> SolverResult<Self> {
        let config: SolverConfig =
            toml::from_str(content).map_err(|e| SolverError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> SolverResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| SolverError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }
}
