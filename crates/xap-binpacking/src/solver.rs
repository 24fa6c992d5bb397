//! Bin-packing solver: grows and shrinks a deployment container by container.
//!
//! The solver owns two maps for the duration of one decision cycle:
//! the deployment's allocation per agent and the pool of capacity still
//! free per agent. Every step moves exactly one container between them,
//! so their per-agent sum never changes.
//!
//! A container leaves an agent with the agent's own CPU per memory, not
//! the share the decrease target would imply, so scale-in never strands
//! CPU on an agent whose memory is gone.
//!
//! An agent that holds allocation but is missing from the free pool has
//! vanished. It takes no part in any decision, and its allocation stays in
//! the result until [`BinPackingSolver::drop_orphaned_allocations`] is called.

use std::cmp::Reverse;

use tracing::{debug, info, warn};
use xap_capacity::{AgentId, CapacityError, CapacityVector, ClusterCapacity};

use crate::config::SolverConfig;
use crate::error::{SolverError, SolverResult};

/// What a solve call asked for and what it managed to move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaleOutcome {
    pub requested: CapacityVector,
    pub achieved: CapacityVector,
}

impl ScaleOutcome {
    fn nothing(requested: CapacityVector) -> Self {
        Self {
            requested,
            achieved: CapacityVector::ZERO,
        }
    }

    /// The part of the request that could not be satisfied.
    pub fn unmet(&self) -> CapacityVector {
        self.requested.saturating_sub(&self.achieved)
    }

    pub fn is_complete(&self) -> bool {
        self.unmet().is_zero()
    }
}

/// Incremental allocation planner for a single deployment.
///
/// Not meant to be shared: construct one per decision cycle.
#[derive(Debug, Clone)]
pub struct BinPackingSolver {
    config: SolverConfig,
    allocated: ClusterCapacity,
    unallocated: ClusterCapacity,
}

impl BinPackingSolver {
    /// Create a solver over the deployment's current allocation and the
    /// free capacity of every live agent.
    pub fn new(
        config: SolverConfig,
        mut allocated: ClusterCapacity,
        unallocated: ClusterCapacity,
    ) -> SolverResult<Self> {
        config.validate()?;

        let allocated_mb = allocated.total()?.memory_mb;
        if allocated_mb > config.max_memory_mb {
            return Err(SolverError::AllocatedExceedsMaximum {
                allocated_mb,
                max_mb: config.max_memory_mb,
            });
        }

        allocated.prune_zeros();
        Ok(Self {
            config,
            allocated,
            unallocated,
        })
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// The deployment's allocation after the last solve.
    pub fn allocated_capacity_result(&self) -> &ClusterCapacity {
        &self.allocated
    }

    /// Free capacity per agent after the last solve.
    pub fn unallocated_capacity(&self) -> &ClusterCapacity {
        &self.unallocated
    }

    /// Consume the solver, returning `(allocated, unallocated)`.
    pub fn into_parts(self) -> (ClusterCapacity, ClusterCapacity) {
        (self.allocated, self.unallocated)
    }

    /// Grow the deployment by `target_increase`.
    ///
    /// Stops early, without error, when the deployment maximum is reached
    /// or no live agent can host another container.
    pub fn solve_manual_capacity_scale_out(
        &mut self,
        target_increase: &CapacityVector,
    ) -> SolverResult<ScaleOutcome> {
        let Some((containers, container)) = self.container_share(target_increase)? else {
            return Ok(ScaleOutcome::nothing(*target_increase));
        };

        let mut outcome = ScaleOutcome::nothing(*target_increase);
        let mut allocated_mb = self.allocated.total()?.memory_mb;

        for _ in 0..containers {
            if allocated_mb.saturating_add(container.memory_mb) > self.config.max_memory_mb {
                warn!(
                    allocated_mb,
                    max_mb = self.config.max_memory_mb,
                    "deployment memory limit reached, scale-out incomplete"
                );
                break;
            }

            let Some(agent) = self.pick_agent_for_allocation(&container) else {
                warn!(
                    unmet = %outcome.requested.saturating_sub(&outcome.achieved),
                    "no agent can host another container, scale-out incomplete"
                );
                break;
            };

            self.unallocated.subtract(&agent, &container)?;
            self.allocated.add(&agent, &container)?;
            allocated_mb += container.memory_mb;
            outcome.achieved = outcome.achieved.checked_add(&container)?;

            debug!(
                agent = %agent,
                containers = self.containers_on(&agent),
                free = %self.unallocated.get(&agent),
                "allocated container"
            );
        }

        info!(
            requested = %outcome.requested,
            achieved = %outcome.achieved,
            machines = self.machines_in_use(),
            "solved scale-out"
        );
        Ok(outcome)
    }

    /// Shrink the deployment by `target_decrease`.
    ///
    /// Each container freed carries the picked agent's CPU in proportion
    /// to the memory it frees, capped at whatever CPU the target still
    /// asks for. An agent whose memory reaches zero gives back all of its
    /// CPU and is dropped from the allocation.
    ///
    /// Stops early, without error, when no live agent holds another
    /// container's worth of memory.
    pub fn solve_manual_capacity_scale_in(
        &mut self,
        target_decrease: &CapacityVector,
    ) -> SolverResult<ScaleOutcome> {
        let Some(containers) = self.container_count(target_decrease)? else {
            return Ok(ScaleOutcome::nothing(*target_decrease));
        };

        let quantum = self.config.container_memory_mb;
        let mut outcome = ScaleOutcome::nothing(*target_decrease);
        let mut cpu_left = target_decrease.cpu;

        for _ in 0..containers {
            let Some(agent) = self.pick_agent_for_deallocation() else {
                warn!(
                    unmet = %outcome.requested.saturating_sub(&outcome.achieved),
                    "no agent holds another container, scale-in incomplete"
                );
                break;
            };

            let held = self.allocated.get(&agent);
            let cpu = if held.memory_mb == quantum {
                held.cpu
            } else {
                held.cpu
                    .portion(quantum, held.memory_mb)
                    .ok_or_else(|| CapacityError::Overflow {
                        lhs: held.to_string(),
                        rhs: format!("{quantum}MB share"),
                    })?
                    .min(cpu_left)
            };
            let container = CapacityVector::new(cpu, quantum);

            self.allocated.subtract(&agent, &container)?;
            self.unallocated.add(&agent, &container)?;
            if self.allocated.get(&agent).memory_mb == 0 {
                self.allocated.remove(&agent);
            }
            cpu_left = cpu_left.saturating_sub(cpu);
            outcome.achieved = outcome.achieved.checked_add(&container)?;

            debug!(
                agent = %agent,
                containers = self.containers_on(&agent),
                freed = %container,
                free = %self.unallocated.get(&agent),
                "deallocated container"
            );
        }

        info!(
            requested = %outcome.requested,
            achieved = %outcome.achieved,
            machines = self.machines_in_use(),
            "solved scale-in"
        );
        Ok(outcome)
    }

    /// Allocations held on agents that are no longer in the free pool.
    pub fn orphaned_allocations(&self) -> ClusterCapacity {
        self.allocated
            .iter()
            .filter(|(agent, _)| !self.unallocated.contains(agent))
            .map(|(agent, capacity)| (agent.clone(), *capacity))
            .collect()
    }

    /// Remove allocations held on vanished agents and return them.
    pub fn drop_orphaned_allocations(&mut self) -> ClusterCapacity {
        let orphaned = self.orphaned_allocations();
        for (agent, capacity) in &orphaned {
            self.allocated.remove(agent);
            info!(agent = %agent, capacity = %capacity, "dropped allocation of vanished agent");
        }
        orphaned
    }

    /// Number of containers in a target. `None` for a zero target.
    fn container_count(&self, target: &CapacityVector) -> SolverResult<Option<u64>> {
        if target.is_zero() {
            return Ok(None);
        }
        let quantum = self.config.container_memory_mb;
        if target.memory_mb == 0 {
            return Err(SolverError::CpuWithoutMemory(target.cpu.to_string()));
        }
        if target.memory_mb % quantum != 0 {
            return Err(SolverError::NotContainerMultiple {
                memory_mb: target.memory_mb,
                container_memory_mb: quantum,
            });
        }
        Ok(Some(target.memory_mb / quantum))
    }

    /// Split a target into `(container count, per-container capacity)`.
    /// `None` for a zero target.
    fn container_share(
        &self,
        target: &CapacityVector,
    ) -> SolverResult<Option<(u64, CapacityVector)>> {
        let Some(containers) = self.container_count(target)? else {
            return Ok(None);
        };
        let cpu = target
            .cpu
            .split(containers)
            .ok_or(SolverError::TooManyContainers(containers))?;
        let quantum = self.config.container_memory_mb;
        Ok(Some((containers, CapacityVector::new(cpu, quantum))))
    }

    fn pick_agent_for_allocation(&self, container: &CapacityVector) -> Option<AgentId> {
        let eligible: Vec<(&AgentId, &CapacityVector)> = self
            .unallocated
            .iter()
            .filter(|(_, free)| container.fits_within(free))
            .filter(|(agent, _)| self.within_machine_cap(agent, container))
            .collect();

        // Below the minimum spread, a fresh agent beats any used one.
        let open_new = self.machines_in_use() < self.config.min_machines
            && eligible.iter().any(|(agent, _)| !self.hosts_deployment(agent));

        eligible
            .into_iter()
            .filter(|(agent, _)| !open_new || !self.hosts_deployment(agent))
            .min_by_key(|(agent, free)| {
                (
                    self.containers_on(agent),
                    Reverse(free.memory_mb),
                    Reverse(free.cpu),
                )
            })
            .map(|(agent, _)| agent.clone())
    }

    fn pick_agent_for_deallocation(&self) -> Option<AgentId> {
        let quantum = self.config.container_memory_mb;
        let candidates: Vec<(&AgentId, &CapacityVector)> = self
            .unallocated
            .iter()
            .filter(|(agent, _)| self.allocated.get(agent).memory_mb >= quantum)
            .collect();

        let keep_spread = self.machines_in_use() <= self.config.min_machines
            && candidates.iter().any(|(agent, _)| !self.would_empty(agent));

        candidates
            .into_iter()
            .filter(|(agent, _)| !keep_spread || !self.would_empty(agent))
            .min_by_key(|(agent, free)| {
                (
                    Reverse(self.containers_on(agent)),
                    free.memory_mb,
                    free.cpu,
                )
            })
            .map(|(agent, _)| agent.clone())
    }

    fn containers_on(&self, agent: &str) -> u64 {
        self.allocated.get(agent).memory_mb / self.config.container_memory_mb
    }

    fn hosts_deployment(&self, agent: &str) -> bool {
        self.allocated.get(agent).memory_mb > 0
    }

    /// Live agents currently hosting the deployment.
    fn machines_in_use(&self) -> usize {
        self.unallocated
            .agents()
            .filter(|agent| self.hosts_deployment(agent))
            .count()
    }

    fn within_machine_cap(&self, agent: &str, container: &CapacityVector) -> bool {
        match self.config.max_memory_per_machine_mb {
            Some(cap) => self.allocated.get(agent).memory_mb + container.memory_mb <= cap,
            None => true,
        }
    }

    fn would_empty(&self, agent: &str) -> bool {
        self.allocated.get(agent).memory_mb <= self.config.container_memory_mb
    }
}
