//! Property tests for solver invariants over random pools and step sequences.

use proptest::prelude::*;
use xap_binpacking::{BinPackingSolver, SolverConfig};
use xap_capacity::{CapacityVector, ClusterCapacity, CpuCores};

const QUANTUM_MB: u64 = 128;

fn pool_strategy() -> impl Strategy<Value = ClusterCapacity> {
    prop::collection::vec((0u32..16, 0u64..40), 1..8).prop_map(|agents| {
        agents
            .into_iter()
            .enumerate()
            .map(|(i, (cores, slots))| {
                (
                    format!("agent-{i}"),
                    CapacityVector::new(CpuCores::from_cores(cores), slots * QUANTUM_MB),
                )
            })
            .collect()
    })
}

fn step_strategy() -> impl Strategy<Value = (bool, u32, u64)> {
    (any::<bool>(), 0u32..6, 0u64..12)
}

proptest! {
    #[test]
    fn conserves_capacity_and_respects_maximum(
        pool in pool_strategy(),
        steps in prop::collection::vec(step_strategy(), 1..12),
        max_containers in 1u64..60,
        min_machines in 1usize..4,
    ) {
        let config = SolverConfig::new(QUANTUM_MB, max_containers * QUANTUM_MB)
            .with_min_machines(min_machines);
        let mut solver =
            BinPackingSolver::new(config, ClusterCapacity::new(), pool.clone()).unwrap();

        for (grow, cores, containers) in steps {
            let delta = CapacityVector::new(
                CpuCores::from_cores(if containers == 0 { 0 } else { cores }),
                containers * QUANTUM_MB,
            );
            let outcome = if grow {
                solver.solve_manual_capacity_scale_out(&delta).unwrap()
            } else {
                solver.solve_manual_capacity_scale_in(&delta).unwrap()
            };

            // Scale-in may hand back more cpu than asked for when it
            // empties an agent; memory never overshoots.
            prop_assert!(outcome.achieved.memory_mb <= outcome.requested.memory_mb);
            if grow {
                prop_assert!(outcome.achieved.fits_within(&outcome.requested));
            }
            prop_assert!(
                solver.allocated_capacity_result().total().unwrap().memory_mb
                    <= max_containers * QUANTUM_MB
            );
            for (agent, held) in solver.allocated_capacity_result() {
                prop_assert!(held.memory_mb > 0, "{} holds cpu without memory", agent);
            }
            for (agent, original) in &pool {
                let sum = solver
                    .allocated_capacity_result()
                    .get(agent)
                    .checked_add(&solver.unallocated_capacity().get(agent))
                    .unwrap();
                prop_assert_eq!(sum, *original);
            }
        }
    }

    #[test]
    fn zero_target_changes_nothing(pool in pool_strategy()) {
        let mut solver = BinPackingSolver::new(
            SolverConfig::new(QUANTUM_MB, 1 << 20),
            ClusterCapacity::new(),
            pool.clone(),
        )
        .unwrap();

        solver.solve_manual_capacity_scale_out(&CapacityVector::ZERO).unwrap();

        prop_assert!(solver.allocated_capacity_result().is_empty());
        prop_assert_eq!(solver.unallocated_capacity(), &pool);
    }

    #[test]
    fn spreads_over_minimum_when_possible(
        pool in pool_strategy(),
        min_machines in 1usize..5,
    ) {
        let eligible = pool
            .iter()
            .filter(|(_, free)| free.memory_mb >= QUANTUM_MB)
            .count();
        let mut solver = BinPackingSolver::new(
            SolverConfig::new(QUANTUM_MB, 1 << 20).with_min_machines(min_machines),
            ClusterCapacity::new(),
            pool,
        )
        .unwrap();

        solver
            .solve_manual_capacity_scale_out(&CapacityVector::memory(min_machines as u64 * QUANTUM_MB))
            .unwrap();

        let used = solver.allocated_capacity_result().len();
        prop_assert_eq!(used, eligible.min(min_machines));
    }
}
