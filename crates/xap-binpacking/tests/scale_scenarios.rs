//! Multi-cycle scaling scenarios.
//!
//! Each cycle builds a fresh solver from the previous cycle's maps, the
//! way the grid manager drives the planner between decisions.

use xap_binpacking::{BinPackingSolver, SolverConfig};
use xap_capacity::{CapacityVector, ClusterCapacity, CpuCores};

fn cap(cores: u32, memory_mb: u64) -> CapacityVector {
    CapacityVector::new(CpuCores::from_cores(cores), memory_mb)
}

fn uniform_pool(count: usize, capacity: CapacityVector) -> ClusterCapacity {
    (0..count)
        .map(|i| (format!("agent-{i:02}"), capacity))
        .collect()
}

fn next_cycle(solver: BinPackingSolver) -> BinPackingSolver {
    let config = solver.config().clone();
    let (allocated, unallocated) = solver.into_parts();
    BinPackingSolver::new(config, allocated, unallocated).unwrap()
}

#[test]
fn minimum_spread_from_zero() {
    let config = SolverConfig::new(512, 64 * 1024).with_min_machines(3);
    let mut solver =
        BinPackingSolver::new(config, ClusterCapacity::new(), uniform_pool(5, cap(8, 8192)))
            .unwrap();

    solver
        .solve_manual_capacity_scale_out(&CapacityVector::memory(3 * 512))
        .unwrap();

    let result = solver.allocated_capacity_result();
    assert_eq!(result.len(), 3);
    assert!(result.iter().all(|(_, c)| c.memory_mb == 512));
}

#[test]
fn even_distribution_across_identical_agents() {
    let mut solver = BinPackingSolver::new(
        SolverConfig::new(256, 64 * 1024),
        ClusterCapacity::new(),
        uniform_pool(4, cap(8, 4096)),
    )
    .unwrap();

    solver
        .solve_manual_capacity_scale_out(&cap(4, 16 * 256))
        .unwrap();

    for (_, allocated) in solver.allocated_capacity_result() {
        assert_eq!(*allocated, cap(1, 4 * 256));
    }
}

#[test]
fn capacity_is_conserved_over_many_cycles() {
    let pool = uniform_pool(6, cap(12, 6000));
    let initial = pool.clone();
    let mut solver =
        BinPackingSolver::new(SolverConfig::new(100, 30_000), ClusterCapacity::new(), pool)
            .unwrap();

    let steps = [
        (true, cap(1, 300)),
        (true, cap(2, 700)),
        (false, cap(1, 300)),
        (true, cap(5, 1100)),
        (false, cap(2, 700)),
        (false, cap(1, 200)),
    ];

    for (grow, delta) in steps {
        solver = next_cycle(solver);
        if grow {
            solver.solve_manual_capacity_scale_out(&delta).unwrap();
        } else {
            solver.solve_manual_capacity_scale_in(&delta).unwrap();
        }

        for (agent, original) in &initial {
            let sum = solver
                .allocated_capacity_result()
                .get(agent)
                .checked_add(&solver.unallocated_capacity().get(agent))
                .unwrap();
            assert_eq!(sum, *original, "agent {agent} lost capacity");
        }
    }
}

#[test]
fn fractional_cpu_does_not_drift() {
    let mut solver = BinPackingSolver::new(
        SolverConfig::new(64, 1_000_000),
        ClusterCapacity::new(),
        uniform_pool(7, cap(64, 100_000)),
    )
    .unwrap();

    // 1 core over 3 containers, thirty times over.
    let delta = cap(1, 3 * 64);
    for _ in 0..30 {
        assert!(solver.solve_manual_capacity_scale_out(&delta).unwrap().is_complete());
    }
    assert_eq!(solver.allocated_capacity_result().total().unwrap(), cap(30, 90 * 64));

    for _ in 0..30 {
        assert!(solver.solve_manual_capacity_scale_in(&delta).unwrap().is_complete());
    }
    assert!(solver.allocated_capacity_result().is_empty());
    assert_eq!(solver.unallocated_capacity().total().unwrap(), cap(7 * 64, 700_000));
}

#[test]
fn agent_vanishing_between_cycles() {
    let mut solver = BinPackingSolver::new(
        SolverConfig::new(100, 10_000),
        ClusterCapacity::new(),
        uniform_pool(3, cap(4, 1000)),
    )
    .unwrap();
    solver
        .solve_manual_capacity_scale_out(&CapacityVector::memory(600))
        .unwrap();

    // agent-01 disappears from discovery.
    let config = solver.config().clone();
    let (allocated, mut unallocated) = solver.into_parts();
    unallocated.remove("agent-01");
    let mut solver = BinPackingSolver::new(config, allocated, unallocated).unwrap();

    let orphaned = solver.orphaned_allocations();
    assert_eq!(orphaned.get("agent-01"), CapacityVector::memory(200));

    // Replace the lost containers on the surviving agents.
    let lost = solver.drop_orphaned_allocations().total().unwrap();
    let outcome = solver.solve_manual_capacity_scale_out(&lost).unwrap();
    assert!(outcome.is_complete());

    let result = solver.allocated_capacity_result();
    assert!(!result.contains("agent-01"));
    assert_eq!(result.get("agent-00"), CapacityVector::memory(300));
    assert_eq!(result.get("agent-02"), CapacityVector::memory(300));
}

#[test]
fn partial_scale_out_reports_shortfall() {
    let mut solver = BinPackingSolver::new(
        SolverConfig::new(1024, 1024 * 1024),
        ClusterCapacity::new(),
        uniform_pool(2, cap(2, 2048)),
    )
    .unwrap();

    let outcome = solver
        .solve_manual_capacity_scale_out(&CapacityVector::memory(6 * 1024))
        .unwrap();

    assert_eq!(outcome.achieved, CapacityVector::memory(4 * 1024));
    assert_eq!(outcome.unmet(), CapacityVector::memory(2 * 1024));
    assert!(!outcome.is_complete());
}
