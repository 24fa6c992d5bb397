//! Plan reports in text and JSON form.

use clap::ValueEnum;
use serde::Serialize;
use xap_binpacking::{BinPackingSolver, ScaleOutcome};
use xap_capacity::{CapacityPerZones, CapacityVector, ClusterCapacity};

/// How reports are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Result of one solve, as printed by `scale-out` / `scale-in`.
#[derive(Debug, Clone, Serialize)]
pub struct SolveReport {
    pub direction: &'static str,
    pub requested: CapacityVector,
    pub achieved: CapacityVector,
    pub unmet: CapacityVector,
    pub complete: bool,
    pub allocated: ClusterCapacity,
    pub unallocated: ClusterCapacity,
    pub orphaned: ClusterCapacity,
}

impl SolveReport {
    pub fn new(direction: &'static str, outcome: &ScaleOutcome, solver: &BinPackingSolver) -> Self {
        Self {
            direction,
            requested: outcome.requested,
            achieved: outcome.achieved,
            unmet: outcome.unmet(),
            complete: outcome.is_complete(),
            allocated: solver.allocated_capacity_result().clone(),
            unallocated: solver.unallocated_capacity().clone(),
            orphaned: solver.orphaned_allocations(),
        }
    }
}

pub fn format_solve_report(report: &SolveReport) -> String {
    let mut out = String::new();

    out.push_str(&format!("Scale-{}\n", report.direction));
    out.push_str(&format!("  requested: {}\n", report.requested));
    out.push_str(&format!("  achieved:  {}\n", report.achieved));
    if !report.complete {
        out.push_str(&format!("  UNMET:     {}\n", report.unmet));
    }
    out.push('\n');

    out.push_str(&format!("{:<20} {:>24} {:>24}\n", "AGENT", "ALLOCATED", "FREE"));
    for (agent, free) in &report.unallocated {
        let allocated = report.allocated.get(agent);
        out.push_str(&format!(
            "{:<20} {:>24} {:>24}\n",
            agent,
            allocated.to_string(),
            free.to_string()
        ));
    }

    if !report.orphaned.is_empty() {
        out.push_str("\nOrphaned allocations (agent no longer discovered):\n");
        for (agent, capacity) in &report.orphaned {
            out.push_str(&format!("  {agent}: {capacity}\n"));
        }
    }

    out
}

/// Result of one zone planning cycle.
#[derive(Debug, Clone, Serialize)]
pub struct ZonePlanReport {
    pub total: CapacityVector,
    pub zones: CapacityPerZones,
}

pub fn format_zone_report(report: &ZonePlanReport) -> String {
    let mut out = String::new();

    out.push_str(&format!("{:<32} {:>24}\n", "ZONES", "PLANNED"));
    for (zones, capacity) in report.zones.iter() {
        out.push_str(&format!(
            "{:<32} {:>24}\n",
            zones.to_string(),
            capacity.to_string()
        ));
    }
    out.push_str(&format!("{:<32} {:>24}\n", "total", report.total.to_string()));

    out
}
