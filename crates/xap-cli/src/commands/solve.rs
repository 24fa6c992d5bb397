//! `xap-plan scale-out` / `xap-plan scale-in`: one bin-packing solve.

use std::path::Path;

use anyhow::Result;
use tracing::info;
use xap_binpacking::BinPackingSolver;

use crate::output::{OutputFormat, SolveReport, format_solve_report};
use crate::scenario::SolverScenario;

pub fn scale_out(path: &str, config: Option<&str>, format: OutputFormat) -> Result<()> {
    let (scenario, mut solver) = load(path, config)?;
    let outcome = solver.solve_manual_capacity_scale_out(&scenario.target)?;
    print(&SolveReport::new("out", &outcome, &solver), format)
}

pub fn scale_in(path: &str, config: Option<&str>, format: OutputFormat) -> Result<()> {
    let (scenario, mut solver) = load(path, config)?;
    let outcome = solver.solve_manual_capacity_scale_in(&scenario.target)?;
    print(&SolveReport::new("in", &outcome, &solver), format)
}

fn load(path: &str, config: Option<&str>) -> Result<(SolverScenario, BinPackingSolver)> {
    let scenario = SolverScenario::from_file(Path::new(path))?;
    let solver_config = scenario.solver_config(config.map(Path::new))?;
    let (allocated, unallocated) = scenario.capacity_maps();
    info!(
        scenario = path,
        config = config.unwrap_or("[solver]"),
        agents = unallocated.len(),
        target = %scenario.target,
        "loaded solver scenario"
    );
    let solver = BinPackingSolver::new(solver_config, allocated, unallocated)?;
    Ok((scenario, solver))
}

fn print(report: &SolveReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(report)?);
        }
        OutputFormat::Text => {
            print!("{}", format_solve_report(report));
        }
    }
    Ok(())
}
