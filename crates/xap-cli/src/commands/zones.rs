//! `xap-plan zones`: one cycle of per-zone capacity planning.

use std::path::Path;

use anyhow::Result;
use tracing::info;
use xap_autoscale::plan_capacity_per_zones;

use crate::output::{OutputFormat, ZonePlanReport, format_zone_report};
use crate::scenario::ZoneScenario;

pub fn plan(path: &str, format: OutputFormat) -> Result<()> {
    let scenario = ZoneScenario::from_file(Path::new(path))?;
    let all_zones = scenario.all_zones();
    info!(scenario = path, zones = all_zones.len(), "loaded zone scenario");

    let zones = plan_capacity_per_zones(
        &scenario.desired(),
        &scenario.limits,
        &scenario.last_enforced(),
        &all_zones,
    )?;
    let report = ZonePlanReport {
        total: zones.total()?,
        zones,
    };

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => {
            print!("{}", format_zone_report(&report));
        }
    }
    Ok(())
}
