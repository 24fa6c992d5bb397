//! Minimum and maximum capacity of a single zone.
//!
//! Both functions are pure. Within a cycle they may be called per zone in
//! any order: whatever was already decided for other zones must be present
//! in `new_planned`, everything else is taken from `last_enforced`.

use std::collections::BTreeSet;

use tracing::debug;
use xap_capacity::{CapacityPerZones, CapacityVector, ZoneSet};

use crate::error::{SlaError, SlaResult};

/// The most capacity `zone` may be assigned this cycle.
///
/// Never exceeds `max_per_zone`, nor what is left of `total_max` after the
/// other zones. A zero `max_per_zone` bans the zone outright.
pub fn get_maximum_capacity(
    total_max: &CapacityVector,
    max_per_zone: &CapacityVector,
    last_enforced: &CapacityPerZones,
    new_planned: &CapacityPerZones,
    zone: &ZoneSet,
    all_zones: &BTreeSet<ZoneSet>,
) -> SlaResult<CapacityVector> {
    validate(last_enforced, new_planned, zone, all_zones)?;

    if max_per_zone.is_zero() {
        return Ok(CapacityVector::ZERO);
    }

    let others = capacity_of_other_zones(last_enforced, new_planned, zone, all_zones)?;
    let remaining = total_max.saturating_sub(&others);
    let maximum = max_per_zone.min(&remaining);

    debug!(
        zone = %zone,
        others = %others,
        remaining = %remaining,
        maximum = %maximum,
        "computed zone maximum"
    );
    Ok(maximum)
}

/// The least capacity `zone` must be assigned this cycle.
///
/// At least `min_per_zone`, raised to cover whatever part of `total_min`
/// the other zones do not already hold.
pub fn get_minimum_capacity(
    total_min: &CapacityVector,
    min_per_zone: &CapacityVector,
    last_enforced: &CapacityPerZones,
    new_planned: &CapacityPerZones,
    zone: &ZoneSet,
    all_zones: &BTreeSet<ZoneSet>,
) -> SlaResult<CapacityVector> {
    validate(last_enforced, new_planned, zone, all_zones)?;

    let others = capacity_of_other_zones(last_enforced, new_planned, zone, all_zones)?;
    let shortfall = total_min.saturating_sub(&others);
    let minimum = min_per_zone.max(&shortfall);

    debug!(
        zone = %zone,
        others = %others,
        shortfall = %shortfall,
        minimum = %minimum,
        "computed zone minimum"
    );
    Ok(minimum)
}

fn capacity_of_other_zones(
    last_enforced: &CapacityPerZones,
    new_planned: &CapacityPerZones,
    zone: &ZoneSet,
    all_zones: &BTreeSet<ZoneSet>,
) -> SlaResult<CapacityVector> {
    let others = all_zones
        .iter()
        .filter(|other| *other != zone)
        .filter_map(|other| new_planned.get(other).or_else(|| last_enforced.get(other)));
    Ok(CapacityVector::checked_sum(others)?)
}

fn validate(
    last_enforced: &CapacityPerZones,
    new_planned: &CapacityPerZones,
    zone: &ZoneSet,
    all_zones: &BTreeSet<ZoneSet>,
) -> SlaResult<()> {
    if !all_zones.contains(zone) {
        return Err(SlaError::UnknownZone(zone.to_string()));
    }
    for (plan, capacities) in [("last enforced", last_enforced), ("new planned", new_planned)] {
        if let Some(stray) = capacities.zones().find(|z| !all_zones.contains(*z)) {
            return Err(SlaError::PlanZoneOutsideUniverse {
                plan,
                zone: stray.to_string(),
            });
        }
    }
    Ok(())
}
