//! One cycle of per-zone capacity planning.
//!
//! Visits every zone in order, clamps its desired capacity between the
//! zone minimum and maximum, and records the decision so later zones see
//! it. This is a single decision; scheduling cycles is the caller's job.

use std::collections::BTreeSet;

use tracing::{debug, info, warn};
use xap_capacity::{CapacityPerZones, ZoneSet};

use crate::error::{SlaError, SlaResult};
use crate::limits::ZoneCapacityLimits;
use crate::sla::{get_maximum_capacity, get_minimum_capacity};

/// Build the new per-zone plan from the desired capacity of each zone.
///
/// Zones without a desired entry keep their last enforced capacity (before
/// clamping). When a zone's minimum exceeds its maximum the maximum wins,
/// so no cap is ever exceeded.
pub fn plan_capacity_per_zones(
    desired: &CapacityPerZones,
    limits: &ZoneCapacityLimits,
    last_enforced: &CapacityPerZones,
    all_zones: &BTreeSet<ZoneSet>,
) -> SlaResult<CapacityPerZones> {
    limits.validate()?;
    if let Some(stray) = desired.zones().find(|z| !all_zones.contains(*z)) {
        return Err(SlaError::PlanZoneOutsideUniverse {
            plan: "desired",
            zone: stray.to_string(),
        });
    }

    let mut planned = CapacityPerZones::new();

    for zone in all_zones {
        let maximum = get_maximum_capacity(
            &limits.total_max,
            &limits.max_per_zone,
            last_enforced,
            &planned,
            zone,
            all_zones,
        )?;
        let minimum = get_minimum_capacity(
            &limits.total_min,
            &limits.min_per_zone,
            last_enforced,
            &planned,
            zone,
            all_zones,
        )?;

        if !minimum.fits_within(&maximum) {
            warn!(
                zone = %zone,
                minimum = %minimum,
                maximum = %maximum,
                "zone minimum exceeds maximum, capping at maximum"
            );
        }

        let wanted = desired
            .get(zone)
            .or_else(|| last_enforced.get(zone))
            .copied()
            .unwrap_or_default();
        let capacity = wanted.max(&minimum).min(&maximum);

        debug!(
            zone = %zone,
            wanted = %wanted,
            planned = %capacity,
            "planned zone capacity"
        );
        planned.set(zone.clone(), capacity);
    }

    let total = planned.total()?;
    info!(
        zones = planned.len(),
        total = %total,
        "planned capacity per zones"
    );
    Ok(planned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use xap_capacity::CapacityVector;

    fn zone(name: &str) -> ZoneSet {
        ZoneSet::new([name])
    }

    fn universe(names: &[&str]) -> BTreeSet<ZoneSet> {
        names.iter().map(|n| zone(n)).collect()
    }

    fn plan(entries: &[(&str, u64)]) -> CapacityPerZones {
        entries
            .iter()
            .map(|(name, mb)| (zone(name), CapacityVector::memory(*mb)))
            .collect()
    }

    #[test]
    fn later_zones_get_what_is_left() {
        let limits = ZoneCapacityLimits::new(CapacityVector::memory(1000), CapacityVector::memory(600));
        let desired = plan(&[("a", 500), ("b", 500), ("c", 500)]);

        let planned = plan_capacity_per_zones(
            &desired,
            &limits,
            &CapacityPerZones::new(),
            &universe(&["a", "b", "c"]),
        )
        .unwrap();

        assert_eq!(planned, plan(&[("a", 500), ("b", 500), ("c", 0)]));
    }

    #[test]
    fn first_zone_absorbs_global_floor() {
        let limits = ZoneCapacityLimits::new(CapacityVector::memory(1000), CapacityVector::memory(600))
            .with_total_min(CapacityVector::memory(300))
            .with_min_per_zone(CapacityVector::memory(50));

        let planned = plan_capacity_per_zones(
            &CapacityPerZones::new(),
            &limits,
            &CapacityPerZones::new(),
            &universe(&["a", "b", "c"]),
        )
        .unwrap();

        assert_eq!(planned, plan(&[("a", 300), ("b", 50), ("c", 50)]));
    }

    #[test]
    fn missing_desired_keeps_last_enforced() {
        let limits = ZoneCapacityLimits::new(CapacityVector::memory(1000), CapacityVector::memory(600));
        let last = plan(&[("a", 200), ("b", 300)]);
        let desired = plan(&[("a", 400)]);

        let planned =
            plan_capacity_per_zones(&desired, &limits, &last, &universe(&["a", "b"])).unwrap();

        assert_eq!(planned, plan(&[("a", 400), ("b", 300)]));
    }

    #[test]
    fn over_budget_plan_is_pulled_back_under_total() {
        let limits = ZoneCapacityLimits::new(CapacityVector::memory(200), CapacityVector::memory(600));
        let last = plan(&[("a", 100), ("b", 200)]);

        let planned = plan_capacity_per_zones(
            &CapacityPerZones::new(),
            &limits,
            &last,
            &universe(&["a", "b"]),
        )
        .unwrap();

        assert_eq!(planned, plan(&[("a", 0), ("b", 200)]));
        assert!(planned.total().unwrap().fits_within(&limits.total_max));
    }

    #[test]
    fn rejects_desired_zone_outside_universe() {
        let limits = ZoneCapacityLimits::new(CapacityVector::memory(200), CapacityVector::memory(200));
        let desired = plan(&[("x", 100)]);

        let err = plan_capacity_per_zones(
            &desired,
            &limits,
            &CapacityPerZones::new(),
            &universe(&["a"]),
        )
        .unwrap_err();

        assert!(matches!(err, SlaError::PlanZoneOutsideUniverse { plan: "desired", .. }));
    }
}
