//! Global and per-zone capacity limits of a deployment.

use serde::{Deserialize, Serialize};
use xap_capacity::CapacityVector;

use crate::error::{SlaError, SlaResult};

/// Bounds on a deployment's capacity, across all zones and per zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneCapacityLimits {
    #[serde(default)]
    pub total_min: CapacityVector,
    pub total_max: CapacityVector,
    #[serde(default)]
    pub min_per_zone: CapacityVector,
    pub max_per_zone: CapacityVector,
}

impl ZoneCapacityLimits {
    /// Limits with no minimums.
    pub fn new(total_max: CapacityVector, max_per_zone: CapacityVector) -> Self {
        Self {
            total_min: CapacityVector::ZERO,
            total_max,
            min_per_zone: CapacityVector::ZERO,
            max_per_zone,
        }
    }

    pub fn with_total_min(mut self, total_min: CapacityVector) -> Self {
        self.total_min = total_min;
        self
    }

    pub fn with_min_per_zone(mut self, min_per_zone: CapacityVector) -> Self {
        self.min_per_zone = min_per_zone;
        self
    }

    pub fn validate(&self) -> SlaResult<()> {
        if !self.total_min.fits_within(&self.total_max) {
            return Err(SlaError::MinimumAboveMaximum {
                scope: "total",
                min: self.total_min.to_string(),
                max: self.total_max.to_string(),
            });
        }
        if !self.min_per_zone.fits_within(&self.max_per_zone) {
            return Err(SlaError::MinimumAboveMaximum {
                scope: "per zone",
                min: self.min_per_zone.to_string(),
                max: self.max_per_zone.to_string(),
            });
        }
        Ok(())
    }
}
