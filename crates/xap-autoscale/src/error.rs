//! Error types for the zone capacity clamps.

use thiserror::Error;
use xap_capacity::CapacityError;

/// Result type alias for clamp operations.
pub type SlaResult<T> = Result<T, SlaError>;

/// Inputs that break the clamp contract.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SlaError {
    #[error("zone {0} is not one of the deployment's zones")]
    UnknownZone(String),

    #[error("{plan} plan has capacity for zone {zone}, which is not one of the deployment's zones")]
    PlanZoneOutsideUniverse { plan: &'static str, zone: String },

    #[error("{scope}: minimum {min} exceeds maximum {max}")]
    MinimumAboveMaximum {
        scope: &'static str,
        min: String,
        max: String,
    },

    #[error(transparent)]
    Capacity(#[from] CapacityError),
}
