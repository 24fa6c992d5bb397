//! xap-autoscale: per-zone capacity clamps for the autoscaling cycle.
//!
//! Each cycle the grid manager decides how much capacity every zone may
//! hold. A zone's share is bounded by its own limits and by what the
//! other zones already hold under the global limits.
//!
//! # Clamp Algorithm
//!
//! ```text
//! others(zone) = Σ over other zones z of
//!                  new_planned[z]       if z was already decided this cycle
//!                  last_enforced[z]     otherwise
//!
//! maximum(zone) = 0                                  if max_per_zone == 0
//!               = min(max_per_zone, total_max - others(zone))
//!
//! minimum(zone) = max(min_per_zone, total_min - others(zone))
//! ```
//!
//! Subtraction saturates at zero and min/max are element-wise over
//! `(cpu, memory)`.

pub mod error;
pub mod limits;
pub mod planner;
pub mod sla;

pub use error::{SlaError, SlaResult};
pub use limits::ZoneCapacityLimits;
pub use planner::plan_capacity_per_zones;
pub use sla::{get_maximum_capacity, get_minimum_capacity};
