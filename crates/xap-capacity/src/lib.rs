//! xap-capacity: capacity accounting types for the elastic planner.
//!
//! Everything the bin-packing solver and the zone clamps exchange is
//! expressed with the types in this crate:
//!
//! - **`CpuCores`**: exact rational CPU core count (never floating point)
//! - **`CapacityVector`**: `(cpu, memory_mb)` pair with element-wise ordering
//! - **`ClusterCapacity`**: agent id → capacity, ordered by agent id
//! - **`ZoneSet`** / **`CapacityPerZones`**: per-zone capacity plans

pub mod cluster;
pub mod cpu;
pub mod error;
pub mod vector;
pub mod zones;

pub use cluster::{AgentId, ClusterCapacity};
pub use cpu::CpuCores;
pub use error::{CapacityError, CapacityResult};
pub use vector::CapacityVector;
pub use zones::{CapacityPerZones, ZoneSet};
