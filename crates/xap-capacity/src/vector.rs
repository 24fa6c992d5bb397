//! The `(cpu, memory)` capacity vector.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cpu::CpuCores;
use crate::error::{CapacityError, CapacityResult};

/// CPU cores and memory, the unit of all allocation accounting.
///
/// Ordering is element-wise: `a <= b` holds only when both components of
/// `a` are `<=` those of `b`. Vectors where one component is larger and
/// the other smaller are incomparable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CapacityVector {
    #[serde(default)]
    pub cpu: CpuCores,
    #[serde(default)]
    pub memory_mb: u64,
}

impl CapacityVector {
    pub const ZERO: CapacityVector = CapacityVector {
        cpu: CpuCores::ZERO,
        memory_mb: 0,
    };

    pub fn new(cpu: CpuCores, memory_mb: u64) -> Self {
        Self { cpu, memory_mb }
    }

    /// Memory only, zero cores.
    pub fn memory(memory_mb: u64) -> Self {
        Self {
            cpu: CpuCores::ZERO,
            memory_mb,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.cpu.is_zero() && self.memory_mb == 0
    }

    /// `self + other`. Fails rather than wrapping when either component
    /// overflows.
    pub fn checked_add(&self, other: &Self) -> CapacityResult<Self> {
        let overflow = || CapacityError::Overflow {
            lhs: self.to_string(),
            rhs: other.to_string(),
        };
        Ok(Self {
            cpu: self.cpu.checked_add(other.cpu).ok_or_else(overflow)?,
            memory_mb: self.memory_mb.checked_add(other.memory_mb).ok_or_else(overflow)?,
        })
    }

    /// Sum of `items`, failing on the first overflow.
    pub fn checked_sum<'a>(items: impl IntoIterator<Item = &'a Self>) -> CapacityResult<Self> {
        items
            .into_iter()
            .try_fold(Self::ZERO, |acc, item| acc.checked_add(item))
    }

    /// `self - other`, or `None` if either component would go negative.
    pub fn checked_sub(&self, other: &Self) -> Option<Self> {
        Some(Self {
            cpu: self.cpu.checked_sub(other.cpu)?,
            memory_mb: self.memory_mb.checked_sub(other.memory_mb)?,
        })
    }

    /// Component-wise `self - other`, each clamped at zero.
    pub fn saturating_sub(&self, other: &Self) -> Self {
        Self {
            cpu: self.cpu.saturating_sub(other.cpu),
            memory_mb: self.memory_mb.saturating_sub(other.memory_mb),
        }
    }

    /// Component-wise minimum.
    pub fn min(&self, other: &Self) -> Self {
        Self {
            cpu: self.cpu.min(other.cpu),
            memory_mb: self.memory_mb.min(other.memory_mb),
        }
    }

    /// Component-wise maximum.
    pub fn max(&self, other: &Self) -> Self {
        Self {
            cpu: self.cpu.max(other.cpu),
            memory_mb: self.memory_mb.max(other.memory_mb),
        }
    }

    /// True when every component fits inside `other`.
    pub fn fits_within(&self, other: &Self) -> bool {
        self.cpu <= other.cpu && self.memory_mb <= other.memory_mb
    }
}

impl PartialOrd for CapacityVector {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (
            self.cpu.cmp(&other.cpu),
            self.memory_mb.cmp(&other.memory_mb),
        ) {
            (a, b) if a == b => Some(a),
            (Ordering::Equal, b) => Some(b),
            (a, Ordering::Equal) => Some(a),
            _ => None,
        }
    }
}

impl fmt::Display for CapacityVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} cores, {}MB", self.cpu, self.memory_mb)
    }
}
