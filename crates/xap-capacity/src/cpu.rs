//! Exact CPU core quantities.
//!
//! Containers receive fractional shares of a machine's cores. Those shares
//! are kept as reduced `i64` fractions so that thousands of incremental
//! allocate/deallocate steps add back up to the exact starting value.
//!
//! All arithmetic is checked: denominators grow through addition, and an
//! `i64` overflow is reported instead of panicking.

use std::fmt;
use std::str::FromStr;

use num_rational::Rational64;
use num_traits::{CheckedAdd, CheckedDiv, CheckedMul, CheckedSub, Zero};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{CapacityError, CapacityResult};

/// A non-negative, exact number of CPU cores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CpuCores(Rational64);

impl CpuCores {
    pub const ZERO: CpuCores = CpuCores(Rational64::new_raw(0, 1));

    /// Build `numer / denom` cores. Rejects a zero or negative denominator
    /// and a negative numerator.
    pub fn new(numer: i64, denom: i64) -> CapacityResult<Self> {
        if denom <= 0 || numer < 0 {
            return Err(CapacityError::InvalidCpu(format!("{numer}/{denom}")));
        }
        Ok(Self(Rational64::new(numer, denom)))
    }

    /// Whole cores.
    pub fn from_cores(cores: u32) -> Self {
        Self(Rational64::from_integer(i64::from(cores)))
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn numer(&self) -> i64 {
        *self.0.numer()
    }

    pub fn denom(&self) -> i64 {
        *self.0.denom()
    }

    /// `self + other`, or `None` on overflow.
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(&other.0).map(Self)
    }

    /// `self - other`, or `None` if the result would be negative.
    pub fn checked_sub(self, other: Self) -> Option<Self> {
        if other > self {
            return None;
        }
        self.0.checked_sub(&other.0).map(Self)
    }

    /// `self - other`, clamped at zero.
    pub fn saturating_sub(self, other: Self) -> Self {
        self.checked_sub(other).unwrap_or(Self::ZERO)
    }

    /// Split into `parts` equal shares. `None` when `parts` is zero or the
    /// share is not representable.
    pub fn split(self, parts: u64) -> Option<Self> {
        let parts = i64::try_from(parts).ok().filter(|p| *p > 0)?;
        self.0.checked_div(&Rational64::from_integer(parts)).map(Self)
    }

    /// `self * part / whole`, the share of these cores that goes with
    /// `part` out of `whole`. `None` when `whole` is zero or on overflow.
    pub fn portion(self, part: u64, whole: u64) -> Option<Self> {
        let part = i64::try_from(part).ok()?;
        let whole = i64::try_from(whole).ok().filter(|w| *w > 0)?;
        self.0.checked_mul(&Rational64::new(part, whole)).map(Self)
    }
}

impl Default for CpuCores {
    fn default() -> Self {
        Self::ZERO
    }
}


impl fmt::Display for CpuCores {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parses `"2"`, `"3/2"` or a plain decimal such as `"1.25"`.
impl FromStr for CpuCores {
    type Err = CapacityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || CapacityError::InvalidCpu(s.to_string());

        if let Some((numer, denom)) = s.split_once('/') {
            let numer: i64 = numer.trim().parse().map_err(|_| invalid())?;
            let denom: i64 = denom.trim().parse().map_err(|_| invalid())?;
            return Self::new(numer, denom);
        }

        if let Some((whole, frac)) = s.split_once('.') {
            if frac.is_empty() || !frac.chars().all(|c| c.is_ascii_digit()) {
                return Err(invalid());
            }
            let scale = u32::try_from(frac.len())
                .ok()
                .and_then(|digits| 10_i64.checked_pow(digits))
                .ok_or_else(invalid)?;
            let whole: i64 = if whole.is_empty() {
                0
            } else {
                whole.parse().map_err(|_| invalid())?
            };
            let frac: i64 = frac.parse().map_err(|_| invalid())?;
            let numer = whole
                .checked_mul(scale)
                .and_then(|n| n.checked_add(frac))
                .ok_or_else(invalid)?;
            return Self::new(numer, scale);
        }

        let whole: i64 = s.parse().map_err(|_| invalid())?;
        Self::new(whole, 1)
    }
}

impl Serialize for CpuCores {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for CpuCores {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CpuCoresVisitor;

        impl Visitor<'_> for CpuCoresVisitor {
            type Value = CpuCores;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a non-negative core count such as 2, \"3/2\" or \"0.5\"")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<CpuCores, E> {
                v.parse().map_err(E::custom)
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<CpuCores, E> {
                let v = i64::try_from(v).map_err(E::custom)?;
                CpuCores::new(v, 1).map_err(E::custom)
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<CpuCores, E> {
                CpuCores::new(v, 1).map_err(E::custom)
            }
        }

        deserializer.deserialize_any(CpuCoresVisitor)
    }
}
