// ── Common types shared across the domain model ──

use std::fmt;
use std::iter::Sum;
use std::ops::Add;

use serde::{Deserialize, Serialize};

/// Throughput pair in KB/s.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Traffic {
    pub down: u32,
    pub up: u32,
}

impl Traffic {
    pub const ZERO: Self = Self { down: 0, up: 0 };
}

impl Add for Traffic {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            down: self.down.saturating_add(rhs.down),
            up: self.up.saturating_add(rhs.up),
        }
    }
}

impl Sum for Traffic {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

/// Token for a live radio link held in the registry's side table.
///
/// Peripherals carry this instead of the link object so snapshots stay
/// plain data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LinkHandle(pub(crate) u64);

impl fmt::Display for LinkHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "link#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn traffic_sum_saturates() {
        let total: Traffic = [
            Traffic { down: u32::MAX, up: 1 },
            Traffic { down: 5, up: 2 },
        ]
        .into_iter()
        .sum();
        assert_eq!(total, Traffic { down: u32::MAX, up: 3 });
    }
}
