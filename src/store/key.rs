//! Ordered key for floating point values

use std::cmp::Ordering;

/// Totally ordered wrapper around an `f64` index key
///
/// Stored as the IEEE-754 bits remapped so that unsigned comparison gives
/// the total order: negative values have every bit flipped, positive values
/// have only the sign bit flipped. `-0.0` sorts just below `0.0`. Every NaN
/// encoding maps to one canonical NaN key, greater than positive infinity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct ValueKey(u64);

impl ValueKey {
    /// Create a key from a float
    pub(crate) fn new(value: f64) -> Self {
        let value = if value.is_nan() { f64::NAN } else { value };
        let bits = value.to_bits();
        let ordered = if (bits >> 63) == 1 {
            !bits
        } else {
            bits ^ (1 << 63)
        };
        ValueKey(ordered)
    }
}

impl Ord for ValueKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl PartialOrd for ValueKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
