//! The `Interval` key stored in `IntervalTree`, representing the closed range [low, high].
//!
//! Intervals are ordered by `low` first and `high` second. For `Interval<u32>`:
//! - [1,4] < [2,5], because 1 < 2
//! - [1,4] < [1,5], because 4 < 5
//!
//! Both ends are inclusive, so the point interval [x, x] is valid and two
//! intervals that share only an endpoint overlap.

use std::fmt;

/// The closed interval [low, high]
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub struct Interval<T> {
    /// Low value
    pub low: T,
    /// High value
    pub high: T,
}

impl<T: Ord> Interval<T> {
    /// Create a new `Interval`
    ///
    /// # Panics
    ///
    /// This method panics when low > high
    #[inline]
    pub fn new(low: T, high: T) -> Self {
        assert!(low <= high, "invalid range");
        Self { low, high }
    }

    /// Checks if self overlaps with other interval
    #[inline]
    pub fn overlap(&self, other: &Self) -> bool {
        self.low <= other.high && other.low <= self.high
    }
}

impl<T: Clone + Ord> Interval<T> {
    /// The interval [x, x].
    #[inline]
    pub fn point(x: T) -> Self {
        Self::new(x.clone(), x)
    }
}

impl<T: fmt::Display> fmt::Display for Interval<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.low, self.high)
    }
}
