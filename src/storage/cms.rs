//! Count-Min Sketch
//!
//! A `rows x columns` grid of saturating u64 counters. Row `i` hashes items
//! with 32-bit MurmurHash3 seeded by `i`; an estimate is the minimum of the
//! item's counter in every row, so it never under-counts.

use std::f64::consts::E;

use super::hash::hash32;
use crate::error::{Error, Result};

/// Dimensions and running total, as reported by CMS.INFO
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CMSInfo {
    pub rows: usize,
    pub columns: usize,
    pub count: u64,
}

/// Largest number of counters a sketch may allocate (512 MiB)
pub const MAX_COUNTERS: usize = 1 << 26;

#[derive(Debug, Clone)]
pub struct CountMinSketch {
    rows: usize,
    columns: usize,
    /// Row-major rows x columns counters
    counters: Vec<u64>,
    /// Sum of all increments
    total_count: u64,
}

impl CountMinSketch {
    /// Create a sketch with explicit dimensions
    pub fn new(rows: usize, columns: usize) -> Result<Self> {
        if rows == 0 || columns == 0 {
            return Err(Error::Config("dimensions must be positive"));
        }
        let total = rows
            .checked_mul(columns)
            .filter(|&n| n <= MAX_COUNTERS)
            .ok_or(Error::Config("dimensions too large"))?;

        let mut counters = Vec::new();
        counters
            .try_reserve_exact(total)
            .map_err(|_| Error::Config("not enough memory for sketch"))?;
        counters.resize(total, 0u64);

        Ok(Self {
            rows,
            columns,
            counters,
            total_count: 0,
        })
    }

    /// Size the sketch from an error bound and the probability of exceeding it:
    /// `rows = ceil(e / error_rate)`, `columns = ceil(ln(1 / probability))`
    pub fn from_error_prob(error_rate: f64, probability: f64) -> Result<Self> {
        if !(error_rate > 0.0 && error_rate < 1.0) {
            return Err(Error::Config("error rate should be between 0 and 1"));
        }
        if !(probability > 0.0 && probability < 1.0) {
            return Err(Error::Config("probability should be between 0 and 1"));
        }

        let rows = (E / error_rate).ceil() as usize;
        let columns = (1.0 / probability).ln().ceil() as usize;
        Self::new(rows.max(1), columns.max(1))
    }

    #[inline]
    fn column(&self, item: &[u8], row: usize) -> usize {
        hash32(item, row as u32) as usize % self.columns
    }

    /// Add `delta` to the item's counter in every row.
    /// Returns the new estimate (minimum of the updated counters).
    pub fn incr_by(&mut self, item: &[u8], delta: u64) -> u64 {
        self.total_count = self.total_count.saturating_add(delta);

        let mut min = u64::MAX;
        for row in 0..self.rows {
            let col = self.column(item, row);
            let counter = &mut self.counters[row * self.columns + col];
            *counter = counter.saturating_add(delta);
            min = min.min(*counter);
        }
        min
    }

    /// Estimated count of an item, never below the true count
    pub fn estimate(&self, item: &[u8]) -> u64 {
        (0..self.rows)
            .map(|row| self.counters[row * self.columns + self.column(item, row)])
            .min()
            .unwrap_or(0)
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn columns(&self) -> usize {
        self.columns
    }

    #[inline]
    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    pub fn info(&self) -> CMSInfo {
        CMSInfo {
            rows: self.rows,
            columns: self.columns,
            count: self.total_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashMap;

    #[test]
    fn test_incr_and_estimate() {
        let mut cms = CountMinSketch::new(5, 100).unwrap();
        assert_eq!(cms.incr_by(b"x", 5), 5);
        assert!(cms.incr_by(b"x", 3) >= 8);
        assert!(cms.estimate(b"x") >= 8);
        assert_eq!(cms.total_count(), 8);
        assert_eq!(cms.estimate(b"never-seen"), 0);
    }

    #[test]
    fn test_dimensions() {
        assert!(matches!(CountMinSketch::new(0, 10), Err(Error::Config(_))));
        assert!(matches!(CountMinSketch::new(10, 0), Err(Error::Config(_))));

        let cms = CountMinSketch::from_error_prob(0.01, 0.01).unwrap();
        // ceil(e / 0.01) = 272, ceil(ln 100) = 5
        assert_eq!(cms.rows(), 272);
        assert_eq!(cms.columns(), 5);
        assert_eq!(
            cms.info(),
            CMSInfo {
                rows: 272,
                columns: 5,
                count: 0
            }
        );

        assert!(CountMinSketch::from_error_prob(0.0, 0.01).is_err());
        assert!(CountMinSketch::from_error_prob(0.01, 1.0).is_err());
    }

    #[test]
    fn test_oversized_dimensions_are_rejected() {
        assert!(matches!(
            CountMinSketch::new(usize::MAX, 2),
            Err(Error::Config("dimensions too large"))
        ));
        assert!(matches!(
            CountMinSketch::new(1 << 20, 1 << 20),
            Err(Error::Config("dimensions too large"))
        ));
        assert!(matches!(
            CountMinSketch::from_error_prob(1e-300, 0.5),
            Err(Error::Config("dimensions too large"))
        ));
    }

    #[test]
    fn test_saturating_counters() {
        let mut cms = CountMinSketch::new(2, 4).unwrap();
        cms.incr_by(b"a", u64::MAX - 1);
        assert_eq!(cms.incr_by(b"a", 10), u64::MAX);
        assert_eq!(cms.total_count(), u64::MAX);
    }

    proptest! {
        #[test]
        fn prop_never_underestimates(
            updates in prop::collection::vec((0u8..20, 1u64..1000), 1..200)
        ) {
            let mut cms = CountMinSketch::new(4, 16).unwrap();
            let mut truth: HashMap<u8, u64> = HashMap::new();
            for (item, delta) in &updates {
                cms.incr_by(&[*item], *delta);
                *truth.entry(*item).or_default() += delta;
            }
            for (item, count) in truth {
                prop_assert!(cms.estimate(&[item]) >= count);
            }
        }
    }
}
