//! HeightCache - per-row heights with derived cumulative offsets
//!
//! Rows are dense: every index in `0..len()` has a height once the item set
//! is known. Offsets are derived by a single left-to-right fold and are
//! never edited by hand.
//!
//! # Complexity
//!
//! - `get`: O(1)
//! - `set`: O(n) when the value changes (offsets are re-folded), O(1) otherwise
//! - `recompute_offsets`: O(n)
//! - `row_start` / `offset` / `total_height`: O(1)

use super::types::RowHeight;
use std::ops::Range;

/// Heights of all rows plus their running cumulative offsets.
///
/// `offsets()[i]` is the sum of the heights of rows `0..=i`, which is also
/// the offset at which row `i + 1` begins.
#[derive(Debug, Clone, PartialEq)]
pub struct HeightCache {
    heights: Vec<RowHeight>,
    offsets: Vec<f64>,
    default_height: f64,
}

impl HeightCache {
    /// Creates an empty cache using `default_height` for estimated rows.
    ///
    /// # Examples
    ///
    /// ```
    /// # use vlist::view_state::height_cache::HeightCache;
    /// let cache = HeightCache::new(26.0);
    /// assert_eq!(cache.len(), 0);
    /// assert_eq!(cache.total_height(), 0.0);
    /// ```
    pub fn new(default_height: f64) -> Self {
        Self {
            heights: Vec::new(),
            offsets: Vec::new(),
            default_height,
        }
    }

    /// Creates a cache from explicit row heights and folds their offsets.
    ///
    /// # Examples
    ///
    /// ```
    /// # use vlist::view_state::height_cache::HeightCache;
    /// # use vlist::view_state::types::RowHeight;
    /// let cache = HeightCache::from_heights(
    ///     26.0,
    ///     vec![RowHeight::measured(10.0), RowHeight::estimated(26.0)],
    /// );
    /// assert_eq!(cache.offsets(), &[10.0, 36.0]);
    /// ```
    pub fn from_heights(default_height: f64, heights: Vec<RowHeight>) -> Self {
        let mut cache = Self {
            heights,
            offsets: Vec::new(),
            default_height,
        };
        cache.recompute_offsets();
        cache
    }

    /// Creates a cache of `len` estimated rows at the default height.
    pub fn estimated(default_height: f64, len: usize) -> Self {
        Self::from_heights(default_height, vec![RowHeight::estimated(default_height); len])
    }

    /// Height used for rows that have never been measured.
    pub fn default_height(&self) -> f64 {
        self.default_height
    }

    /// Returns the height at `index`.
    ///
    /// Falls back to an estimated default-height row when `index` is out of
    /// range, so callers never have to special-case missing rows.
    ///
    /// # Examples
    ///
    /// ```
    /// # use vlist::view_state::height_cache::HeightCache;
    /// # use vlist::view_state::types::RowHeight;
    /// let cache = HeightCache::new(26.0);
    /// assert_eq!(cache.get(7), RowHeight::estimated(26.0));
    /// ```
    pub fn get(&self, index: usize) -> RowHeight {
        self.heights
            .get(index)
            .copied()
            .unwrap_or_else(|| RowHeight::estimated(self.default_height))
    }

    /// Records a measured height for `index` and re-folds offsets.
    ///
    /// Returns `true` if the cache changed. Inserting the same measured
    /// height twice is a no-op the second time. Indices past the end (a
    /// response for a row that no longer exists) and non-finite values are
    /// ignored. Negative heights are clamped to zero so offsets stay
    /// non-decreasing.
    ///
    /// # Examples
    ///
    /// ```
    /// # use vlist::view_state::height_cache::HeightCache;
    /// let mut cache = HeightCache::estimated(10.0, 3);
    /// assert!(cache.set_measured(1, 30.0));
    /// assert!(!cache.set_measured(1, 30.0));
    /// assert_eq!(cache.offsets(), &[10.0, 40.0, 50.0]);
    /// ```
    pub fn set_measured(&mut self, index: usize, value: f64) -> bool {
        if !value.is_finite() {
            return false;
        }
        self.set(index, RowHeight::measured(value.max(0.0)))
    }

    /// Replaces the height at `index`, re-folding offsets when it changed.
    pub fn set(&mut self, index: usize, height: RowHeight) -> bool {
        let Some(slot) = self.heights.get_mut(index) else {
            return false;
        };
        if *slot == height {
            return false;
        }
        *slot = height;
        self.recompute_offsets();
        true
    }

    /// Recomputes cumulative offsets from the current heights.
    ///
    /// A single left-to-right fold; O(n) in the number of rows.
    pub fn recompute_offsets(&mut self) -> &[f64] {
        self.offsets.clear();
        self.offsets.reserve(self.heights.len());
        let mut running = 0.0;
        for height in &self.heights {
            running += height.value;
            self.offsets.push(running);
        }
        &self.offsets
    }

    /// Cumulative offsets, one per row.
    pub fn offsets(&self) -> &[f64] {
        &self.offsets
    }

    /// Cumulative offset at the end of row `index`, if the row exists.
    pub fn offset(&self, index: usize) -> Option<f64> {
        self.offsets.get(index).copied()
    }

    /// Offset at which row `index` begins.
    ///
    /// Row 0 always begins at 0; other rows begin where the previous one
    /// ends. `None` when the previous row's offset is unknown.
    ///
    /// # Examples
    ///
    /// ```
    /// # use vlist::view_state::height_cache::HeightCache;
    /// let cache = HeightCache::estimated(26.0, 3);
    /// assert_eq!(cache.row_start(0), Some(0.0));
    /// assert_eq!(cache.row_start(2), Some(52.0));
    /// assert_eq!(cache.row_start(9), None);
    /// ```
    pub fn row_start(&self, index: usize) -> Option<f64> {
        if index == 0 {
            Some(0.0)
        } else {
            self.offset(index - 1)
        }
    }

    /// Total scrollable content height: offset of the last row, or 0.
    pub fn total_height(&self) -> f64 {
        self.offsets.last().copied().unwrap_or(0.0)
    }

    /// Indices in `range` whose height is still estimated.
    pub fn unmeasured_in(&self, range: Range<usize>) -> Vec<usize> {
        let end = range.end.min(self.heights.len());
        let start = range.start.min(end);
        (start..end)
            .filter(|&i| !self.heights[i].is_measured())
            .collect()
    }

    /// All row heights in index order.
    pub fn heights(&self) -> &[RowHeight] {
        &self.heights
    }

    /// Returns the number of rows.
    pub fn len(&self) -> usize {
        self.heights.len()
    }

    /// Returns true if the cache holds no rows.
    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view_state::types::Provenance;
    use proptest::prelude::*;

    #[test]
    fn test_empty_cache() {
        let cache = HeightCache::new(26.0);
        assert!(cache.is_empty());
        assert_eq!(cache.total_height(), 0.0);
        assert!(cache.offsets().is_empty());
    }

    #[test]
    fn test_estimated_rows_use_default_height() {
        let cache = HeightCache::estimated(26.0, 4);
        assert_eq!(cache.len(), 4);
        assert_eq!(cache.total_height(), 104.0);
        assert!(cache
            .heights()
            .iter()
            .all(|h| h.provenance == Provenance::Estimated));
    }

    #[test]
    fn test_set_measured_refolds_offsets() {
        let mut cache = HeightCache::estimated(10.0, 3);
        cache.set_measured(0, 25.0);

        assert_eq!(cache.offsets(), &[25.0, 35.0, 45.0]);
        assert_eq!(cache.get(0), RowHeight::measured(25.0));
    }

    #[test]
    fn test_set_measured_twice_is_idempotent() {
        let mut once = HeightCache::estimated(26.0, 6);
        once.set_measured(3, 42.0);

        let mut twice = HeightCache::estimated(26.0, 6);
        twice.set_measured(3, 42.0);
        twice.set_measured(3, 42.0);

        assert_eq!(once, twice);
        assert_eq!(once.offsets(), twice.offsets());
    }

    #[test]
    fn test_measuring_same_value_as_estimate_retags() {
        let mut cache = HeightCache::estimated(26.0, 2);
        assert!(cache.set_measured(1, 26.0));
        assert!(cache.get(1).is_measured());
        assert_eq!(cache.total_height(), 52.0);
    }

    #[test]
    fn test_set_out_of_range_is_ignored() {
        let mut cache = HeightCache::estimated(10.0, 2);
        assert!(!cache.set_measured(5, 99.0));
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.total_height(), 20.0);
    }

    #[test]
    fn test_non_finite_measurement_is_ignored() {
        let mut cache = HeightCache::estimated(10.0, 2);
        assert!(!cache.set_measured(0, f64::NAN));
        assert!(!cache.set_measured(0, f64::INFINITY));
        assert!(!cache.get(0).is_measured());
    }

    #[test]
    fn test_negative_measurement_clamps_to_zero() {
        let mut cache = HeightCache::estimated(10.0, 2);
        cache.set_measured(0, -5.0);
        assert_eq!(cache.get(0), RowHeight::measured(0.0));
        assert_eq!(cache.offsets(), &[0.0, 10.0]);
    }

    #[test]
    fn test_unmeasured_in_clamps_range() {
        let mut cache = HeightCache::estimated(10.0, 5);
        cache.set_measured(1, 10.0);
        cache.set_measured(3, 10.0);

        assert_eq!(cache.unmeasured_in(0..5), vec![0, 2, 4]);
        assert_eq!(cache.unmeasured_in(2..100), vec![2, 4]);
        assert!(cache.unmeasured_in(7..9).is_empty());
    }

    #[test]
    fn test_get_past_end_falls_back_to_estimated_default() {
        let cache = HeightCache::estimated(10.0, 1);
        assert_eq!(cache.get(3), RowHeight::estimated(10.0));
    }

    proptest! {
        /// offsets[i] == sum(heights[0..=i])
        #[test]
        fn prop_offsets_are_cumulative(values in prop::collection::vec(0.0f64..500.0, 1..80)) {
            let heights = values.iter().map(|&v| RowHeight::measured(v)).collect();
            let cache = HeightCache::from_heights(26.0, heights);

            let mut expected = 0.0;
            for (i, v) in values.iter().enumerate() {
                expected += v;
                prop_assert!((cache.offsets()[i] - expected).abs() < 1e-6);
            }
        }

        /// offsets never decrease, whatever measurements arrive
        #[test]
        fn prop_offsets_are_monotonic(
            len in 1usize..120,
            updates in prop::collection::vec((0usize..150, -50.0f64..400.0), 0..60)
        ) {
            let mut cache = HeightCache::estimated(26.0, len);
            for (index, value) in updates {
                cache.set_measured(index, value);
            }
            for pair in cache.offsets().windows(2) {
                prop_assert!(pair[1] >= pair[0]);
            }
        }

        /// total height equals the last offset
        #[test]
        fn prop_total_is_last_offset(len in 0usize..100) {
            let cache = HeightCache::estimated(13.0, len);
            let expected = cache.offsets().last().copied().unwrap_or(0.0);
            prop_assert_eq!(cache.total_height(), expected);
        }
    }
}
