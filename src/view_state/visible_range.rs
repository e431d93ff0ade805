//! Visible range calculation

use super::viewport::Viewport;
use serde::Serialize;
use std::ops::Range;

/// Half-open range `[start, end)` of rows to render.
///
/// # Invariants
/// - `start <= end`
/// - `end <= item count` of the list it was computed for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct VisibleRange {
    /// Index of first rendered row (inclusive).
    pub start: usize,
    /// Index of last rendered row (exclusive).
    pub end: usize,
}

impl VisibleRange {
    /// Create new visible range.
    ///
    /// # Panics
    /// In debug builds, panics if start > end.
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "start {start} > end {end}");
        Self { start, end }
    }

    /// Number of rows in the range.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Check if range is empty.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Iterate over row indices in the range.
    pub fn indices(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Check if a specific row index is in the range.
    pub fn contains(&self, index: usize) -> bool {
        self.indices().contains(&index)
    }

    /// Compute the rows to render for a viewport.
    ///
    /// `offsets[i]` is the cumulative offset at the end of row `i`.
    ///
    /// - first row: the first whose end is not above `scroll_top`
    ///   (the last row when the viewport lies entirely below the content)
    /// - end: one past the last row that starts above the viewport bottom
    ///
    /// The result is widened by `buffer` rows on both sides and clamped to
    /// `[0, item_count]`. Both boundaries are found by binary search.
    ///
    /// # Examples
    ///
    /// ```
    /// # use vlist::view_state::visible_range::VisibleRange;
    /// # use vlist::view_state::viewport::Viewport;
    /// let offsets: Vec<f64> = (1..=1000).map(|i| i as f64 * 26.0).collect();
    /// let range = VisibleRange::compute(&offsets, 1000, &Viewport::estimated(500.0), 5);
    /// assert_eq!(range, VisibleRange::new(0, 25));
    /// ```
    pub fn compute(offsets: &[f64], item_count: usize, viewport: &Viewport, buffer: usize) -> Self {
        let count = item_count.min(offsets.len());
        if count == 0 {
            return Self::default();
        }
        let offsets = &offsets[..count];
        let top = viewport.scroll_top();
        let bottom = viewport.bottom();

        // First row whose end reaches the viewport top.
        let first = offsets.partition_point(|&end| end < top).min(count - 1);

        // Rows starting above the viewport bottom: row i starts at offsets[i - 1].
        let last_exclusive = if bottom > 0.0 {
            1 + offsets[..count - 1].partition_point(|&end| end < bottom)
        } else {
            0
        };

        let start = first.saturating_sub(buffer);
        let end = last_exclusive.saturating_add(buffer).min(count).max(start);
        Self::new(start, end)
    }
}
