//! Viewport tracker

use super::types::Provenance;
use serde::{Deserialize, Serialize};

/// Raw viewport reading reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportMetrics {
    pub scroll_top: f64,
    pub height: f64,
}

/// Current scroll offset, one step of scroll history and container height.
///
/// Stays [`Provenance::Estimated`] until the host confirms a real read.
/// `previous_scroll_top` changes exactly when `scroll_top` changes, so the
/// difference between the two is the most recent scroll step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    height: f64,
    scroll_top: f64,
    previous_scroll_top: f64,
    provenance: Provenance,
}

impl Viewport {
    /// Unconfirmed viewport at the top of the list.
    pub fn estimated(height: f64) -> Self {
        Self {
            height,
            scroll_top: 0.0,
            previous_scroll_top: 0.0,
            provenance: Provenance::Estimated,
        }
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn scroll_top(&self) -> f64 {
        self.scroll_top
    }

    pub fn previous_scroll_top(&self) -> f64 {
        self.previous_scroll_top
    }

    pub fn provenance(&self) -> Provenance {
        self.provenance
    }

    pub fn is_measured(&self) -> bool {
        self.provenance == Provenance::Measured
    }

    /// Bottom edge of the viewport in content coordinates.
    pub fn bottom(&self) -> f64 {
        self.scroll_top + self.height
    }

    /// Absolute size of the last scroll step.
    pub fn scroll_speed(&self) -> f64 {
        (self.scroll_top - self.previous_scroll_top).abs()
    }

    /// Applies a confirmed read from the host.
    ///
    /// Returns `true` if anything observable changed (including the first
    /// confirmation of an unchanged estimate).
    pub fn apply_read(&mut self, metrics: ViewportMetrics) -> bool {
        let was_estimated = self.provenance == Provenance::Estimated;
        let height_changed = self.height != metrics.height;
        self.height = metrics.height.max(0.0);
        self.provenance = Provenance::Measured;
        let scrolled = self.apply_scroll(metrics.scroll_top);
        was_estimated || height_changed || scrolled
    }

    /// Applies a scroll offset from a scroll event.
    ///
    /// Returns `true` if the offset moved.
    pub fn apply_scroll(&mut self, scroll_top: f64) -> bool {
        if !scroll_top.is_finite() || scroll_top == self.scroll_top {
            return false;
        }
        self.previous_scroll_top = self.scroll_top;
        self.scroll_top = scroll_top;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_estimated_at_top() {
        let vp = Viewport::estimated(500.0);
        assert_eq!(vp.provenance(), Provenance::Estimated);
        assert_eq!(vp.scroll_top(), 0.0);
        assert_eq!(vp.height(), 500.0);
        assert_eq!(vp.bottom(), 500.0);
    }

    #[test]
    fn read_confirms_viewport() {
        let mut vp = Viewport::estimated(500.0);
        let changed = vp.apply_read(ViewportMetrics {
            scroll_top: 0.0,
            height: 500.0,
        });
        assert!(changed, "first confirmation counts as a change");
        assert!(vp.is_measured());
    }

    #[test]
    fn identical_second_read_is_not_a_change() {
        let mut vp = Viewport::estimated(500.0);
        let metrics = ViewportMetrics {
            scroll_top: 40.0,
            height: 480.0,
        };
        vp.apply_read(metrics);
        assert!(!vp.apply_read(metrics));
    }

    #[test]
    fn previous_scroll_top_tracks_exactly_one_step() {
        let mut vp = Viewport::estimated(500.0);
        vp.apply_scroll(100.0);
        vp.apply_scroll(350.0);
        assert_eq!(vp.previous_scroll_top(), 100.0);
        assert_eq!(vp.scroll_speed(), 250.0);
    }

    #[test]
    fn unchanged_scroll_keeps_history() {
        let mut vp = Viewport::estimated(500.0);
        vp.apply_scroll(100.0);
        assert!(!vp.apply_scroll(100.0));
        assert_eq!(vp.previous_scroll_top(), 0.0);
        assert_eq!(vp.scroll_speed(), 100.0);
    }

    #[test]
    fn non_finite_scroll_is_ignored() {
        let mut vp = Viewport::estimated(500.0);
        assert!(!vp.apply_scroll(f64::NAN));
        assert_eq!(vp.scroll_top(), 0.0);
    }
}
