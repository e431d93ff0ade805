//! Buffer policy: extra rows rendered beyond the visible window

use super::scroll::ScrollState;
use super::viewport::Viewport;

/// Upper bound on how much a fast flick can widen the buffer.
pub const MAX_BUFFER_MULTIPLIER: usize = 4;

/// Scroll speed (content units per step) that earns one extra multiple of
/// the base buffer.
const SPEED_PER_MULTIPLE: f64 = 100.0;

/// Computes how many rows to render outside the viewport on each side.
///
/// The computed value is sticky: it only changes while the user is actively
/// scrolling with dynamic buffering enabled, so it never shrinks in the
/// middle of a programmatic navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferPolicy {
    base: usize,
    dynamic: bool,
    current: usize,
}

impl BufferPolicy {
    pub fn new(base: usize, dynamic: bool) -> Self {
        Self {
            base,
            dynamic,
            current: base,
        }
    }

    /// Last computed buffer.
    pub fn current(&self) -> usize {
        self.current
    }

    /// Recomputes the buffer for the current scroll state.
    ///
    /// While manually scrolling with dynamic buffering enabled:
    /// `base * min(4, 1 + round(speed / 100))`. Otherwise the last value.
    ///
    /// # Examples
    ///
    /// ```
    /// # use vlist::view_state::buffer::BufferPolicy;
    /// # use vlist::view_state::scroll::ScrollState;
    /// # use vlist::view_state::viewport::Viewport;
    /// let mut policy = BufferPolicy::new(5, true);
    /// let mut viewport = Viewport::estimated(500.0);
    /// viewport.apply_scroll(260.0);
    /// assert_eq!(policy.compute(&ScrollState::ManualScroll, &viewport), 20);
    /// assert_eq!(policy.compute(&ScrollState::NoScroll, &viewport), 20);
    /// ```
    pub fn compute(&mut self, state: &ScrollState, viewport: &Viewport) -> usize {
        if !self.dynamic || !state.is_manual() {
            return self.current;
        }
        let extra = (viewport.scroll_speed() / SPEED_PER_MULTIPLE)
            .round()
            .clamp(0.0, (MAX_BUFFER_MULTIPLIER - 1) as f64) as usize;
        let multiplier = (1 + extra).min(MAX_BUFFER_MULTIPLIER);
        self.current = self.base.saturating_mul(multiplier);
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn viewport_after_step(step: f64) -> Viewport {
        let mut vp = Viewport::estimated(500.0);
        vp.apply_scroll(1_000.0);
        vp.apply_scroll(1_000.0 + step);
        vp
    }

    #[test]
    fn starts_at_base() {
        assert_eq!(BufferPolicy::new(5, true).current(), 5);
    }

    #[test]
    fn slow_manual_scroll_keeps_base() {
        let mut policy = BufferPolicy::new(5, true);
        let vp = viewport_after_step(30.0);
        assert_eq!(policy.compute(&ScrollState::ManualScroll, &vp), 5);
    }

    #[test]
    fn medium_manual_scroll_doubles_buffer() {
        let mut policy = BufferPolicy::new(5, true);
        let vp = viewport_after_step(-120.0);
        assert_eq!(policy.compute(&ScrollState::ManualScroll, &vp), 10);
    }

    #[test]
    fn fast_flick_is_capped() {
        let mut policy = BufferPolicy::new(5, true);
        let vp = viewport_after_step(10_000.0);
        assert_eq!(policy.compute(&ScrollState::ManualScroll, &vp), 20);
    }

    #[test]
    fn disabled_dynamic_buffer_never_changes() {
        let mut policy = BufferPolicy::new(5, false);
        let vp = viewport_after_step(10_000.0);
        assert_eq!(policy.compute(&ScrollState::ManualScroll, &vp), 5);
    }

    #[test]
    fn buffer_is_sticky_outside_manual_scroll() {
        let mut policy = BufferPolicy::new(5, true);
        policy.compute(&ScrollState::ManualScroll, &viewport_after_step(400.0));
        assert_eq!(policy.current(), 20);

        let calm = viewport_after_step(0.0);
        assert_eq!(policy.compute(&ScrollState::NoScroll, &calm), 20);
    }

    #[test]
    fn huge_base_saturates_instead_of_overflowing() {
        let mut policy = BufferPolicy::new(usize::MAX / 2, true);
        let vp = viewport_after_step(10_000.0);
        assert_eq!(policy.compute(&ScrollState::ManualScroll, &vp), usize::MAX);
    }

    proptest! {
        #[test]
        fn prop_dynamic_buffer_within_bounds(step in -1.0e7f64..1.0e7) {
            let mut policy = BufferPolicy::new(5, true);
            let buffer = policy.compute(&ScrollState::ManualScroll, &viewport_after_step(step));
            prop_assert!((5..=20).contains(&buffer));
        }
    }
}
