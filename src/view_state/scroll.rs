//! Scroll state and navigation target resolution

use super::height_cache::HeightCache;
use super::types::Alignment;
use crate::model::ItemId;
use serde::Serialize;

/// Scroll commands closer than this to the current offset are not issued.
pub const MIN_SCROLL_DELTA: f64 = 1.0;

/// Sequence number of one scroll-to-item request.
///
/// Timers capture the navigation they were scheduled for; a timer whose
/// navigation is no longer active is a no-op when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct NavigationId(u64);

impl NavigationId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(&self) -> u64 {
        self.0
    }

    pub fn next(&self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// An active navigation homing in on a known row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Navigation {
    pub id: NavigationId,
    /// Item being navigated to; the target index follows it across item-set changes.
    pub item_id: ItemId,
    pub target: ScrollTarget,
    /// Row start the last scroll command aimed for.
    pub target_offset: f64,
    /// Consecutive convergence checks that found the target in place.
    pub stable_count: u32,
    /// Scroll commands re-issued by convergence checks so far.
    pub attempts: u32,
    /// Clamped scroll position of the last issued scroll command.
    pub aimed_position: Option<f64>,
    /// A scroll command was issued and its scroll event has not arrived yet.
    pub awaiting_echo: bool,
}

impl Navigation {
    pub fn new(id: NavigationId, item_id: ItemId, target: ScrollTarget) -> Self {
        Self {
            id,
            item_id,
            target,
            target_offset: 0.0,
            stable_count: 0,
            attempts: 0,
            aimed_position: None,
            awaiting_echo: false,
        }
    }

    /// Whether a scroll event to `scroll_top` is the result of our own
    /// scroll command rather than the user.
    ///
    /// ```
    /// # use vlist::view_state::scroll::{Navigation, NavigationId, ScrollTarget};
    /// # use vlist::view_state::types::Alignment;
    /// let mut nav = Navigation::new(
    ///     NavigationId::new(1),
    ///     "row-3".into(),
    ///     ScrollTarget::new(3, Alignment::Top),
    /// );
    /// assert!(!nav.is_echo(78.0));
    /// nav.aimed_position = Some(78.0);
    /// assert!(nav.is_echo(78.4));
    /// assert!(!nav.is_echo(300.0));
    /// nav.awaiting_echo = true;
    /// assert!(nav.is_echo(300.0));
    /// ```
    pub fn is_echo(&self, scroll_top: f64) -> bool {
        self.awaiting_echo
            || self
                .aimed_position
                .is_some_and(|aimed| !needs_scroll(aimed, scroll_top))
    }
}

/// Scroll state machine.
///
/// Retry counters live inside the variant they belong to, so they can never
/// outlive or desync from the state that uses them.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ScrollState {
    /// Idle; the list may be revealed.
    #[default]
    NoScroll,
    /// The user is actively scrolling; target seeking is suppressed.
    ManualScroll,
    /// A target was requested but its identifier is not in the item list yet.
    SearchingForItem {
        id: NavigationId,
        item_id: ItemId,
        alignment: Alignment,
        attempts: u32,
    },
    /// Homing in on a known row index.
    InProgress(Navigation),
}

impl ScrollState {
    pub fn is_manual(&self) -> bool {
        matches!(self, Self::ManualScroll)
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Self::NoScroll)
    }

    /// True while a scroll-to-item request is outstanding.
    pub fn is_navigating(&self) -> bool {
        matches!(self, Self::SearchingForItem { .. } | Self::InProgress(_))
    }

    /// Navigation the state belongs to, if any.
    pub fn navigation_id(&self) -> Option<NavigationId> {
        match self {
            Self::SearchingForItem { id, .. } => Some(*id),
            Self::InProgress(nav) => Some(nav.id),
            Self::NoScroll | Self::ManualScroll => None,
        }
    }
}

/// Row to scroll to and where it should land on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScrollTarget {
    pub index: usize,
    pub alignment: Alignment,
}

impl ScrollTarget {
    pub fn new(index: usize, alignment: Alignment) -> Self {
        Self { index, alignment }
    }

    /// Offset at which the target row begins.
    ///
    /// Falls back to `index * default_height` while offsets for the index
    /// are not known yet.
    pub fn row_start(&self, cache: &HeightCache) -> f64 {
        cache
            .row_start(self.index)
            .unwrap_or(self.index as f64 * cache.default_height())
    }

    /// Resolve to the scroll offset that puts the row at its alignment.
    ///
    /// - `Top`: row start
    /// - `Center`: row start minus half the viewport
    /// - `Bottom`: next row's start minus the viewport (row start if the
    ///   next offset is unknown)
    ///
    /// # Clamping Behavior
    /// The result is clamped to `[0, max(0, total_height - viewport_height)]`,
    /// the range the host can actually scroll to.
    pub fn resolve(&self, cache: &HeightCache, viewport_height: f64) -> f64 {
        let start = self.row_start(cache);
        let raw = match self.alignment {
            Alignment::Top => start,
            Alignment::Center => start - viewport_height / 2.0,
            Alignment::Bottom => cache
                .offset(self.index)
                .map(|next_start| next_start - viewport_height)
                .unwrap_or(start),
        };
        let max_offset = (cache.total_height() - viewport_height).max(0.0);
        raw.clamp(0.0, max_offset)
    }
}

/// Whether moving from `current` to `target` is worth a scroll command.
pub fn needs_scroll(current: f64, target: f64) -> bool {
    (current - target).abs() > MIN_SCROLL_DELTA
}
