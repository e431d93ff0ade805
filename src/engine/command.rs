//! Engine boundary: commands out, events in.

use crate::model::{MeasureError, ViewportError};
use crate::view_state::scroll::NavigationId;
use crate::view_state::viewport::ViewportMetrics;
use std::time::Duration;

/// Work the host must carry out on the engine's behalf.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Read the rendered height of row `index`; answer with [`Event::RowMeasured`].
    MeasureRow { index: usize, generation: u64 },
    /// Read the container's scroll offset and height; answer with
    /// [`Event::ViewportMeasured`].
    MeasureViewport { container_id: String },
    /// Move the container's scroll position. Fire-and-forget.
    SetScrollPosition { container_id: String, offset: f64 },
    /// Deliver [`Event::TimerFired`] with `timer` once `delay` has elapsed.
    Schedule { delay: Duration, timer: Timer },
}

/// Something that happened in the host.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// The container scrolled, by the user or as the result of a
    /// [`Command::SetScrollPosition`].
    Scrolled { scroll_top: f64 },
    ViewportMeasured(Result<ViewportMetrics, ViewportError>),
    RowMeasured {
        index: usize,
        generation: u64,
        result: Result<f64, MeasureError>,
    },
    TimerFired(Timer),
}

/// Fire-once timers.
///
/// Each carries the value it was scheduled for. When it fires and that value
/// no longer matches live state, the timer does nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Timer {
    /// Look the searched identifier up again.
    SearchRetry { navigation: NavigationId },
    /// Check whether an in-progress navigation has reached its target.
    ConvergenceCheck { navigation: NavigationId },
    /// Re-enter the state machine after a scroll command, even if the
    /// scroll position never changed.
    ScrollSafety { navigation: NavigationId },
    /// Manual scrolling has stopped if the offset is still `scroll_top`.
    ScrollSettled { scroll_top: f64 },
}
