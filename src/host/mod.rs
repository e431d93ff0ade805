//! Host side of the engine boundary.
//!
//! A host carries out the engine's [`Command`]s and feeds results back as
//! events. [`dispatch`] routes commands to the [`Host`] capabilities so host
//! implementations never match on commands themselves.

pub mod sim;

pub use sim::{random_heights, SimError, SimStats, SimulatedHost};

use crate::engine::{Command, Timer};
use std::time::Duration;

/// Capabilities the engine needs from its environment.
///
/// Every method is fire-and-forget: results come back later as events.
pub trait Host {
    /// Read row `index`'s on-screen height, answering `Event::RowMeasured`.
    fn measure_row(&mut self, index: usize, generation: u64);

    /// Read scroll offset and height of the container.
    fn measure_viewport(&mut self, container_id: &str);

    /// Move the container's scroll position. Errors are ignored.
    fn set_scroll_position(&mut self, container_id: &str, offset: f64);

    /// Fire `timer` once after `delay`.
    fn schedule(&mut self, delay: Duration, timer: Timer);
}

/// Carries out `commands` in order on `host`.
pub fn dispatch<H: Host + ?Sized>(commands: impl IntoIterator<Item = Command>, host: &mut H) {
    for command in commands {
        match command {
            Command::MeasureRow { index, generation } => host.measure_row(index, generation),
            Command::MeasureViewport { container_id } => host.measure_viewport(&container_id),
            Command::SetScrollPosition {
                container_id,
                offset,
            } => host.set_scroll_position(&container_id, offset),
            Command::Schedule { delay, timer } => host.schedule(delay, timer),
        }
    }
}
