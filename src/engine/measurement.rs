//! Measurement driver: keeps visible rows measured and gates visibility.

use super::{Command, ListEngine};
use crate::model::{MeasureError, ViewportError};
use crate::view_state::scroll::ScrollState;
use crate::view_state::viewport::ViewportMetrics;
use crate::view_state::visible_range::VisibleRange;

impl ListEngine {
    /// Recomputes the visible range and requests every unmeasured row in it
    /// that has no request in flight yet.
    pub(super) fn refresh(&mut self, out: &mut Vec<Command>) {
        let buffer = self.buffer.compute(&self.state, &self.viewport);
        let range = VisibleRange::compute(
            self.heights.offsets(),
            self.heights.len(),
            &self.viewport,
            buffer,
        );
        if range != self.range {
            tracing::trace!(start = range.start, end = range.end, buffer, "visible range");
            self.range = range;
        }

        for index in self.heights.unmeasured_in(self.range.indices()) {
            if self.pending.insert(index) {
                out.push(Command::MeasureRow {
                    index,
                    generation: self.generation,
                });
            }
        }

        self.update_visibility();
    }

    /// Reveals the list once it is safe to show.
    ///
    /// While a navigation is in flight the unmeasured-row rule is not applied:
    /// finishing or abandoning the navigation reveals the list instead.
    fn update_visibility(&mut self) {
        if self.revealed {
            return;
        }
        let reveal = self.settings.show_while_measuring()
            || self.state.is_manual()
            || (!self.state.is_navigating()
                && self.heights.unmeasured_in(self.range.indices()).len() <= 1);
        if reveal {
            self.reveal();
        }
    }

    pub(super) fn on_viewport_measured(
        &mut self,
        result: Result<ViewportMetrics, ViewportError>,
        out: &mut Vec<Command>,
    ) {
        let metrics = match result {
            Ok(metrics) => metrics,
            Err(err) => {
                tracing::debug!(error = %err, "viewport read failed");
                return;
            }
        };
        if self.viewport.apply_read(metrics) {
            tracing::trace!(
                scroll_top = metrics.scroll_top,
                height = metrics.height,
                "viewport updated"
            );
        }
        self.refresh(out);
        self.re_aim(out);
    }

    pub(super) fn on_row_measured(
        &mut self,
        index: usize,
        generation: u64,
        result: Result<f64, MeasureError>,
        out: &mut Vec<Command>,
    ) {
        if generation != self.generation {
            tracing::trace!(index, generation, "stale row measurement ignored");
            return;
        }
        self.pending.remove(&index);

        let height = match result {
            Ok(height) => height,
            Err(err) => {
                tracing::trace!(error = %err, "row measurement failed");
                if matches!(self.state, ScrollState::InProgress(_)) {
                    self.nudge(out);
                }
                return;
            }
        };

        if self.heights.set_measured(index, height) {
            tracing::trace!(index, height, "row measured");
        }
        let settled = self.pending.is_empty();
        self.refresh(out);

        if let ScrollState::InProgress(nav) = &self.state {
            if nav.target.index == index {
                self.aim(false, out);
            } else if settled {
                self.re_aim(out);
            }
        }
    }
}
