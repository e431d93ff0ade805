//! List virtualization engine.
//!
//! [`ListEngine`] owns every piece of mutable state: row heights, the
//! viewport, the scroll state machine and the visibility latch. It performs
//! no I/O. Each request or [`Event`] returns the [`Command`]s the host must
//! carry out, and the host reports results back as further events. All
//! transitions happen synchronously inside one call.
//!
//! ```
//! use vlist::config::Settings;
//! use vlist::engine::{Command, ListEngine};
//! use vlist::model::ItemId;
//!
//! let mut engine = ListEngine::new(Settings::default());
//! let ids: Vec<ItemId> = (0..1000).map(|i| ItemId::new(format!("row-{i}"))).collect();
//! let commands = engine.set_items(ids);
//!
//! assert!(matches!(commands[0], Command::MeasureViewport { .. }));
//! assert_eq!(engine.visible_range().indices(), 0..25);
//! ```

pub mod command;
mod measurement;
mod navigation;
pub mod render;

pub use command::{Command, Event, Timer};
pub use render::{RenderedList, RenderedRow, RowKey};

use crate::config::Settings;
use crate::model::ItemId;
use crate::view_state::buffer::BufferPolicy;
use crate::view_state::height_cache::HeightCache;
use crate::view_state::reconcile::{reconcile, Remeasure};
use crate::view_state::scroll::{NavigationId, ScrollState};
use crate::view_state::viewport::Viewport;
use crate::view_state::visible_range::VisibleRange;
use serde::Serialize;
use std::collections::HashSet;

/// Virtualization engine for one list container.
#[derive(Debug, Clone)]
pub struct ListEngine {
    settings: Settings,
    ids: Vec<ItemId>,
    heights: HeightCache,
    viewport: Viewport,
    buffer: BufferPolicy,
    range: VisibleRange,
    state: ScrollState,
    /// One-way latch, reset by item-set reconciliation.
    revealed: bool,
    /// Bumped on every reconciliation; tags row measurement requests.
    generation: u64,
    /// Rows with a measurement request in flight for this generation.
    pending: HashSet<usize>,
    last_navigation: NavigationId,
    /// Navigation that owns the single outstanding convergence check.
    check_scheduled: Option<NavigationId>,
}

/// Serializable summary of engine state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngineSnapshot {
    pub item_count: usize,
    pub measured_rows: usize,
    pub total_height: f64,
    pub range: VisibleRange,
    pub buffer: usize,
    pub viewport: Viewport,
    pub state: ScrollState,
    pub revealed: bool,
    pub generation: u64,
}

impl ListEngine {
    /// Creates an engine with no items.
    pub fn new(settings: Settings) -> Self {
        let heights = HeightCache::new(settings.default_item_height());
        let viewport = Viewport::estimated(settings.initial_viewport_height());
        let buffer = BufferPolicy::new(settings.buffer(), settings.dynamic_buffer());
        Self {
            settings,
            ids: Vec::new(),
            heights,
            viewport,
            buffer,
            range: VisibleRange::default(),
            state: ScrollState::NoScroll,
            revealed: false,
            generation: 0,
            pending: HashSet::new(),
            last_navigation: NavigationId::default(),
            check_scheduled: None,
        }
    }

    /// Commands to issue once the container is mounted.
    pub fn start(&mut self) -> Vec<Command> {
        let mut out = vec![self.measure_viewport()];
        self.refresh(&mut out);
        out
    }

    /// Replaces the items, reusing heights of identifiers that persisted.
    pub fn set_items(&mut self, ids: Vec<ItemId>) -> Vec<Command> {
        self.replace_items(ids, Remeasure::Nothing)
    }

    /// Replaces the items and measures every row again.
    ///
    /// Reused rows keep their height value until remeasured, so nothing
    /// jumps in the meantime.
    pub fn set_items_and_remeasure_all(&mut self, ids: Vec<ItemId>) -> Vec<Command> {
        self.replace_items(ids, Remeasure::All)
    }

    /// Replaces the items and measures the rows in `remeasure` again.
    pub fn set_items_and_remeasure(
        &mut self,
        ids: Vec<ItemId>,
        remeasure: impl IntoIterator<Item = ItemId>,
    ) -> Vec<Command> {
        self.replace_items(ids, Remeasure::Only(remeasure.into_iter().collect()))
    }

    fn replace_items(&mut self, ids: Vec<ItemId>, remeasure: Remeasure) -> Vec<Command> {
        self.heights = reconcile(&self.ids, &self.heights, &ids, &remeasure);
        self.ids = ids;
        self.generation += 1;
        self.pending.clear();
        self.revealed = false;
        tracing::debug!(
            items = self.ids.len(),
            generation = self.generation,
            total_height = self.heights.total_height(),
            "items reconciled"
        );

        let mut out = vec![self.measure_viewport()];
        self.refresh(&mut out);
        self.after_reconcile(&mut out);
        out
    }

    /// Feeds one host event into the engine.
    pub fn handle(&mut self, event: Event) -> Vec<Command> {
        let mut out = Vec::new();
        match event {
            Event::Scrolled { scroll_top } => self.on_scrolled(scroll_top, &mut out),
            Event::ViewportMeasured(result) => self.on_viewport_measured(result, &mut out),
            Event::RowMeasured {
                index,
                generation,
                result,
            } => self.on_row_measured(index, generation, result, &mut out),
            Event::TimerFired(timer) => self.on_timer(timer, &mut out),
        }
        out
    }

    fn on_timer(&mut self, timer: Timer, out: &mut Vec<Command>) {
        match timer {
            Timer::SearchRetry { navigation } => self.on_search_retry(navigation, out),
            Timer::ConvergenceCheck { navigation } => self.on_convergence_check(navigation, out),
            Timer::ScrollSafety { navigation } => self.on_scroll_safety(navigation, out),
            Timer::ScrollSettled { scroll_top } => self.on_scroll_settled(scroll_top),
        }
    }

    fn measure_viewport(&self) -> Command {
        Command::MeasureViewport {
            container_id: self.settings.container_id().to_string(),
        }
    }

    fn reveal(&mut self) {
        if !self.revealed {
            tracing::debug!(state = ?self.state, "list revealed");
            self.revealed = true;
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn items(&self) -> &[ItemId] {
        &self.ids
    }

    pub fn heights(&self) -> &HeightCache {
        &self.heights
    }

    /// Scrollable content height.
    pub fn total_height(&self) -> f64 {
        self.heights.total_height()
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Rows currently rendered, buffer included.
    pub fn visible_range(&self) -> VisibleRange {
        self.range
    }

    pub fn scroll_state(&self) -> &ScrollState {
        &self.state
    }

    /// Whether the list may be shown to the user.
    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    /// Generation that current measurement requests are tagged with.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Summary of the current state.
    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            item_count: self.ids.len(),
            measured_rows: self.heights.heights().iter().filter(|h| h.is_measured()).count(),
            total_height: self.heights.total_height(),
            range: self.range,
            buffer: self.buffer.current(),
            viewport: self.viewport,
            state: self.state.clone(),
            revealed: self.revealed,
            generation: self.generation,
        }
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
