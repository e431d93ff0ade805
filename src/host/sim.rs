//! Deterministic simulated host.
//!
//! [`SimulatedHost`] plays the part of a UI container: it knows every row's
//! true height, owns the real scroll position and runs a virtual clock.
//! Requests are answered after a fixed latency, in order. A row can only be
//! measured while the engine renders it, and the scroll position is clamped
//! to the content size the engine reports, the way a real scroll container
//! behaves.

use super::{dispatch, Host};
use crate::engine::{Command, Event, ListEngine, Timer};
use crate::model::{MeasureError, ViewportError};
use crate::view_state::viewport::ViewportMetrics;
use serde::Serialize;
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::ops::Range;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_LATENCY: Duration = Duration::from_millis(1);
const DEFAULT_STEP_BUDGET: usize = 100_000;

/// Errors from driving a simulation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SimError {
    /// The engine kept producing work past the step budget.
    #[error("simulation still busy after {steps} steps")]
    StepBudgetExhausted { steps: usize },
}

/// Counters of what the simulated host was asked to do.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SimStats {
    pub events: usize,
    pub row_measurements: usize,
    pub rows_not_found: usize,
    pub viewport_reads: usize,
    pub scroll_commands: usize,
    pub timers: usize,
}

#[derive(Debug, Clone)]
enum Delivery {
    MeasureRow { index: usize, generation: u64 },
    MeasureViewport { container_id: String },
    Scroll { offset: f64 },
    Timer(Timer),
}

#[derive(Debug, Clone)]
struct Scheduled {
    at: Duration,
    seq: u64,
    delivery: Delivery,
}

impl PartialEq for Scheduled {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Scheduled {}

impl PartialOrd for Scheduled {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Scheduled {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.at, self.seq).cmp(&(other.at, other.seq))
    }
}

/// Simulated scroll container with a virtual clock.
#[derive(Debug, Clone)]
pub struct SimulatedHost {
    container_id: String,
    heights: Vec<f64>,
    viewport_height: f64,
    scroll_top: f64,
    content_height: f64,
    mounted: Range<usize>,
    latency: Duration,
    step_budget: usize,
    now: Duration,
    seq: u64,
    queue: BinaryHeap<Reverse<Scheduled>>,
    stats: SimStats,
}

impl SimulatedHost {
    /// Container `container_id` whose rows have the given true heights.
    pub fn new(container_id: impl Into<String>, heights: Vec<f64>, viewport_height: f64) -> Self {
        Self {
            container_id: container_id.into(),
            heights,
            viewport_height: viewport_height.max(0.0),
            scroll_top: 0.0,
            content_height: 0.0,
            mounted: 0..0,
            latency: DEFAULT_LATENCY,
            step_budget: DEFAULT_STEP_BUDGET,
            now: Duration::ZERO,
            seq: 0,
            queue: BinaryHeap::new(),
            stats: SimStats::default(),
        }
    }

    /// Delay between a request and its answer.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Maximum deliveries processed by one run.
    pub fn with_step_budget(mut self, steps: usize) -> Self {
        self.step_budget = steps;
        self
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn scroll_top(&self) -> f64 {
        self.scroll_top
    }

    pub fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    pub fn stats(&self) -> SimStats {
        self.stats
    }

    /// True when nothing is queued.
    pub fn is_idle(&self) -> bool {
        self.queue.is_empty()
    }

    /// Replaces the true row heights, e.g. after the item set changed.
    pub fn set_heights(&mut self, heights: Vec<f64>) {
        self.heights = heights;
    }

    /// Queues a user scroll to `offset` at the current time.
    pub fn user_scroll(&mut self, offset: f64) {
        self.enqueue(Duration::ZERO, Delivery::Scroll { offset });
    }

    /// Carries out `commands`, then delivers events until nothing is queued.
    ///
    /// Returns the number of deliveries processed.
    pub fn run(&mut self, engine: &mut ListEngine, commands: Vec<Command>) -> Result<usize, SimError> {
        self.run_until(engine, commands, Duration::MAX)
    }

    /// Like [`run`](Self::run), but stops before the first delivery due
    /// after `deadline` and advances the clock to it.
    pub fn run_until(
        &mut self,
        engine: &mut ListEngine,
        commands: Vec<Command>,
        deadline: Duration,
    ) -> Result<usize, SimError> {
        self.apply(engine, commands);

        let mut steps = 0;
        while self
            .queue
            .peek()
            .is_some_and(|Reverse(next)| next.at <= deadline)
        {
            if steps >= self.step_budget {
                return Err(SimError::StepBudgetExhausted { steps });
            }
            let Some(Reverse(next)) = self.queue.pop() else {
                break;
            };
            steps += 1;
            self.now = self.now.max(next.at);

            if let Some(event) = self.deliver(next.delivery) {
                self.stats.events += 1;
                let commands = engine.handle(event);
                self.apply(engine, commands);
            }
        }

        if deadline != Duration::MAX {
            self.now = self.now.max(deadline);
        }
        tracing::trace!(steps, now_ms = self.now.as_millis() as u64, "simulation paused");
        Ok(steps)
    }

    fn apply(&mut self, engine: &ListEngine, commands: Vec<Command>) {
        self.mounted = engine.visible_range().indices();
        self.content_height = engine.total_height();
        dispatch(commands, self);
    }

    fn enqueue(&mut self, delay: Duration, delivery: Delivery) {
        self.seq += 1;
        self.queue.push(Reverse(Scheduled {
            at: self.now.saturating_add(delay),
            seq: self.seq,
            delivery,
        }));
    }

    fn deliver(&mut self, delivery: Delivery) -> Option<Event> {
        match delivery {
            Delivery::MeasureRow { index, generation } => {
                let result = self
                    .heights
                    .get(index)
                    .copied()
                    .filter(|_| self.mounted.contains(&index))
                    .ok_or(MeasureError::RowNotFound { index });
                if result.is_err() {
                    self.stats.rows_not_found += 1;
                }
                Some(Event::RowMeasured {
                    index,
                    generation,
                    result,
                })
            }
            Delivery::MeasureViewport { container_id } => {
                let result = if container_id == self.container_id {
                    Ok(ViewportMetrics {
                        scroll_top: self.scroll_top,
                        height: self.viewport_height,
                    })
                } else {
                    Err(ViewportError::ContainerNotFound { container_id })
                };
                Some(Event::ViewportMeasured(result))
            }
            Delivery::Scroll { offset } => self
                .move_to(offset)
                .map(|scroll_top| Event::Scrolled { scroll_top }),
            Delivery::Timer(timer) => Some(Event::TimerFired(timer)),
        }
    }

    /// Moves the scroll position, clamped to the content. `None` if it did not move.
    fn move_to(&mut self, offset: f64) -> Option<f64> {
        let max = (self.content_height - self.viewport_height).max(0.0);
        let clamped = offset.clamp(0.0, max);
        if (clamped - self.scroll_top).abs() < f64::EPSILON {
            return None;
        }
        self.scroll_top = clamped;
        Some(clamped)
    }
}

impl Host for SimulatedHost {
    fn measure_row(&mut self, index: usize, generation: u64) {
        self.stats.row_measurements += 1;
        self.enqueue(self.latency, Delivery::MeasureRow { index, generation });
    }

    fn measure_viewport(&mut self, container_id: &str) {
        self.stats.viewport_reads += 1;
        self.enqueue(
            self.latency,
            Delivery::MeasureViewport {
                container_id: container_id.to_string(),
            },
        );
    }

    fn set_scroll_position(&mut self, container_id: &str, offset: f64) {
        if container_id != self.container_id || !offset.is_finite() {
            return;
        }
        self.stats.scroll_commands += 1;
        self.enqueue(self.latency, Delivery::Scroll { offset });
    }

    fn schedule(&mut self, delay: Duration, timer: Timer) {
        self.stats.timers += 1;
        self.enqueue(delay, Delivery::Timer(timer));
    }
}

/// Deterministic pseudo-random row heights in `[min, max]`, rounded to whole units.
pub fn random_heights(count: usize, min: f64, max: f64, seed: u64) -> Vec<f64> {
    let (low, high) = if min <= max { (min, max) } else { (max, min) };
    let mut state = seed;
    (0..count)
        .map(|_| {
            state = state
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add(1_442_695_040_888_963_407);
            let unit = (state >> 11) as f64 / (1u64 << 53) as f64;
            (low + unit * (high - low)).round()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::model::ItemId;

    fn ids(count: usize) -> Vec<ItemId> {
        (0..count).map(|i| ItemId::new(format!("item-{i}"))).collect()
    }

    #[test]
    fn random_heights_are_deterministic_and_bounded() {
        let first = random_heights(200, 20.0, 60.0, 42);
        let second = random_heights(200, 20.0, 60.0, 42);

        assert_eq!(first, second);
        assert!(first.iter().all(|h| (20.0..=60.0).contains(h)));
        assert_ne!(first, random_heights(200, 20.0, 60.0, 43));
    }

    #[test]
    fn random_heights_accept_swapped_bounds() {
        let heights = random_heights(50, 60.0, 20.0, 1);
        assert!(heights.iter().all(|h| (20.0..=60.0).contains(h)));
    }

    #[test]
    fn initial_load_measures_visible_rows_and_goes_idle() {
        let mut engine = ListEngine::new(Settings::default());
        let mut host = SimulatedHost::new("virtual-list", vec![30.0; 100], 300.0);

        let commands = engine.set_items(ids(100));
        host.run(&mut engine, commands).expect("simulation should go idle");

        assert!(host.is_idle());
        assert!(engine.is_revealed());
        assert!(engine.viewport().is_measured());
        assert_eq!(engine.viewport().height(), 300.0);
        let range = engine.visible_range();
        assert!(range.indices().all(|i| engine.heights().get(i).is_measured()));
        assert_eq!(engine.heights().get(0).value, 30.0);
    }

    #[test]
    fn wrong_container_reports_not_found() {
        let mut engine = ListEngine::new(Settings::default());
        let mut host = SimulatedHost::new("other", vec![30.0; 10], 300.0);

        let commands = engine.set_items(ids(10));
        host.run(&mut engine, commands).expect("simulation should go idle");

        assert!(!engine.viewport().is_measured());
    }

    #[test]
    fn scroll_is_clamped_to_content() {
        let mut engine = ListEngine::new(Settings::default());
        let mut host = SimulatedHost::new("virtual-list", vec![26.0; 30], 500.0);
        let commands = engine.set_items(ids(30));
        host.run(&mut engine, commands).expect("idle");

        host.user_scroll(10_000.0);
        host.run(&mut engine, Vec::new()).expect("idle");

        assert_eq!(host.scroll_top(), 30.0 * 26.0 - 500.0);
        assert_eq!(engine.viewport().scroll_top(), host.scroll_top());
    }

    #[test]
    fn run_until_stops_at_deadline() {
        let mut engine = ListEngine::new(Settings::default());
        let mut host = SimulatedHost::new("virtual-list", vec![26.0; 100], 500.0);
        let commands = engine.set_items(ids(100));
        host.run(&mut engine, commands).expect("idle");

        host.user_scroll(400.0);
        host.run_until(&mut engine, Vec::new(), Duration::from_millis(50))
            .expect("within budget");

        assert!(engine.scroll_state().is_manual());
        assert!(!host.is_idle(), "settle timer still pending");
        assert_eq!(host.now(), Duration::from_millis(50));

        host.run(&mut engine, Vec::new()).expect("idle");
        assert!(engine.scroll_state().is_idle());
    }

    #[test]
    fn step_budget_bounds_a_run() {
        let mut engine = ListEngine::new(Settings::default());
        let mut host =
            SimulatedHost::new("virtual-list", vec![26.0; 100], 500.0).with_step_budget(3);

        let commands = engine.set_items(ids(100));
        let result = host.run(&mut engine, commands);

        assert_eq!(result, Err(SimError::StepBudgetExhausted { steps: 3 }));
    }
}
