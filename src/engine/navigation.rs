//! Scroll-to-item state machine.
//!
//! A request whose identifier is known goes straight to `InProgress`.
//! Otherwise it waits in `SearchingForItem`, retrying on a timer. While in
//! progress the engine re-aims whenever measurements move the target row,
//! and a periodic convergence check decides between success, another
//! attempt, or giving up. Every failure path ends in `NoScroll` with the
//! list revealed.

use super::{Command, ListEngine, Timer};
use crate::model::ItemId;
use crate::view_state::scroll::{
    needs_scroll, Navigation, NavigationId, ScrollState, ScrollTarget,
};
use crate::view_state::types::Alignment;

/// Multiple of the tolerance beyond which a missed target earns a retry.
const RETRY_DISTANCE_FACTOR: f64 = 1.5;

enum Verdict {
    Converged,
    Confirming,
    Retry,
    GiveUp,
}

impl ListEngine {
    /// Scrolls until the row for `item_id` sits at `alignment`.
    ///
    /// Ignored while another navigation is outstanding. If the identifier is
    /// not in the list yet, the lookup is retried a bounded number of times.
    pub fn scroll_to_item(
        &mut self,
        item_id: impl Into<ItemId>,
        alignment: Alignment,
    ) -> Vec<Command> {
        let item_id = item_id.into();
        let mut out = Vec::new();
        if self.state.is_navigating() {
            tracing::debug!(item = %item_id, "navigation already in flight, request ignored");
            return out;
        }

        self.last_navigation = self.last_navigation.next();
        let navigation = self.last_navigation;
        match self.index_of(&item_id) {
            Some(index) => self.start_navigation(navigation, item_id, index, alignment, &mut out),
            None => {
                tracing::debug!(item = %item_id, "target not in list yet, searching");
                self.state = ScrollState::SearchingForItem {
                    id: navigation,
                    item_id,
                    alignment,
                    attempts: 0,
                };
                out.push(Command::Schedule {
                    delay: self.settings.timings().search_retry,
                    timer: Timer::SearchRetry { navigation },
                });
            }
        }
        out
    }

    fn index_of(&self, item_id: &ItemId) -> Option<usize> {
        self.ids.iter().position(|id| id == item_id)
    }

    fn start_navigation(
        &mut self,
        navigation: NavigationId,
        item_id: ItemId,
        index: usize,
        alignment: Alignment,
        out: &mut Vec<Command>,
    ) {
        let target = ScrollTarget::new(index, alignment);
        let mut nav = Navigation::new(navigation, item_id, target);
        nav.target_offset = target.row_start(&self.heights);
        tracing::debug!(
            index,
            ?alignment,
            target_offset = nav.target_offset,
            "navigation started"
        );
        self.state = ScrollState::InProgress(nav);
        self.seek_target(index, out);
    }

    /// Aims at a measured target, or asks for the target row's height first.
    fn seek_target(&mut self, index: usize, out: &mut Vec<Command>) {
        if self.heights.get(index).is_measured() {
            self.aim(false, out);
        } else if self.pending.insert(index) {
            out.push(Command::MeasureRow {
                index,
                generation: self.generation,
            });
        }
    }

    /// Scrolls toward the target's current best-known position.
    ///
    /// Skips the scroll command when the container is already there or the
    /// same position is still on its way, unless `force` is set. A safety
    /// timer follows so the state machine is re-entered even if nothing moves.
    pub(super) fn aim(&mut self, force: bool, out: &mut Vec<Command>) {
        let scroll_top = self.viewport.scroll_top();
        let viewport_height = self.viewport.height();
        let ScrollState::InProgress(nav) = &mut self.state else {
            return;
        };
        nav.target_offset = nav.target.row_start(&self.heights);
        let position = nav.target.resolve(&self.heights, viewport_height);

        if needs_scroll(scroll_top, position) {
            let in_flight = nav.awaiting_echo
                && nav
                    .aimed_position
                    .is_some_and(|aimed| !needs_scroll(aimed, position));
            if in_flight && !force {
                return;
            }
            tracing::trace!(position, attempts = nav.attempts, "scroll issued");
            nav.aimed_position = Some(position);
            nav.awaiting_echo = true;
            out.push(Command::SetScrollPosition {
                container_id: self.settings.container_id().to_string(),
                offset: position,
            });
        }
        out.push(Command::Schedule {
            delay: self.settings.timings().scroll_safety,
            timer: Timer::ScrollSafety { navigation: nav.id },
        });
    }

    /// Re-aims if measurements moved the target row by more than the tolerance.
    pub(super) fn re_aim(&mut self, out: &mut Vec<Command>) {
        let tolerance = self.settings.navigation().tolerance;
        let ScrollState::InProgress(nav) = &self.state else {
            return;
        };
        let start = nav.target.row_start(&self.heights);
        if (start - nav.target_offset).abs() > tolerance {
            tracing::debug!(from = nav.target_offset, to = start, "target moved, re-aiming");
            self.aim(false, out);
        }
    }

    /// Best-effort move toward the estimated target after a row could not be read.
    pub(super) fn nudge(&mut self, out: &mut Vec<Command>) {
        tracing::trace!("row not found during navigation, nudging toward target");
        self.aim(false, out);
    }

    /// Follows the navigation target by identifier into a new item set.
    ///
    /// Requests issued for the previous item set are void, so an in-progress
    /// navigation is always re-entered: it aims again or re-requests its row.
    pub(super) fn after_reconcile(&mut self, out: &mut Vec<Command>) {
        let (navigation, item_id, alignment, searching) = match &self.state {
            ScrollState::SearchingForItem {
                id,
                item_id,
                alignment,
                ..
            } => (*id, item_id.clone(), *alignment, true),
            ScrollState::InProgress(nav) => {
                (nav.id, nav.item_id.clone(), nav.target.alignment, false)
            }
            ScrollState::NoScroll | ScrollState::ManualScroll => return,
        };

        match self.index_of(&item_id) {
            Some(index) if searching => {
                self.start_navigation(navigation, item_id, index, alignment, out);
            }
            Some(index) => {
                if let ScrollState::InProgress(nav) = &mut self.state {
                    nav.target.index = index;
                }
                self.seek_target(index, out);
            }
            None if searching => {}
            None => {
                tracing::warn!(item = %item_id, "navigation target removed, giving up");
                self.finish_navigation();
            }
        }
    }

    pub(super) fn on_scrolled(&mut self, scroll_top: f64, out: &mut Vec<Command>) {
        self.viewport.apply_scroll(scroll_top);

        if let ScrollState::InProgress(nav) = &mut self.state {
            if nav.is_echo(scroll_top) {
                nav.awaiting_echo = false;
                tracing::trace!(scroll_top, "programmatic scroll landed");
                self.refresh(out);
                self.schedule_convergence_check(out);
                return;
            }
        }

        if self.state.is_navigating() {
            tracing::debug!(state = ?self.state, "navigation cancelled by manual scroll");
        }
        self.state = ScrollState::ManualScroll;
        self.refresh(out);
        out.push(Command::Schedule {
            delay: self.settings.timings().scroll_settle,
            timer: Timer::ScrollSettled {
                scroll_top: self.viewport.scroll_top(),
            },
        });
    }

    pub(super) fn on_scroll_settled(&mut self, scroll_top: f64) {
        if self.state.is_manual() && self.viewport.scroll_top() == scroll_top {
            tracing::trace!(scroll_top, "manual scroll settled");
            self.state = ScrollState::NoScroll;
        }
    }

    pub(super) fn on_search_retry(&mut self, navigation: NavigationId, out: &mut Vec<Command>) {
        if self.state.is_manual() {
            self.reveal();
            return;
        }
        let max_attempts = self.settings.navigation().max_search_attempts;
        let ScrollState::SearchingForItem {
            id,
            item_id,
            alignment,
            attempts,
        } = &mut self.state
        else {
            return;
        };
        if *id != navigation {
            return;
        }
        *attempts += 1;
        let (attempts, alignment, item_id) = (*attempts, *alignment, item_id.clone());

        if let Some(index) = self.index_of(&item_id) {
            self.start_navigation(navigation, item_id, index, alignment, out);
        } else if attempts >= max_attempts {
            tracing::warn!(item = %item_id, attempts, "navigation target never appeared, giving up");
            self.finish_navigation();
        } else {
            out.push(Command::Schedule {
                delay: self.settings.timings().search_retry,
                timer: Timer::SearchRetry { navigation },
            });
        }
    }

    pub(super) fn on_scroll_safety(&mut self, navigation: NavigationId, out: &mut Vec<Command>) {
        if self.state.is_manual() {
            self.reveal();
            return;
        }
        if self.state.navigation_id() != Some(navigation)
            || !matches!(self.state, ScrollState::InProgress(_))
        {
            return;
        }
        out.push(self.measure_viewport());
        self.schedule_convergence_check(out);
    }

    fn schedule_convergence_check(&mut self, out: &mut Vec<Command>) {
        let ScrollState::InProgress(nav) = &self.state else {
            return;
        };
        if self.check_scheduled == Some(nav.id) {
            return;
        }
        self.check_scheduled = Some(nav.id);
        out.push(Command::Schedule {
            delay: self.settings.timings().convergence_check,
            timer: Timer::ConvergenceCheck { navigation: nav.id },
        });
    }

    pub(super) fn on_convergence_check(
        &mut self,
        navigation: NavigationId,
        out: &mut Vec<Command>,
    ) {
        if self.check_scheduled == Some(navigation) {
            self.check_scheduled = None;
        }
        if self.state.is_manual() {
            self.reveal();
            return;
        }

        let tuning = *self.settings.navigation();
        let top = self.viewport.scroll_top();
        let bottom = self.viewport.bottom();
        let viewport_height = self.viewport.height();
        let ScrollState::InProgress(nav) = &mut self.state else {
            return;
        };
        if nav.id != navigation {
            return;
        }

        let start = nav.target.row_start(&self.heights);
        let distance = (top - nav.target.resolve(&self.heights, viewport_height)).abs();
        let visible = start >= top && start <= bottom;
        let close = distance <= tuning.tolerance;

        let verdict = if visible || close {
            if nav.stable_count >= tuning.required_confirmations {
                Verdict::Converged
            } else {
                nav.stable_count += 1;
                Verdict::Confirming
            }
        } else if distance > tuning.tolerance * RETRY_DISTANCE_FACTOR
            && nav.attempts < tuning.max_scroll_attempts
        {
            nav.attempts += 1;
            nav.stable_count = 0;
            Verdict::Retry
        } else {
            Verdict::GiveUp
        };

        match verdict {
            Verdict::Converged => {
                tracing::debug!(scroll_top = top, "navigation converged");
                self.finish_navigation();
            }
            Verdict::Confirming => self.schedule_convergence_check(out),
            Verdict::Retry => {
                tracing::debug!(distance, "target missed, retrying scroll");
                self.aim(true, out);
            }
            Verdict::GiveUp => {
                tracing::warn!(distance, scroll_top = top, "navigation did not converge, giving up");
                self.finish_navigation();
            }
        }
    }

    fn finish_navigation(&mut self) {
        self.state = ScrollState::NoScroll;
        self.check_scheduled = None;
        self.reveal();
    }
}
