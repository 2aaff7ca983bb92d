/// Transition sequencer: the one-shot, timed hand-off after the win.
///
/// ```text
///   Idle ──exit reached──▶ Won ──D1──▶ ShowingMessage ──D2──▶ NavigatingAway
///          (lock nav, fog on)     (ThankYou! overlay)      (navigate_to(Home))
/// ```
///
/// States only move forward. Won is entered at most once per mount, no
/// matter how often the position-changed notification repeats while the
/// player stands on the exit. Both deferred steps are scheduled in the
/// sequencer's `TimerSet` when Won is entered; `teardown` revokes them.

use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::domain::maze::Maze;
use crate::domain::nav::NavigationController;
use super::route::{Route, Router};
use super::timer::TimerSet;

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub enum TransitionState {
    Idle,
    Won,
    ShowingMessage,
    NavigatingAway,
}

impl TransitionState {
    pub fn fog_visible(self) -> bool {
        self >= TransitionState::Won
    }

    pub fn message_visible(self) -> bool {
        self >= TransitionState::ShowingMessage
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Step {
    ShowMessage,
    NavigateAway,
}

#[derive(Debug)]
pub struct TransitionSequencer {
    state: TransitionState,
    timers: TimerSet<Step>,
    /// D1: Won → ShowingMessage.
    message_delay: Duration,
    /// D2: ShowingMessage → NavigatingAway.
    navigate_delay: Duration,
    torn_down: bool,
}

impl TransitionSequencer {
    pub fn new(message_delay: Duration, navigate_delay: Duration) -> Self {
        TransitionSequencer {
            state: TransitionState::Idle,
            timers: TimerSet::new(),
            message_delay,
            navigate_delay,
            torn_down: false,
        }
    }

    pub fn state(&self) -> TransitionState {
        self.state
    }

    #[cfg(test)]
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Position-changed notification from the navigation controller.
    /// Returns `Some(Won)` the one time the win is detected.
    pub fn on_position_changed(
        &mut self,
        nav: &mut NavigationController,
        maze: &Maze,
        now: Instant,
    ) -> Option<TransitionState> {
        if self.torn_down || self.state != TransitionState::Idle || !nav.at_exit(maze) {
            return None;
        }

        nav.lock();
        self.state = TransitionState::Won;
        self.timers.schedule(now, self.message_delay, Step::ShowMessage);
        self.timers.schedule(now, self.message_delay + self.navigate_delay, Step::NavigateAway);
        info!(exit = %maze.exit(), "maze solved; fog rolling in");
        Some(TransitionState::Won)
    }

    /// Fire due steps in order. Returns every state entered.
    pub fn poll<R: Router + ?Sized>(&mut self, now: Instant, router: &mut R) -> Vec<TransitionState> {
        if self.torn_down {
            return vec![];
        }

        let mut entered = Vec::new();
        for step in self.timers.take_due(now) {
            let next = match step {
                Step::ShowMessage => TransitionState::ShowingMessage,
                Step::NavigateAway => TransitionState::NavigatingAway,
            };
            if next <= self.state {
                continue;
            }
            self.state = next;
            info!(state = ?next, "transition");
            entered.push(next);

            if next == TransitionState::NavigatingAway {
                router.navigate_to(Route::Home);
            }
        }
        entered
    }

    /// Cancel all pending steps. Safe to call more than once.
    pub fn teardown(&mut self) -> usize {
        self.torn_down = true;
        let cancelled = self.timers.cancel_all();
        if cancelled > 0 {
            debug!(cancelled, state = ?self.state, "sequencer torn down with pending steps");
        }
        cancelled
    }
}
