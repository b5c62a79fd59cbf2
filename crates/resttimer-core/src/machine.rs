//! Pure rest timer state machine
//!
//! Owns the current [`TimerState`] plus the duration that was last selected.
//! `CountingDown` and `Finished` cannot carry the duration themselves, so it is
//! kept in a separate field and read back by `reset_to_ready` and `cancel`.
//! Nothing here sleeps, spawns or notifies; see the supervisor for that.

use crate::models::{RestDuration, TickResult, TimerState};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TimerStateMachine {
    state: TimerState,
    stored_duration: Option<RestDuration>,
}

impl TimerStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an arbitrary state with no stored duration
    pub fn with_state(state: TimerState) -> Self {
        Self {
            state,
            stored_duration: None,
        }
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    /// Seconds left on the countdown, 0 in any other state
    pub fn remaining_seconds(&self) -> u32 {
        match self.state {
            TimerState::CountingDown { remaining } => remaining,
            _ => 0,
        }
    }

    pub fn selected_duration(&self) -> Option<RestDuration> {
        match self.state {
            TimerState::Idle { last_duration } => last_duration,
            TimerState::Ready { duration } => Some(duration),
            TimerState::CountingDown { .. } | TimerState::Finished => self.stored_duration,
        }
    }

    /// Valid from any state; overwrites any previous selection.
    pub fn select_duration(&mut self, duration: RestDuration) {
        self.state = TimerState::Ready { duration };
        self.stored_duration = Some(duration);
    }

    /// Returns false and leaves the state alone unless currently `Ready`.
    pub fn start_countdown(&mut self) -> bool {
        let TimerState::Ready { duration } = self.state else {
            return false;
        };

        self.stored_duration = Some(duration);
        self.state = TimerState::CountingDown {
            remaining: duration.seconds(),
        };
        true
    }

    /// Advance the countdown by one second.
    ///
    /// Reaching zero leaves the machine in `CountingDown { remaining: 0 }` with
    /// `should_finish` set; the caller commits the transition with
    /// [`finish`](Self::finish).
    pub fn tick(&mut self) -> TickResult {
        let remaining = match self.state {
            TimerState::CountingDown { remaining } if remaining > 0 => remaining,
            _ => return TickResult::noop(self.state),
        };

        let next = remaining - 1;
        self.state = TimerState::CountingDown { remaining: next };

        TickResult::after_decrement(self.state, next)
    }

    pub fn finish(&mut self) {
        self.state = TimerState::Finished;
    }

    /// Back to `Ready` with the stored duration, or `Idle` if there is none.
    pub fn reset_to_ready(&mut self) {
        self.state = match self.stored_duration {
            Some(duration) => TimerState::Ready { duration },
            None => TimerState::Idle {
                last_duration: None,
            },
        };
    }

    /// Post-finish reset; same transition as a user reset.
    pub fn auto_reset_to_ready(&mut self) {
        self.reset_to_ready();
    }

    pub fn cancel(&mut self) {
        self.state = TimerState::Idle {
            last_duration: self.stored_duration,
        };
    }
}
