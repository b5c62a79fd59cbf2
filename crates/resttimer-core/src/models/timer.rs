use serde::{Deserialize, Serialize};

use super::RestDuration;

/// Remaining seconds at which the warning cue fires
pub const WARNING_THRESHOLD: u32 = 10;

/// Remaining seconds at which the urgent cue fires
pub const URGENT_THRESHOLD: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum TimerState {
    /// Nothing selected yet, or cancelled. Keeps the last duration around.
    Idle { last_duration: Option<RestDuration> },
    Ready { duration: RestDuration },
    CountingDown { remaining: u32 },
    /// Transient; the supervisor moves on to `Ready` shortly after.
    Finished,
}

impl TimerState {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerState::Idle { .. } => "Idle",
            TimerState::Ready { .. } => "Ready",
            TimerState::CountingDown { .. } => "Counting down",
            TimerState::Finished => "Finished",
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, TimerState::Idle { .. })
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, TimerState::Ready { .. })
    }

    pub fn is_counting_down(&self) -> bool {
        matches!(self, TimerState::CountingDown { .. })
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, TimerState::Finished)
    }
}

impl Default for TimerState {
    fn default() -> Self {
        TimerState::Idle {
            last_duration: None,
        }
    }
}

/// Alert cue to hand to a notifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    Warning,
    Urgent,
    Completion,
}

impl AlertKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertKind::Warning => "warning",
            AlertKind::Urgent => "urgent",
            AlertKind::Completion => "completion",
        }
    }
}

/// Visual tone for a countdown, escalating as the end approaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertLevel {
    Calm,
    Warning,
    Urgent,
}

impl AlertLevel {
    pub fn for_remaining(remaining: u32) -> Self {
        if remaining <= URGENT_THRESHOLD {
            AlertLevel::Urgent
        } else if remaining <= WARNING_THRESHOLD {
            AlertLevel::Warning
        } else {
            AlertLevel::Calm
        }
    }
}

/// Outcome of a single countdown step.
///
/// Flags describe the remaining value *after* the decrement and are mutually
/// exclusive. `should_finish` tells the caller to commit `finish()`; the tick
/// itself never moves the state to `Finished`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickResult {
    pub state: TimerState,
    pub warning: bool,
    pub urgent: bool,
    pub completion: bool,
    pub should_finish: bool,
}

impl TickResult {
    pub fn noop(state: TimerState) -> Self {
        Self {
            state,
            warning: false,
            urgent: false,
            completion: false,
            should_finish: false,
        }
    }

    pub(crate) fn after_decrement(state: TimerState, remaining: u32) -> Self {
        Self {
            state,
            warning: remaining == WARNING_THRESHOLD,
            urgent: remaining == URGENT_THRESHOLD,
            completion: remaining == 0,
            should_finish: remaining == 0,
        }
    }

    pub fn is_noop(&self) -> bool {
        !(self.warning || self.urgent || self.completion || self.should_finish)
    }

    /// Fired alerts in dispatch order: warning, urgent, completion
    pub fn alerts(&self) -> impl Iterator<Item = AlertKind> {
        [
            (self.warning, AlertKind::Warning),
            (self.urgent, AlertKind::Urgent),
            (self.completion, AlertKind::Completion),
        ]
        .into_iter()
        .filter_map(|(fired, kind)| fired.then_some(kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state_is_empty_idle() {
        assert_eq!(
            TimerState::default(),
            TimerState::Idle {
                last_duration: None
            }
        );
        assert!(TimerState::default().is_idle());
    }

    #[test]
    fn test_state_strings() {
        assert_eq!(TimerState::Finished.as_str(), "Finished");
        assert_eq!(
            TimerState::CountingDown { remaining: 3 }.as_str(),
            "Counting down"
        );
        assert!(TimerState::CountingDown { remaining: 0 }.is_counting_down());
        assert!(TimerState::Ready {
            duration: RestDuration::Sixty
        }
        .is_ready());
    }

    #[test]
    fn test_state_serialization() {
        let state = TimerState::Ready {
            duration: RestDuration::Ninety,
        };
        let json = serde_json::to_value(state).unwrap();
        assert_eq!(json["state"], "ready");
        assert_eq!(json["duration"], 90);

        let idle: TimerState =
            serde_json::from_str(r#"{"state":"idle","last_duration":null}"#).unwrap();
        assert_eq!(idle, TimerState::default());
    }

    #[test]
    fn test_alert_level_boundaries() {
        assert_eq!(AlertLevel::for_remaining(120), AlertLevel::Calm);
        assert_eq!(AlertLevel::for_remaining(11), AlertLevel::Calm);
        assert_eq!(AlertLevel::for_remaining(10), AlertLevel::Warning);
        assert_eq!(AlertLevel::for_remaining(6), AlertLevel::Warning);
        assert_eq!(AlertLevel::for_remaining(5), AlertLevel::Urgent);
        assert_eq!(AlertLevel::for_remaining(0), AlertLevel::Urgent);
    }

    #[test]
    fn test_alerts_order() {
        let result = TickResult {
            state: TimerState::Finished,
            warning: true,
            urgent: true,
            completion: true,
            should_finish: true,
        };
        let alerts: Vec<_> = result.alerts().collect();
        assert_eq!(
            alerts,
            vec![AlertKind::Warning, AlertKind::Urgent, AlertKind::Completion]
        );
    }

    #[test]
    fn test_noop_result() {
        let result = TickResult::noop(TimerState::Finished);
        assert!(result.is_noop());
        assert_eq!(result.alerts().count(), 0);
        assert_eq!(result.state, TimerState::Finished);
    }
}
