//! Timer events

use chrono::{DateTime, Utc};
use resttimer_core::models::{AlertKind, RestDuration, TimerState};
use serde::{Deserialize, Serialize};

/// Event emitted by the countdown supervisor
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimerEvent {
    pub event_type: TimerEventType,
    /// State after the transition that produced this event
    pub state: TimerState,
    /// Identifies the countdown run, absent outside of one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_id: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Types of timer events
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TimerEventType {
    /// Duration chosen on the selection screen
    DurationSelected { duration: RestDuration },
    /// Countdown started
    Started { remaining_seconds: u32 },
    /// One second elapsed
    Tick { remaining_seconds: u32 },
    /// Threshold crossed, forwarded to the notifier
    Alert { kind: AlertKind },
    /// Countdown reached zero
    Finished,
    /// Returned to ready after the finish delay
    AutoReset,
    /// User reset back to ready
    Reset,
    /// User cancelled back to selection
    Cancelled,
}

impl TimerEvent {
    /// Create a new timer event
    pub fn new(event_type: TimerEventType, state: TimerState, run_id: Option<String>) -> Self {
        Self {
            event_type,
            state,
            run_id,
            timestamp: Utc::now(),
        }
    }

    /// Create a tick event
    pub fn tick(state: TimerState, run_id: Option<String>, remaining_seconds: u32) -> Self {
        Self::new(TimerEventType::Tick { remaining_seconds }, state, run_id)
    }

    /// Create an alert event
    pub fn alert(state: TimerState, run_id: Option<String>, kind: AlertKind) -> Self {
        Self::new(TimerEventType::Alert { kind }, state, run_id)
    }
}
