//! Plain-text rendering of timer state and events

use resttimer_core::models::{AlertKind, AlertLevel, RestDuration, TimerState};

use crate::timer::{TimerEvent, TimerEventType};

pub const HELP: &str = "\
Commands:
  30 | 60 | 90 | 120   select a rest duration
  s, start            start the countdown
  r, reset            stop and go back to ready (same duration)
  c, cancel           stop and go back to duration selection
  state               show the current state
  h, help             show this help
  q, quit             exit";

/// Format seconds as m:ss
pub fn format_clock(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

fn level_marker(level: AlertLevel) -> &'static str {
    match level {
        AlertLevel::Calm => "",
        AlertLevel::Warning => " !",
        AlertLevel::Urgent => " !!",
    }
}

fn duration_choices() -> String {
    RestDuration::ALL
        .iter()
        .map(|d| d.display_text())
        .collect::<Vec<_>>()
        .join("  ")
}

pub fn describe_state(state: &TimerState) -> String {
    match state {
        TimerState::Idle {
            last_duration: None,
        } => format!("Select rest: {}", duration_choices()),
        TimerState::Idle {
            last_duration: Some(last),
        } => format!("Select rest: {} (last: {})", duration_choices(), last),
        TimerState::Ready { duration } => {
            format!("Ready: {} rest. Type 's' to start", duration)
        }
        TimerState::CountingDown { remaining } => format!(
            "{}{}",
            format_clock(*remaining),
            level_marker(AlertLevel::for_remaining(*remaining))
        ),
        TimerState::Finished => "Rest over!".to_string(),
    }
}

fn describe_alert(kind: AlertKind) -> &'static str {
    match kind {
        AlertKind::Warning => "10 seconds left",
        AlertKind::Urgent => "5 seconds left",
        AlertKind::Completion => "Time's up",
    }
}

/// One display line per event
pub fn describe_event(event: &TimerEvent) -> String {
    match &event.event_type {
        TimerEventType::Alert { kind } => format!(">> {}", describe_alert(*kind)),
        TimerEventType::Started { .. } => format!(
            "Started. {} (type 'r' to reset)",
            describe_state(&event.state)
        ),
        TimerEventType::Tick { .. }
        | TimerEventType::DurationSelected { .. }
        | TimerEventType::Finished
        | TimerEventType::AutoReset
        | TimerEventType::Reset
        | TimerEventType::Cancelled => describe_state(&event.state),
    }
}

/// Render an event as one stdout line, JSON or human readable
pub fn render_event(event: &TimerEvent, json: bool) -> serde_json::Result<String> {
    if json {
        serde_json::to_string(event)
    } else {
        Ok(describe_event(event))
    }
}
