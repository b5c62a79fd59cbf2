//! Rest timer runtime
//!
//! Countdown supervision, notifiers and the interactive host pieces, exposed
//! as a library for testing.

pub mod commands;
pub mod display;
pub mod timer;

pub use commands::{Command, CommandError, CommandOutcome};
pub use timer::{CountdownSupervisor, Notifier, SupervisorPhase, TimerEvent, TimerEventType};
