pub mod config;
pub mod duration;
pub mod timer;

pub use config::{AlertConfig, Config};
pub use duration::RestDuration;
pub use timer::{AlertKind, AlertLevel, TickResult, TimerState};
