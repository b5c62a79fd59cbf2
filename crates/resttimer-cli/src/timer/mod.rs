pub mod events;
pub mod notifier;
pub mod supervisor;


pub use events::{TimerEvent, TimerEventType};
pub use notifier::{
    BackgroundNotifier, CompositeNotifier, DesktopNotifier, Notifier, NotifyError, SilentNotifier,
    TerminalBell,
};
pub use supervisor::{CountdownSupervisor, SupervisorPhase, FINISH_DELAY, TICK_INTERVAL};
