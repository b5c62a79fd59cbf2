//! Countdown supervisor - runs the state machine against the clock
//!
//! All mutation happens under one session lock. Every countdown loop and every
//! pending auto-reset owns a cancellation token; user operations cancel it while
//! holding the lock, and the task re-checks it after taking the lock, so a
//! superseded task never publishes or notifies again.

use std::sync::Arc;

use resttimer_core::TimerStateMachine;
use resttimer_core::models::{AlertKind, RestDuration, TimerState};
use tokio::sync::{Mutex, broadcast, watch};
use tokio::time::{self, Duration, Instant};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use super::events::{TimerEvent, TimerEventType};
use super::notifier::{self, Notifier, SilentNotifier};

/// Cadence of the countdown
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// How long `Finished` stays on screen before returning to `Ready`
pub const FINISH_DELAY: Duration = Duration::from_millis(500);

/// What the supervisor itself is doing, independent of the timer state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisorPhase {
    Idle,
    Running,
    Finishing,
}

enum Activity {
    Idle,
    Running(CancellationToken),
    Finishing(CancellationToken),
}

struct Session {
    machine: TimerStateMachine,
    activity: Activity,
    run_id: Option<String>,
}

impl Session {
    /// Cancel the loop or pending auto-reset, returning the run it belonged to
    fn stop_activity(&mut self) -> Option<String> {
        match std::mem::replace(&mut self.activity, Activity::Idle) {
            Activity::Running(token) | Activity::Finishing(token) => {
                token.cancel();
                tracing::debug!("Cancelled countdown activity {:?}", self.run_id);
            }
            Activity::Idle => {}
        }
        self.run_id.take()
    }

    fn phase(&self) -> SupervisorPhase {
        match self.activity {
            Activity::Idle => SupervisorPhase::Idle,
            Activity::Running(_) => SupervisorPhase::Running,
            Activity::Finishing(_) => SupervisorPhase::Finishing,
        }
    }
}

struct Shared {
    session: Mutex<Session>,
    state_tx: watch::Sender<TimerState>,
    event_tx: broadcast::Sender<TimerEvent>,
    notifier: Arc<dyn Notifier>,
    shutdown: CancellationToken,
}

impl Shared {
    fn publish(&self, event_type: TimerEventType, state: TimerState, run_id: Option<String>) {
        self.publish_event(TimerEvent::new(event_type, state, run_id));
    }

    fn publish_event(&self, event: TimerEvent) {
        self.state_tx.send_replace(event.state);
        let _ = self.event_tx.send(event);
    }

    fn alert(&self, kind: AlertKind, state: TimerState, run_id: &str) {
        let _ = self
            .event_tx
            .send(TimerEvent::alert(state, Some(run_id.to_string()), kind));
        notifier::dispatch(self.notifier.as_ref(), kind);
    }
}

/// Live countdown around a single [`TimerStateMachine`].
///
/// Publishes every transition on a watch channel (current state) and a
/// broadcast channel ([`TimerEvent`]s), and forwards threshold crossings to the
/// injected [`Notifier`]. Dropping the supervisor stops all of its tasks.
pub struct CountdownSupervisor {
    shared: Arc<Shared>,
}

impl CountdownSupervisor {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        let machine = TimerStateMachine::new();
        let (state_tx, _) = watch::channel(machine.state());
        let (event_tx, _) = broadcast::channel(1000);

        Self {
            shared: Arc::new(Shared {
                session: Mutex::new(Session {
                    machine,
                    activity: Activity::Idle,
                    run_id: None,
                }),
                state_tx,
                event_tx,
                notifier,
                shutdown: CancellationToken::new(),
            }),
        }
    }

    /// Subscribe to timer events
    pub fn subscribe(&self) -> broadcast::Receiver<TimerEvent> {
        self.shared.event_tx.subscribe()
    }

    /// Watch the current state
    pub fn watch(&self) -> watch::Receiver<TimerState> {
        self.shared.state_tx.subscribe()
    }

    pub fn state(&self) -> TimerState {
        *self.shared.state_tx.borrow()
    }

    pub fn remaining_seconds(&self) -> u32 {
        match self.state() {
            TimerState::CountingDown { remaining } => remaining,
            _ => 0,
        }
    }

    pub async fn selected_duration(&self) -> Option<RestDuration> {
        self.shared.session.lock().await.machine.selected_duration()
    }

    pub async fn phase(&self) -> SupervisorPhase {
        self.shared.session.lock().await.phase()
    }

    /// Choose a rest duration.
    ///
    /// Rejected while a countdown is running. A pending auto-reset is dropped,
    /// since the new selection supersedes it.
    pub async fn select_duration(&self, duration: RestDuration) -> bool {
        let mut session = self.shared.session.lock().await;
        if session.phase() == SupervisorPhase::Running {
            tracing::debug!("Ignoring duration selection while counting down");
            return false;
        }

        session.stop_activity();
        session.machine.select_duration(duration);
        tracing::debug!("Selected duration {}", duration);

        self.shared.publish(
            TimerEventType::DurationSelected { duration },
            session.machine.state(),
            None,
        );
        true
    }

    /// Start counting down from `Ready`. Returns false from any other state.
    pub async fn start_countdown(&self) -> bool {
        let mut session = self.shared.session.lock().await;
        let previous = session.machine.state();
        if !session.machine.start_countdown() {
            tracing::debug!("Cannot start countdown from {}", previous.as_str());
            return false;
        }

        session.stop_activity();

        let token = self.shared.shutdown.child_token();
        let run_id = Uuid::new_v4().to_string();
        let remaining_seconds = session.machine.remaining_seconds();
        session.activity = Activity::Running(token.clone());
        session.run_id = Some(run_id.clone());

        tracing::info!("Countdown {} started: {}s", run_id, remaining_seconds);
        self.shared.publish(
            TimerEventType::Started { remaining_seconds },
            session.machine.state(),
            Some(run_id.clone()),
        );

        let first_tick = Instant::now() + TICK_INTERVAL;
        tokio::spawn(run_countdown(self.shared.clone(), token, run_id, first_tick));
        true
    }

    /// Stop any countdown and go back to `Ready` with the same duration.
    pub async fn reset_to_ready(&self) {
        let mut session = self.shared.session.lock().await;
        let run_id = session.stop_activity();
        session.machine.reset_to_ready();

        tracing::debug!("Reset to {}", session.machine.state().as_str());
        self.shared
            .publish(TimerEventType::Reset, session.machine.state(), run_id);
    }

    /// Stop any countdown and return to `Idle`, keeping the last duration.
    pub async fn cancel(&self) {
        let mut session = self.shared.session.lock().await;
        let run_id = session.stop_activity();
        session.machine.cancel();

        tracing::debug!("Cancelled timer");
        self.shared
            .publish(TimerEventType::Cancelled, session.machine.state(), run_id);
    }
}

impl Default for CountdownSupervisor {
    fn default() -> Self {
        Self::new(Arc::new(SilentNotifier))
    }
}

impl Drop for CountdownSupervisor {
    fn drop(&mut self) {
        self.shared.shutdown.cancel();
    }
}

async fn run_countdown(
    shared: Arc<Shared>,
    token: CancellationToken,
    run_id: String,
    first_tick: Instant,
) {
    let mut ticker = time::interval_at(first_tick, TICK_INTERVAL);

    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => {
                tracing::debug!("Countdown {} stopped", run_id);
                return;
            }
            _ = ticker.tick() => {}
        }

        let mut session = shared.session.lock().await;
        if token.is_cancelled() || !session.machine.state().is_counting_down() {
            return;
        }

        let result = session.machine.tick();
        shared.publish_event(TimerEvent::tick(
            result.state,
            Some(run_id.clone()),
            session.machine.remaining_seconds(),
        ));

        for kind in result.alerts() {
            shared.alert(kind, result.state, &run_id);
        }

        if result.should_finish {
            finish(&shared, &mut session, token, run_id);
            return;
        }
    }
}

fn finish(shared: &Arc<Shared>, session: &mut Session, token: CancellationToken, run_id: String) {
    session.machine.finish();
    session.activity = Activity::Finishing(token.clone());

    tracing::info!("Countdown {} finished", run_id);
    shared.publish(
        TimerEventType::Finished,
        session.machine.state(),
        Some(run_id.clone()),
    );

    tokio::spawn(auto_reset(shared.clone(), token, run_id));
}

async fn auto_reset(shared: Arc<Shared>, token: CancellationToken, run_id: String) {
    tokio::select! {
        biased;
        _ = token.cancelled() => return,
        _ = time::sleep(FINISH_DELAY) => {}
    }

    let mut session = shared.session.lock().await;
    if token.is_cancelled() || !session.machine.state().is_finished() {
        return;
    }

    session.machine.auto_reset_to_ready();
    session.activity = Activity::Idle;
    session.run_id = None;

    tracing::debug!("Countdown {} auto-reset to ready", run_id);
    shared.publish(
        TimerEventType::AutoReset,
        session.machine.state(),
        Some(run_id),
    );
}
