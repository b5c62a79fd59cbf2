use std::sync::{Arc, Mutex};

use anyhow::Result;
use resttimer_cli::commands::{run_command, Command, CommandOutcome};
use resttimer_cli::timer::notifier;
use resttimer_cli::{CountdownSupervisor, Notifier, TimerEventType};
use resttimer_core::models::{AlertKind, RestDuration, TimerState};
use tokio::time::{sleep, Duration};

#[derive(Clone, Default)]
struct Haptics {
    played: Arc<Mutex<Vec<AlertKind>>>,
}

impl Haptics {
    fn play(&self, kind: AlertKind) -> notifier::Result<()> {
        self.played.lock().unwrap().push(kind);
        Ok(())
    }
}

impl Notifier for Haptics {
    fn warn(&self) -> notifier::Result<()> {
        self.play(AlertKind::Warning)
    }

    fn urgent(&self) -> notifier::Result<()> {
        self.play(AlertKind::Urgent)
    }

    fn complete(&self) -> notifier::Result<()> {
        self.play(AlertKind::Completion)
    }
}

async fn command(supervisor: &CountdownSupervisor, input: &str) -> Result<CommandOutcome> {
    let command: Command = input.parse()?;
    Ok(run_command(supervisor, command).await)
}

#[tokio::test(start_paused = true)]
async fn test_two_sets_back_to_back() -> Result<()> {
    let haptics = Haptics::default();
    let supervisor = CountdownSupervisor::new(Arc::new(haptics.clone()));
    let mut state_rx = supervisor.watch();

    command(&supervisor, "30").await?;
    command(&supervisor, "start").await?;
    sleep(Duration::from_millis(30_600)).await;

    assert_eq!(
        *state_rx.borrow_and_update(),
        TimerState::Ready {
            duration: RestDuration::Thirty
        }
    );

    // Second set reuses the stored duration straight from ready.
    command(&supervisor, "s").await?;
    assert_eq!(supervisor.remaining_seconds(), 30);
    sleep(Duration::from_millis(30_600)).await;

    assert_eq!(
        haptics.played.lock().unwrap().clone(),
        vec![
            AlertKind::Warning,
            AlertKind::Urgent,
            AlertKind::Completion,
            AlertKind::Warning,
            AlertKind::Urgent,
            AlertKind::Completion,
        ]
    );
    assert_eq!(
        supervisor.state(),
        TimerState::Ready {
            duration: RestDuration::Thirty
        }
    );

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_every_preset_runs_to_completion() -> Result<()> {
    for duration in RestDuration::ALL {
        let supervisor = CountdownSupervisor::default();
        let mut rx = supervisor.subscribe();

        supervisor.select_duration(duration).await;
        assert!(supervisor.start_countdown().await);
        assert_eq!(
            supervisor.state(),
            TimerState::CountingDown {
                remaining: duration.seconds()
            }
        );

        sleep(Duration::from_secs(u64::from(duration.seconds())) + Duration::from_millis(600))
            .await;
        assert_eq!(supervisor.state(), TimerState::Ready { duration });

        let mut finished = 0;
        while let Ok(event) = rx.try_recv() {
            if event.event_type == TimerEventType::Finished {
                finished += 1;
            }
        }
        assert_eq!(finished, 1);
    }

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_events_serialize_for_json_output() -> Result<()> {
    let supervisor = CountdownSupervisor::default();
    let mut rx = supervisor.subscribe();

    supervisor.select_duration(RestDuration::Sixty).await;
    supervisor.start_countdown().await;
    sleep(Duration::from_millis(1500)).await;
    supervisor.cancel().await;

    let mut lines = Vec::new();
    while let Ok(event) = rx.try_recv() {
        lines.push(serde_json::to_value(&event)?);
    }

    let types: Vec<_> = lines
        .iter()
        .map(|line| line["event_type"]["type"].as_str().unwrap_or_default().to_string())
        .collect();
    assert_eq!(types, vec!["duration_selected", "started", "tick", "cancelled"]);
    assert_eq!(lines[2]["event_type"]["remaining_seconds"], 59);
    assert_eq!(lines[3]["state"]["last_duration"], 60);

    Ok(())
}
