//! Rest Timer
//!
//! Interactive countdown between sets: pick a duration, start, get alerted at
//! 10s, 5s and zero, then land back on ready for the next set.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use resttimer_cli::commands::{self, Command, CommandError, CommandOutcome};
use resttimer_cli::display;
use resttimer_cli::timer::{
    CompositeNotifier, CountdownSupervisor, Notifier, SilentNotifier, SupervisorPhase, TimerEvent,
};
use resttimer_core::models::{AlertConfig, Config, RestDuration};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "resttimer")]
#[command(about = "Rest timer - countdown between sets", long_about = None)]
struct Args {
    /// Preselect a rest duration (30, 60, 90 or 120 seconds)
    #[arg(short, long)]
    duration: Option<RestDuration>,

    /// Start counting down immediately
    #[arg(short, long, requires = "duration")]
    start: bool,

    /// Don't ring the terminal bell on alerts
    #[arg(long)]
    no_bell: bool,

    /// Show desktop notifications on alerts
    #[arg(long)]
    desktop: bool,

    /// Print events as JSON lines (implies --no-bell)
    #[arg(long)]
    json: bool,

    /// Log level
    #[arg(short, long, default_value = "warn")]
    log_level: String,
}

impl Args {
    fn to_config(&self) -> Config {
        Config {
            default_duration: self.duration,
            alerts: AlertConfig {
                terminal_bell: !self.no_bell && !self.json,
                desktop: self.desktop,
            },
            log_level: self.log_level.clone(),
        }
    }
}

fn setup_logging(level: &str) {
    // Logs go to stderr; stdout carries the timer display.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn build_notifier(alerts: &AlertConfig) -> Arc<dyn Notifier> {
    if alerts.any_enabled() {
        Arc::new(CompositeNotifier::from_config(alerts))
    } else {
        Arc::new(SilentNotifier)
    }
}

fn print_event(event: &TimerEvent, json: bool) -> Result<()> {
    println!("{}", display::render_event(event, json)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = args.to_config();
    config.validate()?;

    setup_logging(&config.log_level);
    tracing::info!("Rest timer starting");

    let supervisor = CountdownSupervisor::new(build_notifier(&config.alerts));
    let mut events = supervisor.subscribe();

    if !args.json {
        println!("{}", display::describe_state(&supervisor.state()));
    }

    if let Some(duration) = config.default_duration {
        supervisor.select_duration(duration).await;
        if args.start {
            supervisor.start_countdown().await;
        }
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            line = commands::next_input_line(&mut lines), if stdin_open => {
                let Some(line) = line else {
                    // Piped input ran out; let a running countdown play out.
                    stdin_open = false;
                    if supervisor.phase().await == SupervisorPhase::Idle {
                        break;
                    }
                    continue;
                };

                match line.parse::<Command>() {
                    Ok(command) => match commands::run_command(&supervisor, command).await {
                        CommandOutcome::Quit => break,
                        CommandOutcome::Continue(Some(message)) => println!("{}", message),
                        CommandOutcome::Continue(None) => {}
                    },
                    Err(CommandError::Empty) => {}
                    Err(e) => eprintln!("{}", e),
                }
            }
            event = events.recv() => {
                match event {
                    Ok(event) => print_event(&event, args.json)?,
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!("Display fell behind, skipped {} events", skipped);
                    }
                    Err(RecvError::Closed) => break,
                }

                if !stdin_open && supervisor.phase().await == SupervisorPhase::Idle {
                    break;
                }
            }
            _ = &mut shutdown => {
                tracing::info!("Interrupted");
                break;
            }
        }
    }

    supervisor.cancel().await;
    tracing::info!("Rest timer exiting");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_output_silences_bell() {
        let args = Args::parse_from(["resttimer", "--json", "--desktop"]);
        let config = args.to_config();

        assert!(!config.alerts.terminal_bell);
        assert!(config.alerts.desktop);
    }

    #[test]
    fn test_bell_on_by_default() {
        let args = Args::parse_from(["resttimer", "-d", "60", "-s"]);
        let config = args.to_config();

        assert!(config.alerts.terminal_bell);
        assert_eq!(config.default_duration, Some(RestDuration::Sixty));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_start_requires_duration() {
        assert!(Args::try_parse_from(["resttimer", "--start"]).is_err());
    }
}
