//! Interactive commands typed on stdin

use std::io;
use std::str::FromStr;

use resttimer_core::models::RestDuration;
use tokio::io::{AsyncBufRead, Lines};

use crate::display;
use crate::timer::CountdownSupervisor;

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("Empty command")]
    Empty,

    #[error("Unknown command '{0}' (type 'help' for a list)")]
    Unknown(String),

    #[error(transparent)]
    Duration(#[from] resttimer_core::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Select(RestDuration),
    Start,
    Reset,
    Cancel,
    State,
    Help,
    Quit,
}

/// What the input loop should do after a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    Continue(Option<String>),
    Quit,
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim().to_lowercase();
        match input.as_str() {
            "" => Err(CommandError::Empty),
            "s" | "start" | "go" => Ok(Command::Start),
            "r" | "reset" => Ok(Command::Reset),
            "c" | "cancel" | "back" => Ok(Command::Cancel),
            "state" | "status" => Ok(Command::State),
            "h" | "help" | "?" => Ok(Command::Help),
            "q" | "quit" | "exit" => Ok(Command::Quit),
            other if other.starts_with(|c: char| c.is_ascii_digit()) => {
                Ok(Command::Select(other.parse()?))
            }
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

/// Next line of input, skipping lines that are not valid UTF-8.
///
/// Returns `None` at end of input or on an unrecoverable read error.
pub async fn next_input_line<R>(lines: &mut Lines<R>) -> Option<String>
where
    R: AsyncBufRead + Unpin,
{
    loop {
        match lines.next_line().await {
            Ok(line) => return line,
            Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                tracing::warn!("Skipping unreadable input line: {}", e);
            }
            Err(e) => {
                tracing::warn!("Stopped reading input: {}", e);
                return None;
            }
        }
    }
}

/// Apply a command to the supervisor.
///
/// Rejected transitions come back as a short message instead of an error.
pub async fn run_command(supervisor: &CountdownSupervisor, command: Command) -> CommandOutcome {
    let message = match command {
        Command::Select(duration) => {
            if supervisor.select_duration(duration).await {
                None
            } else {
                Some("Countdown running; reset or cancel first".to_string())
            }
        }
        Command::Start => {
            if supervisor.start_countdown().await {
                None
            } else {
                Some("Select a duration before starting".to_string())
            }
        }
        Command::Reset => {
            supervisor.reset_to_ready().await;
            None
        }
        Command::Cancel => {
            supervisor.cancel().await;
            None
        }
        Command::State => Some(display::describe_state(&supervisor.state())),
        Command::Help => Some(display::HELP.to_string()),
        Command::Quit => return CommandOutcome::Quit,
    };

    CommandOutcome::Continue(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use resttimer_core::models::TimerState;
    use tokio::io::{AsyncBufReadExt, BufReader};

    #[test]
    fn test_parse_commands() {
        assert_eq!("s".parse::<Command>().unwrap(), Command::Start);
        assert_eq!(" Reset ".parse::<Command>().unwrap(), Command::Reset);
        assert_eq!("cancel".parse::<Command>().unwrap(), Command::Cancel);
        assert_eq!("?".parse::<Command>().unwrap(), Command::Help);
        assert_eq!("q".parse::<Command>().unwrap(), Command::Quit);
        assert_eq!(
            "90s".parse::<Command>().unwrap(),
            Command::Select(RestDuration::Ninety)
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!("".parse::<Command>(), Err(CommandError::Empty)));
        assert!(matches!(
            "jump".parse::<Command>(),
            Err(CommandError::Unknown(_))
        ));
        assert!(matches!(
            "45".parse::<Command>(),
            Err(CommandError::Duration(_))
        ));
    }

    #[tokio::test]
    async fn test_input_skips_invalid_utf8() {
        let input: &[u8] = b"\xff\xfe\n60\nstart\n";
        let mut lines = BufReader::new(input).lines();

        assert_eq!(next_input_line(&mut lines).await.as_deref(), Some("60"));
        assert_eq!(next_input_line(&mut lines).await.as_deref(), Some("start"));
        assert_eq!(next_input_line(&mut lines).await, None);
    }

    #[tokio::test]
    async fn test_run_command_flow() {
        let supervisor = CountdownSupervisor::default();

        let outcome = run_command(&supervisor, Command::Start).await;
        assert!(matches!(outcome, CommandOutcome::Continue(Some(_))));

        let outcome = run_command(&supervisor, Command::Select(RestDuration::Thirty)).await;
        assert_eq!(outcome, CommandOutcome::Continue(None));

        run_command(&supervisor, Command::Start).await;
        assert_eq!(supervisor.state(), TimerState::CountingDown { remaining: 30 });

        let outcome = run_command(&supervisor, Command::Select(RestDuration::Sixty)).await;
        assert!(matches!(outcome, CommandOutcome::Continue(Some(_))));

        run_command(&supervisor, Command::Cancel).await;
        assert_eq!(
            supervisor.state(),
            TimerState::Idle {
                last_duration: Some(RestDuration::Thirty)
            }
        );

        assert_eq!(
            run_command(&supervisor, Command::Quit).await,
            CommandOutcome::Quit
        );
    }
}
