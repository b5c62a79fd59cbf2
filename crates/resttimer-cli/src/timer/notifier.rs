//! Alert notifiers
//!
//! The supervisor hands every threshold crossing to a [`Notifier`]. Notifiers
//! are fire-and-forget: failures are reported back only so they can be logged.

use std::io::Write;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use resttimer_core::models::{AlertConfig, AlertKind};

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Desktop notification failed: {0}")]
    Desktop(String),

    #[error("Notifier unavailable: {0}")]
    Unavailable(String),
}

pub type Result<T> = std::result::Result<T, NotifyError>;

/// Delivers a perceptible cue to the user
pub trait Notifier: Send + Sync {
    /// Ten seconds left
    fn warn(&self) -> Result<()>;

    /// Five seconds left
    fn urgent(&self) -> Result<()>;

    /// Countdown done
    fn complete(&self) -> Result<()>;

    fn notify(&self, kind: AlertKind) -> Result<()> {
        match kind {
            AlertKind::Warning => self.warn(),
            AlertKind::Urgent => self.urgent(),
            AlertKind::Completion => self.complete(),
        }
    }
}

/// Call the notifier, swallowing errors and panics so the countdown keeps going.
pub(crate) fn dispatch(notifier: &dyn Notifier, kind: AlertKind) {
    match panic::catch_unwind(AssertUnwindSafe(|| notifier.notify(kind))) {
        Ok(Ok(())) => tracing::debug!("Delivered {} alert", kind.as_str()),
        Ok(Err(e)) => tracing::warn!("Failed to deliver {} alert: {}", kind.as_str(), e),
        Err(_) => tracing::warn!("Notifier panicked while delivering {} alert", kind.as_str()),
    }
}

/// Rings the terminal bell: once, twice, three times as the cues escalate.
///
/// Bells go to stderr so stdout stays machine-readable.
pub struct TerminalBell;

impl TerminalBell {
    fn ring(&self, times: usize) -> Result<()> {
        ring_into(&mut std::io::stderr().lock(), times)
    }
}

fn ring_into(out: &mut impl Write, times: usize) -> Result<()> {
    out.write_all("\x07".repeat(times).as_bytes())?;
    out.flush()?;
    Ok(())
}

impl Notifier for TerminalBell {
    fn warn(&self) -> Result<()> {
        self.ring(1)
    }

    fn urgent(&self) -> Result<()> {
        self.ring(2)
    }

    fn complete(&self) -> Result<()> {
        self.ring(3)
    }
}

/// OS desktop notifications.
///
/// `show` blocks on the notification daemon; wrap in [`BackgroundNotifier`]
/// when calling from the countdown.
pub struct DesktopNotifier;

impl DesktopNotifier {
    fn show(&self, title: &str, body: &str, critical: bool) -> Result<()> {
        let mut notification = notify_rust::Notification::new();
        notification
            .summary(title)
            .body(body)
            .icon("alarm-clock")
            .timeout(notify_rust::Timeout::Milliseconds(5000));

        if critical {
            mark_critical(&mut notification);
        }

        notification
            .show()
            .map_err(|e| NotifyError::Desktop(e.to_string()))?;
        Ok(())
    }
}

#[cfg(all(unix, not(target_os = "macos")))]
fn mark_critical(notification: &mut notify_rust::Notification) {
    notification.urgency(notify_rust::Urgency::Critical);
}

#[cfg(not(all(unix, not(target_os = "macos"))))]
fn mark_critical(_notification: &mut notify_rust::Notification) {}

impl Notifier for DesktopNotifier {
    fn warn(&self) -> Result<()> {
        self.show("10 seconds left", "Get ready for your next set", false)
    }

    fn urgent(&self) -> Result<()> {
        self.show("5 seconds left", "Almost time", false)
    }

    fn complete(&self) -> Result<()> {
        self.show("Rest over", "Time for your next set!", true)
    }
}

/// Runs a blocking notifier on tokio's blocking pool.
///
/// Calls return as soon as the work is queued; failures are logged from the
/// worker. Outside a runtime the inner notifier is called inline.
pub struct BackgroundNotifier<N> {
    inner: Arc<N>,
}

impl<N: Notifier + 'static> BackgroundNotifier<N> {
    pub fn new(inner: N) -> Self {
        Self {
            inner: Arc::new(inner),
        }
    }

    fn detach(&self, kind: AlertKind) -> Result<()> {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            return self.inner.notify(kind);
        };

        let inner = self.inner.clone();
        handle.spawn_blocking(move || dispatch(inner.as_ref(), kind));
        Ok(())
    }
}

impl<N: Notifier + 'static> Notifier for BackgroundNotifier<N> {
    fn warn(&self) -> Result<()> {
        self.detach(AlertKind::Warning)
    }

    fn urgent(&self) -> Result<()> {
        self.detach(AlertKind::Urgent)
    }

    fn complete(&self) -> Result<()> {
        self.detach(AlertKind::Completion)
    }
}

/// Does nothing; used when every alert channel is switched off
pub struct SilentNotifier;

impl Notifier for SilentNotifier {
    fn warn(&self) -> Result<()> {
        Ok(())
    }

    fn urgent(&self) -> Result<()> {
        Ok(())
    }

    fn complete(&self) -> Result<()> {
        Ok(())
    }
}

/// Fans each alert out to several notifiers.
///
/// Every notifier is tried even if an earlier one fails; the first error is
/// returned.
pub struct CompositeNotifier {
    notifiers: Vec<Box<dyn Notifier>>,
}

impl CompositeNotifier {
    pub fn new(notifiers: Vec<Box<dyn Notifier>>) -> Self {
        Self { notifiers }
    }

    /// Build the notifier set enabled in the alert config
    pub fn from_config(config: &AlertConfig) -> Self {
        let mut notifiers: Vec<Box<dyn Notifier>> = Vec::new();
        if config.terminal_bell {
            notifiers.push(Box::new(TerminalBell));
        }
        if config.desktop {
            notifiers.push(Box::new(BackgroundNotifier::new(DesktopNotifier)));
        }
        Self::new(notifiers)
    }

    pub fn len(&self) -> usize {
        self.notifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notifiers.is_empty()
    }

    fn fan_out(&self, kind: AlertKind) -> Result<()> {
        let mut first_error = None;
        for notifier in &self.notifiers {
            if let Err(e) = notifier.notify(kind) {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

impl Notifier for CompositeNotifier {
    fn warn(&self) -> Result<()> {
        self.fan_out(AlertKind::Warning)
    }

    fn urgent(&self) -> Result<()> {
        self.fan_out(AlertKind::Urgent)
    }

    fn complete(&self) -> Result<()> {
        self.fan_out(AlertKind::Completion)
    }
}
