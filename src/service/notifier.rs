use crate::error::LedgerError;
use std::future::Future;
use tokio::process::Command;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub message: String,
}

/// The OS notification facility. Delivery is fire-and-forget: callers log
/// a failure and move on, they never retry.
pub trait Notifier: Send + Sync {
    fn notify(
        &self,
        notification: &Notification,
    ) -> impl Future<Output = Result<(), LedgerError>> + Send;
}

/// Writes the notification to the log only.
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    async fn notify(&self, notification: &Notification) -> Result<(), LedgerError> {
        info!(title = %notification.title, "{}", notification.message);
        Ok(())
    }
}

/// Runs an external program (e.g. `notify-send`) with the title and
/// message as its two arguments. A non-zero exit is a delivery failure.
#[derive(Debug, Clone)]
pub struct CommandNotifier {
    program: String,
}

impl CommandNotifier {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Notifier for CommandNotifier {
    async fn notify(&self, notification: &Notification) -> Result<(), LedgerError> {
        let status = Command::new(&self.program)
            .arg(&notification.title)
            .arg(&notification.message)
            .status()
            .await
            .map_err(|e| LedgerError::Notification(format!("{}: {}", self.program, e)))?;
        if !status.success() {
            return Err(LedgerError::Notification(format!(
                "{} exited with {}",
                self.program, status
            )));
        }
        debug!(program = %self.program, "notification delivered");
        Ok(())
    }
}

/// Notifier chosen from configuration at startup.
#[derive(Debug, Clone)]
pub enum SystemNotifier {
    Log(LogNotifier),
    Command(CommandNotifier),
}

impl SystemNotifier {
    pub fn from_command(program: Option<&str>) -> Self {
        match program.map(str::trim).filter(|p| !p.is_empty()) {
            Some(p) => SystemNotifier::Command(CommandNotifier::new(p)),
            None => SystemNotifier::Log(LogNotifier),
        }
    }
}

impl Notifier for SystemNotifier {
    async fn notify(&self, notification: &Notification) -> Result<(), LedgerError> {
        match self {
            SystemNotifier::Log(n) => n.notify(notification).await,
            SystemNotifier::Command(n) => n.notify(notification).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_command_falls_back_to_log() {
        assert!(matches!(
            SystemNotifier::from_command(None),
            SystemNotifier::Log(_)
        ));
        assert!(matches!(
            SystemNotifier::from_command(Some("  ")),
            SystemNotifier::Log(_)
        ));
        assert!(matches!(
            SystemNotifier::from_command(Some("notify-send")),
            SystemNotifier::Command(_)
        ));
    }

    #[tokio::test]
    async fn missing_program_is_a_delivery_failure() {
        let notifier = CommandNotifier::new("family-ledger-no-such-notifier");
        let res = notifier
            .notify(&Notification {
                title: "t".to_string(),
                message: "m".to_string(),
            })
            .await;
        assert!(matches!(res, Err(LedgerError::Notification(_))));
    }
}
