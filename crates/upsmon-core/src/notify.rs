use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;

use crate::classify::Severity;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("failed to spawn notifier: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("notifier exited with status {0}")]
    Failed(std::process::ExitStatus),
}

/// OS-level user-notification sink.
#[async_trait]
pub trait Notifier: Send {
    async fn notify(
        &mut self,
        title: &str,
        body: &str,
        urgency: Severity,
    ) -> Result<(), NotifyError>;
}

/// Desktop notifications via `notify-send`.
pub struct NotifySendNotifier;

#[async_trait]
impl Notifier for NotifySendNotifier {
    async fn notify(
        &mut self,
        title: &str,
        body: &str,
        urgency: Severity,
    ) -> Result<(), NotifyError> {
        let status = Command::new("notify-send")
            .arg(format!("--urgency={}", urgency.as_str()))
            .arg(title)
            .arg(body)
            .status()
            .await?;

        if !status.success() {
            return Err(NotifyError::Failed(status));
        }
        Ok(())
    }
}
