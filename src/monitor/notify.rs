//! Band change notification via an external command

use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("failed to run {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{command} exited with status {}", .code.map(|c| c.to_string()).unwrap_or_else(|| "signal".into()))]
    Exited { command: String, code: Option<i32> },

    #[error("{command} timed out after {}s", .timeout.as_secs_f64())]
    Timeout { command: String, timeout: Duration },
}

#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    /// Announce that the radio is now on `band`.
    async fn notify(&self, band: &str) -> Result<(), NotifyError>;
}

/// Runs `<command> <band>`. Output goes straight to our stdout/stderr; only
/// the exit status is looked at.
pub struct CommandNotifier {
    command: String,
    timeout: Option<Duration>,
}

impl CommandNotifier {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    fn spawn_error(&self, source: std::io::Error) -> NotifyError {
        NotifyError::Spawn {
            command: self.command.clone(),
            source,
        }
    }
}

#[async_trait::async_trait]
impl Notifier for CommandNotifier {
    async fn notify(&self, band: &str) -> Result<(), NotifyError> {
        debug!("running {} {}", self.command, band);

        let mut child = Command::new(&self.command)
            .arg(band)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| self.spawn_error(e))?;

        let status = match self.timeout {
            None => child.wait().await.map_err(|e| self.spawn_error(e))?,
            Some(timeout) => match tokio::time::timeout(timeout, child.wait()).await {
                Ok(result) => result.map_err(|e| self.spawn_error(e))?,
                Err(_) => {
                    let _ = child.kill().await;
                    return Err(NotifyError::Timeout {
                        command: self.command.clone(),
                        timeout,
                    });
                }
            },
        };

        if status.success() {
            Ok(())
        } else {
            Err(NotifyError::Exited {
                command: self.command.clone(),
                code: status.code(),
            })
        }
    }
}
