//! Command/response correlation by time window.
//!
//! The protocol has no request IDs. After sending a command the client
//! collects whatever arrives on its queue for a fixed window and treats that
//! as the response. Commands issued faster than the device answers can have
//! their responses attributed to the wrong call.

use std::time::Duration;

use rspserial_message::Message;
use tokio::time::{timeout_at, Instant};
use tracing::{debug, warn, Level};

use crate::error::Result;
use crate::shared::ClientConnection;

pub const DEFAULT_TIME_WINDOW: Duration = Duration::from_secs(1);
/// The device takes several seconds to boot before it sends feedback.
pub const POWER_ON_TIME_WINDOW: Duration = Duration::from_secs(5);

/// Collection windows used by [`ClientConnection::process_command_auto`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandWindows {
    pub default_window: Duration,
    pub power_on_window: Duration,
}

impl Default for CommandWindows {
    fn default() -> Self {
        Self {
            default_window: DEFAULT_TIME_WINDOW,
            power_on_window: POWER_ON_TIME_WINDOW,
        }
    }
}

impl CommandWindows {
    /// Window for a command: power commands get the longer one.
    pub fn window_for(&self, command: &str) -> Duration {
        if command.contains("POWER") {
            self.power_on_window
        } else {
            self.default_window
        }
    }
}

impl ClientConnection {
    pub fn windows(&self) -> CommandWindows {
        self.windows
    }

    pub fn with_windows(mut self, windows: CommandWindows) -> Self {
        self.windows = windows;
        self
    }

    /// Send a command and return the messages that arrive within `window`.
    ///
    /// Messages already queued before the call are included. The batch ends
    /// early if the connection stops. Payloads that fail to decode are logged
    /// and left out. Cancel safe: dropping the future mid-window keeps the
    /// messages received so far, and [`recv`](Self::recv) returns them first.
    pub async fn process_command(&mut self, name: &str, window: Duration) -> Result<Vec<Message>> {
        self.send_command(name).await?;
        let messages = self.collect(window).await;
        debug!(command = name, count = messages.len(), ?window, "command window closed");
        Ok(messages)
    }

    /// Messages that arrive within `window`, starting with those already queued.
    ///
    /// The batch is built up in the client's pending buffer, so a cancelled
    /// call leaves every message it had taken readable by the next read.
    pub async fn collect(&mut self, window: Duration) -> Vec<Message> {
        let deadline = Instant::now() + window;
        loop {
            match timeout_at(deadline, self.receiver.recv()).await {
                Ok(Some(Ok(message))) => {
                    message.log(Level::DEBUG);
                    self.pending.push_back(message);
                }
                Ok(Some(Err(err))) => warn!(%err, "skipping undecodable message"),
                Ok(None) => {
                    debug!("connection stopped during collection window");
                    break;
                }
                Err(_) => break,
            }
        }
        self.pending.drain(..).collect()
    }

    /// [`process_command`](Self::process_command) with the window picked by
    /// [`CommandWindows::window_for`].
    pub async fn process_command_auto(&mut self, name: &str) -> Result<Vec<Message>> {
        let window = self.windows.window_for(name);
        self.process_command(name, window).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_selection() {
        let windows = CommandWindows::default();
        assert_eq!(windows.window_for("POWER_ON"), Duration::from_secs(5));
        assert_eq!(windows.window_for("ZONE_2_POWER_TOGGLE"), Duration::from_secs(5));
        assert_eq!(windows.window_for("SOURCE_CD"), Duration::from_secs(1));
        assert_eq!(windows.window_for("DISPLAY_REFRESH"), Duration::from_secs(1));
    }
}
