use serde::Deserialize;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::client::EmpathClient;
use crate::tui::AppEvent;

/// The last successfully retrieved remote state. Replaced wholesale on every
/// successful poll; a failed poll leaves the previous value untouched.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct StatusSnapshot {
    pub emotion: Option<String>,
    #[serde(default)]
    pub brain_online: bool,
    pub mode: Option<String>,
    pub connected: Option<bool>,
}

/// Periodic `/status` fetcher scoped to the dashboard's lifetime.
///
/// Each cycle issues one request and, on success, publishes the decoded
/// snapshot into the app event channel. Failures are traced and otherwise
/// swallowed: no backoff, no cadence change, nothing shown to the user.
/// Freshness is opportunistic, not strictly ordered; the last snapshot to
/// arrive on the channel wins.
pub struct StatusPoller {
    handle: JoinHandle<()>,
}

impl StatusPoller {
    pub fn spawn(
        client: EmpathClient,
        interval: Duration,
        tx: mpsc::UnboundedSender<AppEvent>,
    ) -> Self {
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                match client.status().await {
                    Ok(snapshot) => {
                        if tx.send(AppEvent::Status(snapshot)).is_err() {
                            // Receiver gone, the dashboard is shutting down.
                            break;
                        }
                    }
                    Err(e) => {
                        debug!("status poll failed: {e:#}");
                    }
                }
            }
        });

        Self { handle }
    }

    /// Stop polling. No request is issued after this returns; a result still
    /// in flight is dropped with the task and never applied anywhere.
    pub fn stop(&self) {
        self.handle.abort();
    }
}

impl Drop for StatusPoller {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
