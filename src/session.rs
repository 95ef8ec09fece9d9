use anyhow::Result;
use tokio::task::JoinHandle;
use tracing::warn;

use crate::client::EmpathClient;

/// Local notice inserted into the log when a chat round-trip fails.
pub const SEND_ERROR_NOTICE: &str = "Error communicating with Reachy.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Bot,
    /// Reserved for local error notices, never sent to or received from the
    /// service.
    System,
}

#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub role: Role,
    pub text: String,
}

impl ChatMessage {
    fn user(text: &str) -> Self {
        Self { role: Role::User, text: text.to_string() }
    }

    fn bot(text: String) -> Self {
        Self { role: Role::Bot, text }
    }

    fn system(text: &str) -> Self {
        Self { role: Role::System, text: text.to_string() }
    }
}

/// One conversation with the service: an append-only message log plus a
/// two-state machine (`Idle`/`Sending`) represented by the `sending` flag.
///
/// Every mutation of the log and the flag goes through `submit` and `resolve`;
/// nothing else touches them. A submit arriving while a round-trip is
/// outstanding is rejected, so at most one request is ever in flight.
pub struct ChatSession {
    messages: Vec<ChatMessage>,
    sending: bool,
    task: Option<JoinHandle<Result<String>>>,
}

impl ChatSession {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            sending: false,
            task: None,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_sending(&self) -> bool {
        self.sending
    }

    /// Submit user input. Returns `false` (and does nothing) when a round-trip
    /// is already outstanding or the input is blank after trimming. Otherwise
    /// appends the user message immediately, before any network confirmation,
    /// and spawns the single request for this round-trip.
    pub fn submit(&mut self, raw: &str, client: &EmpathClient) -> bool {
        if self.sending || raw.trim().is_empty() {
            return false;
        }

        self.messages.push(ChatMessage::user(raw));
        self.sending = true;

        let client = client.clone();
        let text = raw.to_string();
        self.task = Some(tokio::spawn(async move { client.chat(&text).await }));

        true
    }

    /// Drive the outstanding round-trip. Called from the event loop on every
    /// tick; a no-op unless the spawned request has settled.
    pub async fn poll_response(&mut self) {
        let finished = self.task.as_ref().map_or(false, |t| t.is_finished());
        if !finished {
            return;
        }

        if let Some(task) = self.task.take() {
            let outcome = match task.await {
                Ok(result) => result,
                // A cancelled or panicked request task counts as a failed
                // round-trip like any other.
                Err(e) => Err(e.into()),
            };
            self.resolve(outcome);
        }
    }

    /// The one `Sending -> Idle` transition. Success appends the bot reply;
    /// any failure appends the fixed system notice. The optimistic user
    /// message stays in the log either way.
    pub fn resolve(&mut self, outcome: Result<String>) {
        match outcome {
            Ok(text) => self.messages.push(ChatMessage::bot(text)),
            Err(e) => {
                warn!("chat round-trip failed: {e:#}");
                self.messages.push(ChatMessage::system(SEND_ERROR_NOTICE));
            }
        }
        self.sending = false;
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}
