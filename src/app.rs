use ratatui::layout::Rect;

use crate::client::EmpathClient;
use crate::session::ChatSession;
use crate::status::StatusSnapshot;

/// Passive reference to the externally-owned video feed. The address is set
/// once at startup; everything about the stream itself (reconnection,
/// buffering, recovery) belongs to whatever consumes the address.
pub struct StreamView {
    pub source: String,
}

impl StreamView {
    pub fn new(source: String) -> Self {
        Self { source }
    }
}

pub struct App {
    // Core state
    pub should_quit: bool,

    // Latest remote state; last-known-good on poll failure
    pub snapshot: Option<StatusSnapshot>,

    // Conversation state
    pub session: ChatSession,
    pub chat_input: String,
    pub input_cursor: usize, // char index into chat_input
    pub chat_scroll: u16,
    pub chat_height: u16, // Inner height of the chat area for scroll calculations
    pub chat_width: u16,  // Inner width of the chat area for wrap calculations

    // Stream panel
    pub stream: StreamView,

    // Animation state
    pub animation_frame: u8, // 0-2 for ellipsis animation

    // Panel areas for mouse hit-testing (updated during render)
    pub chat_area: Option<Rect>,
    pub stream_area: Option<Rect>,

    // Service access
    pub client: EmpathClient,
}

impl App {
    pub fn new(client: EmpathClient) -> Self {
        let stream = StreamView::new(client.video_feed_url());

        Self {
            should_quit: false,
            snapshot: None,
            session: ChatSession::new(),
            chat_input: String::new(),
            input_cursor: 0,
            chat_scroll: 0,
            chat_height: 0,
            chat_width: 0,
            stream,
            animation_frame: 0,
            chat_area: None,
            stream_area: None,
            client,
        }
    }

    /// Wholesale replacement of the remote snapshot. Partial responses were
    /// already completed by the decoder; there is never a field-level merge.
    pub fn apply_status(&mut self, snapshot: StatusSnapshot) {
        self.snapshot = Some(snapshot);
    }

    /// Chat input is only enabled once the latest snapshot reports the
    /// reasoning service ready. No snapshot yet means not ready.
    pub fn chat_enabled(&self) -> bool {
        self.snapshot.as_ref().map_or(false, |s| s.brain_online)
    }

    /// Single entry point for sending what is currently typed. The session's
    /// own guard is authoritative; this adds the readiness gate and clears
    /// the input buffer only when the submit was actually accepted.
    pub fn submit_input(&mut self) {
        if !self.chat_enabled() {
            return;
        }

        let raw = self.chat_input.clone();
        if self.session.submit(&raw, &self.client) {
            self.chat_input.clear();
            self.input_cursor = 0;
            self.scroll_chat_to_bottom();
        }
    }

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) {
        if self.session.is_sending() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }

    pub fn scroll_chat_up(&mut self) {
        self.chat_scroll = self.chat_scroll.saturating_sub(1);
    }

    pub fn scroll_chat_down(&mut self) {
        self.chat_scroll = self.chat_scroll.saturating_add(1);
    }

    /// Scroll the chat viewport so the newest message (or the typing
    /// indicator) is visible.
    pub fn scroll_chat_to_bottom(&mut self) {
        let wrap_width = if self.chat_width > 0 {
            self.chat_width as usize
        } else {
            50
        };

        let mut total_lines: u16 = 0;

        for msg in self.session.messages() {
            total_lines += 1; // Role line ("You:" / "Reachy:" / "!")
            for line in msg.text.lines() {
                // Use character count, not byte length, for proper UTF-8 handling
                let char_count = line.chars().count();
                if char_count == 0 {
                    total_lines += 1;
                } else {
                    total_lines += ((char_count / wrap_width) + 1) as u16;
                }
            }
            total_lines += 1; // Blank line after message
        }

        if self.session.is_sending() {
            total_lines += 2; // "Reachy:" + animated ellipsis
        }

        let visible_height = if self.chat_height > 0 {
            self.chat_height
        } else {
            20
        };

        if total_lines > visible_height {
            self.chat_scroll = total_lines.saturating_sub(visible_height);
        }
    }
}
