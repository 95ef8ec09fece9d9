use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

use crate::app::App;
use crate::tui::AppEvent;

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

pub fn handle_event(app: &mut App, event: AppEvent) -> Result<()> {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        AppEvent::Resize(_, _) => {}
        AppEvent::Tick => {
            app.tick_animation();
        }
        AppEvent::Status(snapshot) => {
            app.apply_status(snapshot);
        }
    }
    Ok(())
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Quit from anywhere
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    match key.code {
        KeyCode::Esc => {
            app.should_quit = true;
        }

        // Send what is typed; the session guard and the readiness gate decide
        // whether anything actually happens.
        KeyCode::Enter => {
            app.submit_input();
        }

        // Chat viewport
        KeyCode::Up => {
            app.scroll_chat_up();
        }
        KeyCode::Down => {
            app.scroll_chat_down();
        }
        KeyCode::PageUp => {
            app.chat_scroll = app.chat_scroll.saturating_sub(app.chat_height / 2);
        }
        KeyCode::PageDown => {
            app.chat_scroll = app.chat_scroll.saturating_add(app.chat_height / 2);
        }

        // Input editing, cursor tracked as a char index
        KeyCode::Backspace => {
            if app.input_cursor > 0 {
                app.input_cursor -= 1;
                let byte_pos = char_to_byte_index(&app.chat_input, app.input_cursor);
                app.chat_input.remove(byte_pos);
            }
        }
        KeyCode::Delete => {
            let char_count = app.chat_input.chars().count();
            if app.input_cursor < char_count {
                let byte_pos = char_to_byte_index(&app.chat_input, app.input_cursor);
                app.chat_input.remove(byte_pos);
            }
        }
        KeyCode::Left => {
            app.input_cursor = app.input_cursor.saturating_sub(1);
        }
        KeyCode::Right => {
            let char_count = app.chat_input.chars().count();
            app.input_cursor = (app.input_cursor + 1).min(char_count);
        }
        KeyCode::Home => {
            app.input_cursor = 0;
        }
        KeyCode::End => {
            app.input_cursor = app.chat_input.chars().count();
        }
        KeyCode::Char(c) => {
            let byte_pos = char_to_byte_index(&app.chat_input, app.input_cursor);
            app.chat_input.insert(byte_pos, c);
            app.input_cursor += 1;
        }

        _ => {}
    }
}

/// Check if a point is within a rectangle
fn point_in_rect(x: u16, y: u16, rect: Rect) -> bool {
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    let in_chat = app
        .chat_area
        .map(|r| point_in_rect(mouse.column, mouse.row, r))
        .unwrap_or(false);

    match mouse.kind {
        MouseEventKind::ScrollDown if in_chat => {
            app.scroll_chat_down();
            app.scroll_chat_down();
            app.scroll_chat_down();
        }
        MouseEventKind::ScrollUp if in_chat => {
            app.scroll_chat_up();
            app.scroll_chat_up();
            app.scroll_chat_up();
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::EmpathClient;
    use crate::status::StatusSnapshot;

    fn test_app() -> App {
        App::new(EmpathClient::new("http://127.0.0.1:9"))
    }

    fn key(code: KeyCode) -> AppEvent {
        AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_typing_inserts_at_cursor() {
        let mut app = test_app();
        for c in "héllo".chars() {
            handle_event(&mut app, key(KeyCode::Char(c))).unwrap();
        }
        assert_eq!(app.chat_input, "héllo");
        assert_eq!(app.input_cursor, 5);

        handle_event(&mut app, key(KeyCode::Home)).unwrap();
        handle_event(&mut app, key(KeyCode::Char('>'))).unwrap();
        assert_eq!(app.chat_input, ">héllo");
    }

    #[test]
    fn test_backspace_is_utf8_safe() {
        let mut app = test_app();
        app.chat_input = "héllo".to_string();
        app.input_cursor = 2;

        handle_event(&mut app, key(KeyCode::Backspace)).unwrap();
        assert_eq!(app.chat_input, "hllo");
        assert_eq!(app.input_cursor, 1);
    }

    #[test]
    fn test_status_event_updates_snapshot() {
        let mut app = test_app();
        let snapshot = StatusSnapshot {
            emotion: Some("happy".to_string()),
            brain_online: true,
            mode: None,
            connected: None,
        };

        handle_event(&mut app, AppEvent::Status(snapshot)).unwrap();
        assert!(app.chat_enabled());
        assert_eq!(
            app.snapshot.as_ref().unwrap().emotion.as_deref(),
            Some("happy")
        );
    }

    #[test]
    fn test_escape_quits() {
        let mut app = test_app();
        handle_event(&mut app, key(KeyCode::Esc)).unwrap();
        assert!(app.should_quit);
    }
}
