use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::app::App;
use crate::presentation::{
    brain_status_color, brain_status_label, emotion_color, emotion_label,
};
use crate::session::Role;

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, body, footer
    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(frame, header_area);

    // Body: stream/status panel left, conversation right
    let [stream_area, chat_column] =
        Layout::horizontal([Constraint::Percentage(45), Constraint::Percentage(55)])
            .areas(body_area);

    render_stream_panel(app, frame, stream_area);
    render_chat_panel(app, frame, chat_column);

    render_footer(app, frame, footer_area);
}

fn render_header(frame: &mut Frame, area: Rect) {
    let title = Line::from(vec![
        Span::styled(" REACHY ", Style::default().fg(Color::Cyan).bold()),
        Span::styled("EMPATH INTERFACE ", Style::default().fg(Color::Magenta)),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let readiness = if app.chat_enabled() {
        Span::styled(" READY ", Style::default().bg(Color::Green).fg(Color::Black))
    } else {
        Span::styled(" INITIALIZING ", Style::default().bg(Color::Yellow).fg(Color::Black))
    };

    let hints = Span::styled(
        "  Enter send | ↑/↓ scroll | Esc quit",
        Style::default().fg(Color::DarkGray),
    );

    let footer = Paragraph::new(Line::from(vec![readiness, hints]));
    frame.render_widget(footer, area);
}

fn render_stream_panel(app: &mut App, frame: &mut Frame, area: Rect) {
    app.stream_area = Some(area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta))
        .title(" Vision ");

    let snapshot = app.snapshot.as_ref();
    let emotion = snapshot.and_then(|s| s.emotion.as_deref());

    let mut lines: Vec<Line> = Vec::new();

    // The terminal cannot decode the MJPEG feed; show where it lives so the
    // operator can open it elsewhere. The panel itself owns nothing but the
    // address.
    lines.push(Line::from(vec![
        Span::styled("Live feed: ", Style::default().fg(Color::DarkGray)),
        Span::styled(app.stream.source.as_str(), Style::default().fg(Color::Cyan)),
    ]));
    lines.push(Line::default());

    lines.push(Line::from(Span::styled(
        "CURRENT RESONANCE",
        Style::default().fg(Color::DarkGray),
    )));
    lines.push(Line::from(vec![
        Span::styled("● ", Style::default().fg(emotion_color(emotion))),
        Span::styled(
            emotion_label(emotion),
            Style::default().add_modifier(Modifier::BOLD),
        ),
    ]));
    lines.push(Line::default());

    let brain_online = snapshot.map_or(false, |s| s.brain_online);
    lines.push(Line::from(Span::styled(
        "BRAIN STATUS",
        Style::default().fg(Color::DarkGray),
    )));
    lines.push(Line::from(Span::styled(
        brain_status_label(brain_online),
        Style::default().fg(brain_status_color(brain_online)),
    )));
    lines.push(Line::default());

    if let Some(s) = snapshot {
        if let Some(mode) = &s.mode {
            lines.push(Line::from(vec![
                Span::styled("Mode: ", Style::default().fg(Color::DarkGray)),
                Span::raw(mode.as_str()),
            ]));
        }
        if let Some(connected) = s.connected {
            let (label, color) = if connected {
                ("linked", Color::Green)
            } else {
                ("unlinked", Color::Red)
            };
            lines.push(Line::from(vec![
                Span::styled("Robot: ", Style::default().fg(Color::DarkGray)),
                Span::styled(label, Style::default().fg(color)),
            ]));
        }
    } else {
        lines.push(Line::from(Span::styled(
            "Waiting for first status...",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let panel = Paragraph::new(Text::from(lines))
        .block(block)
        .wrap(Wrap { trim: true });

    frame.render_widget(panel, area);
}

fn render_chat_panel(app: &mut App, frame: &mut Frame, area: Rect) {
    let [chat_area, input_area] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(3)]).areas(area);

    // Store areas for mouse hit-testing and scroll calculations
    app.chat_area = Some(chat_area);
    app.chat_height = chat_area.height.saturating_sub(2);
    app.chat_width = chat_area.width.saturating_sub(2);

    let chat_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Conversation ");

    let chat_text = if app.session.messages().is_empty() && !app.session.is_sending() {
        Text::from(Span::styled(
            "\"How are you feeling right now?\"",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        let mut lines: Vec<Line> = Vec::new();

        for msg in app.session.messages() {
            match msg.role {
                Role::User => {
                    lines.push(Line::from(Span::styled(
                        "You:",
                        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                    )));
                    for line in msg.text.lines() {
                        lines.push(Line::from(line));
                    }
                    lines.push(Line::default());
                }
                Role::Bot => {
                    lines.push(Line::from(Span::styled(
                        "Reachy:",
                        Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
                    )));
                    for line in msg.text.lines() {
                        lines.push(Line::from(line));
                    }
                    lines.push(Line::default());
                }
                Role::System => {
                    lines.push(Line::from(Span::styled(
                        msg.text.as_str(),
                        Style::default().fg(Color::Red).add_modifier(Modifier::ITALIC),
                    )));
                    lines.push(Line::default());
                }
            }
        }

        if app.session.is_sending() {
            lines.push(Line::from(Span::styled(
                "Reachy:",
                Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
            )));
            // Animated ellipsis: cycles through ".", "..", "..."
            let dots = ".".repeat((app.animation_frame as usize) + 1);
            lines.push(Line::from(Span::styled(
                format!("Thinking{}", dots),
                Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
            )));
        }

        Text::from(lines)
    };

    let chat = Paragraph::new(chat_text)
        .block(chat_block)
        .wrap(Wrap { trim: true })
        .scroll((app.chat_scroll, 0));

    frame.render_widget(chat, chat_area);

    // Input box; dimmed until the service is ready to take chat
    let (input_border, input_title) = if app.chat_enabled() {
        (Color::Yellow, " Type to Reachy... (Enter to send) ")
    } else {
        (Color::DarkGray, " Waiting for brain... ")
    };

    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(input_border))
        .title(input_title);

    // Calculate visible portion of input with horizontal scrolling
    // Inner width = total width - 2 (for borders)
    let inner_width = input_area.width.saturating_sub(2) as usize;
    let cursor_pos = app.input_cursor;

    let scroll_offset = if inner_width == 0 {
        0
    } else if cursor_pos >= inner_width {
        cursor_pos - inner_width + 1
    } else {
        0
    };

    let visible_text: String = app
        .chat_input
        .chars()
        .skip(scroll_offset)
        .take(inner_width)
        .collect();

    let input = Paragraph::new(visible_text)
        .style(Style::default().fg(Color::Cyan))
        .block(input_block);

    frame.render_widget(input, input_area);
}
