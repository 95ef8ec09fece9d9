use ratatui::style::Color;

/// Color identity for each emotion the service can report. Unknown or absent
/// labels fall back to white, mirroring the service's fixed vocabulary.
pub fn emotion_color(emotion: Option<&str>) -> Color {
    match emotion {
        Some("happy") => Color::Yellow,
        Some("sad") => Color::Blue,
        Some("angry") => Color::Red,
        Some("surprise") => Color::LightYellow,
        Some("fear") => Color::Magenta,
        Some("disgust") => Color::Green,
        Some("neutral") => Color::Gray,
        _ => Color::White,
    }
}

/// Display label for the current emotion: capitalized, or a scanning notice
/// while the service has not reported one yet.
pub fn emotion_label(emotion: Option<&str>) -> String {
    match emotion {
        Some(e) if !e.is_empty() => {
            let mut chars = e.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        }
        _ => "Scanning...".to_string(),
    }
}

/// Readiness string for the reasoning service. Two states only; there is no
/// intermediate state to model.
pub fn brain_status_label(brain_online: bool) -> &'static str {
    if brain_online {
        "ONLINE // GEMMA-2B"
    } else {
        "LOADING..."
    }
}

pub fn brain_status_color(brain_online: bool) -> Color {
    if brain_online {
        Color::Green
    } else {
        Color::Yellow
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emotion_color_known_labels() {
        assert_eq!(emotion_color(Some("happy")), Color::Yellow);
        assert_eq!(emotion_color(Some("sad")), Color::Blue);
        assert_eq!(emotion_color(Some("angry")), Color::Red);
        assert_eq!(emotion_color(Some("surprise")), Color::LightYellow);
        assert_eq!(emotion_color(Some("fear")), Color::Magenta);
        assert_eq!(emotion_color(Some("disgust")), Color::Green);
        assert_eq!(emotion_color(Some("neutral")), Color::Gray);
    }

    #[test]
    fn test_emotion_color_fallback() {
        assert_eq!(emotion_color(Some("confused")), Color::White);
        assert_eq!(emotion_color(None), Color::White);
    }

    #[test]
    fn test_emotion_label_capitalizes() {
        assert_eq!(emotion_label(Some("happy")), "Happy");
        assert_eq!(emotion_label(Some("neutral")), "Neutral");
    }

    #[test]
    fn test_emotion_label_absent() {
        assert_eq!(emotion_label(None), "Scanning...");
        assert_eq!(emotion_label(Some("")), "Scanning...");
    }

    #[test]
    fn test_brain_status_two_states() {
        assert_eq!(brain_status_label(true), "ONLINE // GEMMA-2B");
        assert_eq!(brain_status_label(false), "LOADING...");
        assert_eq!(brain_status_color(true), Color::Green);
        assert_eq!(brain_status_color(false), Color::Yellow);
    }
}
