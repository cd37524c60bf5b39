use crate::app::WorkshopApp;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Hint text shown in the status bar, recomputed after every key and tick
#[derive(Debug, Clone, Default)]
pub struct StatusBarState {
    /// Left side hint text (e.g., "2 checks pending")
    pub left_hint: String,
    /// Right side hint text (e.g., "Enter: Next Step")
    pub right_hint: String,
}

impl StatusBarState {
    /// Hints while working on a step
    pub fn step(pending: usize, button: Option<&str>, keyboard_clicks: bool) -> Self {
        let left_hint = match pending {
            0 => "All checks passed".to_string(),
            1 => "1 check pending".to_string(),
            n => format!("{n} checks pending"),
        };

        let right_hint = match (button, keyboard_clicks) {
            (Some(label), true) => format!("Enter: {label}  ?: help  q: quit"),
            (Some(label), false) => format!("Tilt UI: {label}  ?: help  q: quit"),
            (None, _) => "?: help  q: quit".to_string(),
        };

        Self { left_hint, right_hint }
    }

    /// Get hints for the help popup
    pub fn help() -> Self {
        Self {
            left_hint: String::new(),
            right_hint: "Esc: close help".to_string(),
        }
    }

    /// Get hints once the workshop is over
    pub fn finished() -> Self {
        Self {
            left_hint: "Workshop complete!".to_string(),
            right_hint: "q: quit".to_string(),
        }
    }
}

pub fn draw_status_bar(frame: &mut Frame, area: Rect, app: &WorkshopApp) {
    let left = Line::from(vec![
        Span::raw(" "),
        Span::styled(
            format!(" {} ", app.state.state_name.friendly_name().to_uppercase()),
            app.theme.highlight().add_modifier(Modifier::BOLD | Modifier::REVERSED),
        ),
        Span::raw(" "),
        Span::styled(app.status_bar.left_hint.as_str(), app.theme.dim()),
    ]);
    frame.render_widget(Paragraph::new(left).style(app.theme.text()), area);

    let right = Line::from(vec![
        Span::styled(app.status_bar.right_hint.as_str(), app.theme.dim()),
        Span::raw(" "),
    ]);
    let right_width = right.width() as u16;
    if area.width > right_width {
        let right_area = Rect {
            x: area.x + area.width - right_width - 1,
            y: area.y,
            width: right_width + 1,
            height: 1,
        };
        frame.render_widget(Paragraph::new(right).alignment(Alignment::Right), right_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_hints_depend_on_click_source() {
        let keyboard = StatusBarState::step(2, Some("Next step"), true);
        assert_eq!(keyboard.left_hint, "2 checks pending");
        assert!(keyboard.right_hint.starts_with("Enter: Next step"));

        let tilt = StatusBarState::step(0, Some("Exit Workshop"), false);
        assert_eq!(tilt.left_hint, "All checks passed");
        assert!(tilt.right_hint.starts_with("Tilt UI: Exit Workshop"));
    }
}
