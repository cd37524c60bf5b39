use crate::app::{Message, WorkshopApp};
use crate::ui::Theme;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

/// Last transition or failure, shown under the step panel until a key is pressed
pub fn draw_message_panel(frame: &mut Frame, area: Rect, app: &WorkshopApp) {
    if let Some(msg) = &app.message {
        frame.render_widget(message_paragraph(msg, &app.theme), area);
    }
}

fn message_paragraph<'a>(msg: &'a Message, theme: &Theme) -> Paragraph<'a> {
    let (title, tone) = if msg.is_error {
        (" Error ", theme.failing())
    } else {
        (" Info ", theme.highlight())
    };
    let body = if msg.is_error { tone } else { theme.text() };

    Paragraph::new(Line::from(vec![
        Span::styled(msg.text.as_str(), body),
        Span::styled("  (any key dismisses)", theme.dim()),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(tone)
            .title(Span::styled(title, tone.add_modifier(Modifier::BOLD))),
    )
    .wrap(Wrap { trim: true })
}
