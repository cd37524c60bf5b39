use crate::app::WorkshopApp;
use crate::ui::Layout;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

pub fn draw_help(frame: &mut Frame, area: Rect, app: &WorkshopApp) {
    let press = if app.clicks.is_some() {
        "  Enter / n   Press the step's button"
    } else {
        "  Enter / n   Show which Tilt button to click"
    };

    let help_text = vec![
        Line::from(Span::styled("Keys", Style::default().add_modifier(Modifier::BOLD))),
        Line::from(press),
        Line::from("  r           Check the step again now"),
        Line::from("  ?           Toggle this help"),
        Line::from("  q / Esc     Quit (progress is kept)"),
        Line::from(""),
        Line::from(Span::styled("Markers", Style::default().add_modifier(Modifier::BOLD))),
        Line::from("  [x]         Check passed"),
        Line::from("  [ ]         Still waiting, see the reason below it"),
        Line::from(""),
        Line::from(Span::styled("Press Escape to close", app.theme.dim())),
    ];

    let height = help_text.len() as u16 + 2;
    let width = 52u16.min(area.width.saturating_sub(4));
    let help_area = Layout::centered_box(area, width, height);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.frame())
        .title(" Help ")
        .title_style(app.theme.accent());

    frame.render_widget(Clear, help_area);
    frame.render_widget(
        Paragraph::new(help_text).block(block),
        help_area,
    );
}
