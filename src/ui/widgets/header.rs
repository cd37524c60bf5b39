use crate::app::WorkshopApp;
use chrono::Local;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

pub fn draw_header(frame: &mut Frame, area: Rect, app: &WorkshopApp) {
    let time = Local::now().format("%H:%M").to_string();

    // Left side: title with version
    let mut left_spans = vec![
        Span::raw(" "),
        Span::styled(
            format!("{} (v{})", app.config.general.title, env!("CARGO_PKG_VERSION")),
            app.theme.accent().add_modifier(Modifier::BOLD),
        ),
    ];
    if app.is_dryrun() {
        left_spans.push(Span::styled(" [DRYRUN]", app.theme.failing()));
    }
    frame.render_widget(Paragraph::new(Line::from(left_spans)), area);

    // Right side: step counter and time
    let st = &app.state;
    let right = Paragraph::new(Line::from(vec![
        Span::styled(
            format!("Step {} of {}", st.step_num, st.total_steps),
            app.theme.highlight(),
        ),
        Span::raw("  "),
        Span::styled(&time, app.theme.dim()),
        Span::raw(" "),
    ]))
    .alignment(Alignment::Right);
    frame.render_widget(right, area);
}
