use crate::app::WorkshopApp;
use crate::ui::Theme;
use crate::workshop::Substep;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

/// Main panel: the current step's instructions, checks and buttons
pub fn draw_progress(frame: &mut Frame, area: Rect, app: &WorkshopApp) {
    let st = &app.state;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.accent())
        .title(format!(" {} ", st.state_name.friendly_name()))
        .title_style(app.theme.accent().add_modifier(Modifier::BOLD));

    let mut lines: Vec<Line> = st
        .description
        .lines()
        .map(|l| Line::styled(l.to_string(), app.theme.text()))
        .collect();

    if !st.substeps.is_empty() {
        lines.push(Line::raw(""));
        lines.push(Line::styled(
            "Complete the following steps to advance:",
            app.theme.text().add_modifier(Modifier::BOLD),
        ));
        for substep in &st.substeps {
            lines.extend(substep_lines(substep, &app.theme));
        }
    }

    if !st.buttons.is_empty() {
        lines.push(Line::raw(""));
        let mut spans = Vec::new();
        for button in &st.buttons {
            spans.push(Span::styled(format!(" [ {} ] ", button.label), app.theme.button()));
            spans.push(Span::raw(" "));
        }
        lines.push(Line::from(spans));
    }

    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        area,
    );
}

fn substep_lines<'a>(substep: &'a Substep, theme: &Theme) -> Vec<Line<'a>> {
    let marker = if substep.done { "[x]" } else { "[ ]" };

    let mut head = vec![
        Span::raw("  "),
        Span::styled(marker, theme.marker(substep.done)),
        Span::raw(" "),
        Span::styled(substep.desc.as_str(), theme.text()),
    ];
    if !substep.instruction.is_empty() {
        head.push(Span::styled(format!("  ({})", substep.instruction), theme.dim()));
    }

    let mut lines = vec![Line::from(head)];
    if !substep.output.is_empty() || !substep.expected.is_empty() {
        lines.push(Line::from(vec![
            Span::raw("      -> "),
            Span::styled(format!("{:?}", substep.output), theme.failing()),
        ]));
    }
    if !substep.expected.is_empty() {
        lines.push(Line::from(vec![
            Span::raw("         expected "),
            Span::styled(substep.expected.as_str(), theme.passing()),
        ]));
    }
    lines
}
