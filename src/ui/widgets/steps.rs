use crate::app::{StepProgress, WorkshopApp};
use crate::workshop::StateName;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

/// Sidebar listing every workshop step
pub fn draw_steps(frame: &mut Frame, area: Rect, app: &WorkshopApp) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.frame())
        .title(" Steps ");

    let inner = block.inner(area);
    frame.render_widget(Clear, area);
    frame.render_widget(block, area);

    for (idx, step) in StateName::STEPS.iter().enumerate() {
        if idx as u16 >= inner.height {
            break;
        }

        let progress = app.step_progress(*step);
        let status = match progress {
            StepProgress::Completed => "[x]",
            StepProgress::Current => "[>]",
            StepProgress::Pending => "[ ]",
        };

        let line_area = Rect::new(inner.x, inner.y + idx as u16, inner.width, 1);
        frame.render_widget(
            Paragraph::new(format!(" {status} {}", step.friendly_name())).style(app.theme.step(progress)),
            line_area,
        );
    }
}
