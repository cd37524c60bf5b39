mod layout;
mod theme;
pub mod widgets;

pub use layout::Layout;
pub use theme::Theme;

use crate::app::WorkshopApp;
use ratatui::Frame;
use ratatui::widgets::Clear;

/// Draw the whole workshop screen
pub fn draw(frame: &mut Frame, app: &WorkshopApp) {
    let area = frame.area();
    let layout = Layout::new(area);
    frame.render_widget(Clear, area);

    widgets::draw_header(frame, layout.header, app);
    widgets::draw_steps(frame, layout.sidebar, app);
    widgets::draw_progress(frame, layout.main, app);

    // Always draw message panel area (shows content only when there's a message)
    widgets::draw_message_panel(frame, layout.message, app);

    widgets::draw_status_bar(frame, layout.status, app);

    if app.show_help {
        widgets::draw_help(frame, layout.main, app);
    }
}
