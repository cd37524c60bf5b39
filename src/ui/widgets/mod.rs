mod header;
mod help;
mod message_panel;
mod progress;
mod status_bar;
mod steps;

pub use header::draw_header;
pub use help::draw_help;
pub use message_panel::draw_message_panel;
pub use progress::draw_progress;
pub use status_bar::{StatusBarState, draw_status_bar};
pub use steps::draw_steps;
