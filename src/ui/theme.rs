use ratatui::style::{Color, Modifier, Style};

use crate::app::StepProgress;

/// Tilt-flavoured palette. Passing and failing colours follow the Tilt UI.
#[derive(Debug, Clone)]
pub struct Theme {
    pub accent: Color,
    pub highlight: Color,
    pub text: Color,
    pub passing: Color,
    pub failing: Color,
    pub frame: Color,
    pub dim: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            accent: Color::Rgb(32, 186, 49),
            highlight: Color::Cyan,
            text: Color::Reset,
            passing: Color::Green,
            failing: Color::Rgb(246, 111, 100),
            frame: Color::DarkGray,
            dim: Color::DarkGray,
        }
    }
}

impl Theme {
    pub fn text(&self) -> Style {
        Style::default().fg(self.text)
    }

    pub fn accent(&self) -> Style {
        Style::default().fg(self.accent)
    }

    pub fn highlight(&self) -> Style {
        Style::default().fg(self.highlight)
    }

    pub fn passing(&self) -> Style {
        Style::default().fg(self.passing)
    }

    pub fn failing(&self) -> Style {
        Style::default().fg(self.failing)
    }

    pub fn frame(&self) -> Style {
        Style::default().fg(self.frame)
    }

    pub fn dim(&self) -> Style {
        Style::default().fg(self.dim)
    }

    /// Substep marker: green when met, red while pending.
    pub fn marker(&self, done: bool) -> Style {
        let style = if done { self.passing() } else { self.failing() };
        style.add_modifier(Modifier::BOLD)
    }

    pub fn button(&self) -> Style {
        self.accent().add_modifier(Modifier::BOLD | Modifier::REVERSED)
    }

    /// Sidebar entry for a workshop step
    pub fn step(&self, progress: StepProgress) -> Style {
        match progress {
            StepProgress::Completed => self.highlight(),
            StepProgress::Current => self.button(),
            StepProgress::Pending => self.dim(),
        }
    }
}
