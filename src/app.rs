use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::{ClickSource, WorkshopConfig};
use crate::error::Result;
use crate::persist;
use crate::probe::{HttpProbe, StaticProbe};
use crate::provider::{LocalClicks, StaticStatus, TiltCli};
use crate::ui::Theme;
use crate::ui::widgets::StatusBarState;
use crate::workshop::{Machine, State, StateName};

/// Page served by the simulated muxer in dryrun mode
const DRYRUN_PAGE: &str = r#"<html><head><meta name="author" content="workshop"></head></html>"#;

/// Wire the machine to Tilt and the app, or to stand-ins in dryrun mode.
/// Returns the local click tracker when buttons are pressed from this terminal.
pub fn build_machine(config: &WorkshopConfig) -> Result<(Machine, Option<Arc<LocalClicks>>)> {
    let started_at = Utc::now();

    let (machine, local) = if config.general.dryrun {
        info!("Dryrun: simulating Tilt and the muxer");
        let keyboard = Arc::new(LocalClicks::new());
        let machine = Machine::new(
            Arc::new(StaticStatus::default()),
            keyboard.clone(),
            Arc::new(StaticProbe::serving(DRYRUN_PAGE)),
        )?;
        (machine, Some(keyboard))
    } else {
        let tilt = Arc::new(TiltCli::new(&config.tilt.command, started_at)?);
        let probe = Arc::new(HttpProbe::new(&config.endpoint.url, config.endpoint.timeout())?);
        match config.tilt.clicks {
            ClickSource::Tilt => (Machine::new(tilt.clone(), tilt, probe)?, None),
            ClickSource::Keyboard => {
                let keyboard = Arc::new(LocalClicks::new());
                (Machine::new(tilt, keyboard.clone(), probe)?, Some(keyboard))
            }
        }
    };

    Ok((machine.with_resources(config.resources.clone()), local))
}

/// Actions the event loop has to carry out for the app
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkshopAction {
    /// Evaluate the current step now instead of waiting for the next poll
    Refresh,
    Quit,
}

/// Message displayed to the user
pub struct Message {
    pub text: String,
    pub is_error: bool,
}

/// How a step in the sidebar relates to the user's position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepProgress {
    Completed,
    Current,
    Pending,
}

/// Terminal UI state wrapped around the workshop [`State`]
pub struct WorkshopApp {
    pub config: WorkshopConfig,
    pub theme: Theme,
    pub state: State,
    /// Set when buttons are pressed from this terminal
    pub clicks: Option<Arc<LocalClicks>>,

    pub message: Option<Message>,
    pub status_bar: StatusBarState,
    pub show_help: bool,
    pub should_exit: bool,

    last_poll: Option<Instant>,
}

impl WorkshopApp {
    pub fn new(config: WorkshopConfig, state: State, clicks: Option<Arc<LocalClicks>>) -> Self {
        let mut app = Self {
            config,
            theme: Theme::default(),
            state,
            clicks,
            message: None,
            status_bar: StatusBarState::default(),
            show_help: false,
            should_exit: false,
            last_poll: None,
        };
        app.update_status_bar();
        app
    }

    pub fn is_dryrun(&self) -> bool {
        self.config.general.dryrun
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<WorkshopAction> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_exit = true;
            return Some(WorkshopAction::Quit);
        }

        // Clear message on any key
        self.message = None;

        if self.show_help {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?')) {
                self.show_help = false;
            }
            self.update_status_bar();
            return None;
        }

        let action = match key.code {
            KeyCode::Enter | KeyCode::Char('n') => self.press_button(),
            KeyCode::Char('r') => Some(WorkshopAction::Refresh),
            KeyCode::Char('?') => {
                self.show_help = true;
                None
            }
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_exit = true;
                Some(WorkshopAction::Quit)
            }
            _ => None,
        };

        self.update_status_bar();
        action
    }

    /// Press the first button of the current step.
    fn press_button(&mut self) -> Option<WorkshopAction> {
        let button = self.state.buttons.first()?.clone();

        match &self.clicks {
            Some(clicks) => {
                clicks.click(&button.id);
                Some(WorkshopAction::Refresh)
            }
            None => {
                self.set_info(format!("Click \"{}\" in the Tilt UI to continue", button.label));
                None
            }
        }
    }

    pub fn poll_due(&self, now: Instant) -> bool {
        match self.last_poll {
            Some(last) => now.duration_since(last) >= self.config.poll.interval(),
            None => true,
        }
    }

    /// Run one tick of the machine and keep the result.
    pub async fn advance(&mut self, machine: &Machine, cancel: &CancellationToken) {
        let before = self.state.state_name;
        self.state = machine.advance(&self.state, cancel).await;
        self.last_poll = Some(Instant::now());

        if self.state.state_name != before {
            self.set_info(format!("Now on: {}", self.state.state_name.friendly_name()));
        }

        if let Some(path) = &self.config.state_file {
            if let Err(e) = persist::save_state(path, &self.state) {
                warn!("Failed to save state to {:?}: {}", path, e);
                self.set_error(format!("Could not save progress: {e}"));
            }
        }

        if self.state.workshop_done.is_set() {
            info!("Workshop done, exiting");
            self.should_exit = true;
        }

        self.update_status_bar();
    }

    pub fn step_progress(&self, step: StateName) -> StepProgress {
        if step < self.state.state_name {
            StepProgress::Completed
        } else if step == self.state.state_name {
            StepProgress::Current
        } else {
            StepProgress::Pending
        }
    }

    pub fn set_error(&mut self, text: String) {
        self.message = Some(Message {
            text,
            is_error: true,
        });
    }

    pub fn set_info(&mut self, text: String) {
        self.message = Some(Message {
            text,
            is_error: false,
        });
    }

    fn update_status_bar(&mut self) {
        self.status_bar = if self.show_help {
            StatusBarState::help()
        } else if self.state.state_name == StateName::Delete {
            StatusBarState::finished()
        } else {
            let label = self.state.buttons.first().map(|b| b.label.as_str());
            StatusBarState::step(self.state.pending_substeps(), label, self.clicks.is_some())
        };
    }
}
