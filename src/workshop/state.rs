use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::WorkshopError;

/// Named steps of the workshop, ordered along the only path through it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum StateName {
    #[default]
    Init,
    WaitForReady,
    WaitForUpdate,
    Done,
    Delete,
}

impl StateName {
    /// Steps the user works through, in order. `Delete` is teardown, not a step.
    pub const STEPS: [StateName; 4] = [
        StateName::Init,
        StateName::WaitForReady,
        StateName::WaitForUpdate,
        StateName::Done,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StateName::Init => "",
            StateName::WaitForReady => "WaitForReady",
            StateName::WaitForUpdate => "WaitForUpdate",
            StateName::Done => "Done",
            StateName::Delete => "Delete",
        }
    }

    pub fn friendly_name(&self) -> &'static str {
        match self {
            StateName::Init => "Welcome",
            StateName::WaitForReady => "Start Pixeltilt",
            StateName::WaitForUpdate => "Live Update",
            StateName::Done => "Finished",
            StateName::Delete => "Cleaning Up",
        }
    }

    pub fn successor(&self) -> Option<StateName> {
        match self {
            StateName::Init => Some(StateName::WaitForReady),
            StateName::WaitForReady => Some(StateName::WaitForUpdate),
            StateName::WaitForUpdate => Some(StateName::Done),
            StateName::Done => Some(StateName::Delete),
            StateName::Delete => None,
        }
    }
}

impl fmt::Display for StateName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StateName {
    type Err = WorkshopError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" => Ok(StateName::Init),
            "WaitForReady" => Ok(StateName::WaitForReady),
            "WaitForUpdate" => Ok(StateName::WaitForUpdate),
            "Done" => Ok(StateName::Done),
            "Delete" => Ok(StateName::Delete),
            other => Err(WorkshopError::UnimplementedState(other.to_string())),
        }
    }
}

impl TryFrom<String> for StateName {
    type Error = WorkshopError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<StateName> for String {
    fn from(name: StateName) -> Self {
        name.as_str().to_string()
    }
}

/// A flag that can be set once and never cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Latch(bool);

impl Latch {
    pub fn set(&mut self) {
        self.0 = true;
    }

    pub fn is_set(&self) -> bool {
        self.0
    }
}

/// A user-triggerable action shown for the current step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Button {
    pub id: String,
    pub label: String,
}

impl Button {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// One completion condition, evaluated fresh on every tick.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Substep {
    /// What is being checked
    pub desc: String,
    /// Command a human could run to check it by hand (never executed)
    pub instruction: String,
    pub done: bool,
    /// Error detail or observed value; empty when done
    pub output: String,
    /// Expected value, only set for mismatches
    pub expected: String,
}

impl Substep {
    pub fn new(desc: impl Into<String>, instruction: impl Into<String>) -> Self {
        Self {
            desc: desc.into(),
            instruction: instruction.into(),
            ..Self::default()
        }
    }

    pub fn passed(mut self) -> Self {
        self.done = true;
        self.output.clear();
        self.expected.clear();
        self
    }

    pub fn failed(mut self, output: impl Into<String>) -> Self {
        self.done = false;
        self.output = output.into();
        self
    }

    pub fn mismatch(mut self, observed: impl Into<String>, expected: impl Into<String>) -> Self {
        self.done = false;
        self.output = observed.into();
        self.expected = expected.into();
        self
    }
}

/// Workshop progress, threaded through [`Machine::advance`](super::Machine::advance)
/// by the caller and persisted between ticks.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct State {
    pub state_name: StateName,
    pub step_num: u32,
    pub total_steps: u32,
    pub description: String,
    pub buttons: Vec<Button>,
    pub substeps: Vec<Substep>,
    pub workshop_started: Latch,
    pub workshop_done: Latch,
}

impl State {
    pub fn all_substeps_done(&self) -> bool {
        self.substeps.iter().all(|s| s.done)
    }

    pub fn pending_substeps(&self) -> usize {
        self.substeps.iter().filter(|s| !s.done).count()
    }
}
