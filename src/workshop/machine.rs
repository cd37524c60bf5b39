use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::checks::Evaluator;
use super::policy::advance_if_substeps_complete;
use super::state::{Button, State, StateName, Substep};
use crate::error::Result;
use crate::probe::EndpointProbe;
use crate::provider::{ClickTracker, StatusProvider};

/// Resources of the Pixeltilt app whose health gates progress
pub const RESOURCES: [&str; 7] = [
    "frontend",
    "muxer",
    "glitch",
    "red",
    "storage",
    "rectangler",
    "recompile-muxer",
];

pub const TOTAL_STEPS: u32 = 3;

pub const INIT_ADVANCE: &str = "workshop-init-advance";
pub const READY_ADVANCE: &str = "workshop-ready-advance";
pub const UPDATE_ADVANCE: &str = "workshop-first-update-advance";
pub const DONE_ADVANCE: &str = "workshop-done-advance";

const INIT_DESCRIPTION: &str = "Welcome to the Tilt Workshop!

Press the \"Next Step\" button and we'll get going.
";

const READY_DESCRIPTION: &str = "Get Pixeltilt up and running.
(This should just work, but if you have issues talking to docker or k8s you could have issues)
";

const UPDATE_DESCRIPTION: &str = "Tilt handles updating the running servers for you.

To see this, change some Go code and see it running. Let's change the author tag on the muxer's html.

In the file muxer/main.go, change \"Tilt Team\" to \"workshop\".
";

const DONE_DESCRIPTION: &str = "Congrats! You're done with the workshop for now.
";

/// Decides, once per tick, which workshop step the user is on
pub struct Machine {
    checks: Evaluator,
    resources: Vec<String>,
}

impl Machine {
    pub fn new(
        status: Arc<dyn StatusProvider>,
        clicks: Arc<dyn ClickTracker>,
        probe: Arc<dyn EndpointProbe>,
    ) -> Result<Self> {
        Ok(Self {
            checks: Evaluator::new(status, clicks, probe)?,
            resources: RESOURCES.iter().map(|r| r.to_string()).collect(),
        })
    }

    /// Replace the tracked resources, keeping their order.
    pub fn with_resources(mut self, resources: Vec<String>) -> Self {
        self.resources = resources;
        self
    }

    pub fn resources(&self) -> &[String] {
        &self.resources
    }

    /// Evaluate one tick starting from `prior` and return the next state.
    ///
    /// Collaborator failures never escape: they show up as pending substeps
    /// carrying the error text, and the state name stays where it was.
    /// Cancelling `cancel` fails the queries still to run in this tick.
    pub async fn advance(&self, prior: &State, cancel: &CancellationToken) -> State {
        let state = prior.clone();
        debug!("Tick in state {:?}", state.state_name.friendly_name());

        let next = match state.state_name {
            StateName::Init => self.handle_init(state, cancel).await,
            StateName::WaitForReady => self.handle_wait_for_ready(state, cancel).await,
            StateName::WaitForUpdate => self.handle_wait_for_update(state, cancel).await,
            StateName::Done => self.handle_done(state, cancel).await,
            StateName::Delete => self.handle_delete(state),
        };

        if next.state_name == prior.state_name {
            debug!(
                "Staying in {:?}: {} of {} substeps pending",
                next.state_name.friendly_name(),
                next.pending_substeps(),
                next.substeps.len()
            );
        }
        next
    }

    async fn handle_init(&self, mut st: State, cancel: &CancellationToken) -> State {
        st.step_num = 0;
        st.total_steps = TOTAL_STEPS;
        st.buttons = vec![Button::new(INIT_ADVANCE, "Next Step")];
        st.description = INIT_DESCRIPTION.to_string();

        // the button may not be registered yet on the very first tick
        st.substeps = vec![self.checks.clicked("Click Next", INIT_ADVANCE, cancel).await];

        advance_if_substeps_complete(st, StateName::WaitForReady)
    }

    async fn handle_wait_for_ready(&self, mut st: State, cancel: &CancellationToken) -> State {
        if !st.workshop_started.is_set() {
            info!("Workshop started");
        }
        st.workshop_started.set();
        st.step_num = 1;
        st.total_steps = TOTAL_STEPS;
        st.buttons = vec![Button::new(READY_ADVANCE, "Next step")];
        st.description = READY_DESCRIPTION.to_string();

        let mut substeps = Vec::with_capacity(self.resources.len() + 2);
        for name in &self.resources {
            substeps.push(self.checks.resource_ready(name, cancel).await);
        }
        substeps.push(self.checks.endpoint_ready(cancel).await);
        substeps.push(self.checks.clicked("Click Next", READY_ADVANCE, cancel).await);
        st.substeps = substeps;

        advance_if_substeps_complete(st, StateName::WaitForUpdate)
    }

    async fn handle_wait_for_update(&self, mut st: State, cancel: &CancellationToken) -> State {
        st.step_num = 2;
        st.total_steps = TOTAL_STEPS;
        st.buttons = vec![Button::new(UPDATE_ADVANCE, "Next step")];
        st.description = UPDATE_DESCRIPTION.to_string();

        let mut substeps: Vec<Substep> = Vec::new();
        for name in &self.resources {
            let substep = self.checks.resource_ready(name, cancel).await;
            // only mention resources that are not ready
            if !substep.done {
                substeps.push(substep);
            }
        }
        substeps.push(self.checks.author_set(cancel).await);
        substeps.push(self.checks.clicked("Click Next", UPDATE_ADVANCE, cancel).await);
        st.substeps = substeps;

        advance_if_substeps_complete(st, StateName::Done)
    }

    async fn handle_done(&self, mut st: State, cancel: &CancellationToken) -> State {
        st.step_num = 3;
        st.total_steps = TOTAL_STEPS;
        st.buttons = vec![Button::new(DONE_ADVANCE, "Exit Workshop")];
        st.description = DONE_DESCRIPTION.to_string();

        st.substeps = vec![
            self.checks
                .clicked("Click Exit Workshop", DONE_ADVANCE, cancel)
                .await,
        ];

        advance_if_substeps_complete(st, StateName::Delete)
    }

    fn handle_delete(&self, mut st: State) -> State {
        if !st.workshop_done.is_set() {
            info!("Workshop finished");
        }
        st.buttons.clear();
        st.substeps.clear();
        st.workshop_done.set();
        st
    }
}
