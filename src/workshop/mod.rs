//! The workshop progress engine.
//!
//! [`Machine::advance`] takes the state from the previous tick, evaluates the
//! substeps of the current step against the collaborators, and returns the
//! state for the next tick.

mod checks;
mod machine;
mod policy;
mod state;

pub use checks::{ClickStatus, EXPECTED_AUTHOR, Evaluator};
pub use machine::{
    DONE_ADVANCE, INIT_ADVANCE, Machine, READY_ADVANCE, RESOURCES, TOTAL_STEPS, UPDATE_ADVANCE,
};
pub use policy::advance_if_substeps_complete;
pub use state::{Button, Latch, State, StateName, Substep};
