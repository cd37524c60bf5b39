use tracing::info;

use super::state::{State, StateName};

/// Move `state` to `next` when every substep of this tick is done.
///
/// An empty substep list counts as complete. This is the only place a
/// state name changes.
pub fn advance_if_substeps_complete(mut state: State, next: StateName) -> State {
    if state.all_substeps_done() {
        info!(from = %state.state_name.friendly_name(), to = %next.friendly_name(), "Advancing workshop");
        state.state_name = next;
    }
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workshop::Substep;

    fn state_with(done: &[bool]) -> State {
        State {
            state_name: StateName::WaitForReady,
            substeps: done
                .iter()
                .map(|&d| Substep { done: d, ..Substep::default() })
                .collect(),
            ..State::default()
        }
    }

    #[test]
    fn empty_substeps_always_advance() {
        for name in StateName::STEPS {
            let state = State { state_name: name, ..State::default() };
            let next = name.successor().unwrap();
            assert_eq!(advance_if_substeps_complete(state, next).state_name, next);
        }
    }

    #[test]
    fn all_done_advances() {
        let state = advance_if_substeps_complete(state_with(&[true, true, true]), StateName::WaitForUpdate);
        assert_eq!(state.state_name, StateName::WaitForUpdate);
    }

    #[test]
    fn any_pending_keeps_state_and_substeps() {
        let before = state_with(&[true, false, true]);
        let after = advance_if_substeps_complete(before.clone(), StateName::WaitForUpdate);
        assert_eq!(after, before);
    }
}
