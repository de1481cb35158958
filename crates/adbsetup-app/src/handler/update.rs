//! Main update function - handles state transitions (TEA pattern)

use crate::deps::SetupDeps;
use crate::message::Message;
use crate::state_machine::AndroidSetupStateMachine;
use tracing::warn;

use super::UpdateResult;

/// Process a message and update the state machine
/// Returns the background task to spawn, if any
pub fn update<D: SetupDeps>(
    machine: &mut AndroidSetupStateMachine<D>,
    message: Message,
) -> UpdateResult {
    match message {
        Message::Action(action) => match machine.dispatch(action) {
            Ok(pending) => UpdateResult::from_pending(pending),
            Err(e) => {
                warn!("Rejected action: {}", e);
                UpdateResult::none()
            }
        },

        Message::TaskCompleted {
            generation,
            outcome,
        } => UpdateResult::from_pending(machine.complete_task(generation, outcome)),

        Message::Quit => {
            machine.request_quit();
            UpdateResult::none()
        }
    }
}
