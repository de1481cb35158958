//! Handler module - TEA update function
//!
//! Organized into submodules:
//! - `update`: Main update() function and message dispatch

pub(crate) mod update;


use crate::state_machine::{PendingTask, Task};

// Re-export main entry point
pub use update::update;

/// Actions that the engine should perform after update
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateAction {
    /// Run a state's entry work in the background
    SpawnTask { generation: u64, task: Task },
}

impl From<PendingTask> for UpdateAction {
    fn from(pending: PendingTask) -> Self {
        UpdateAction::SpawnTask {
            generation: pending.generation,
            task: pending.task,
        }
    }
}

/// Result of processing a message
#[derive(Debug, Default)]
pub struct UpdateResult {
    /// Optional action for the engine to perform
    pub action: Option<UpdateAction>,
}

impl UpdateResult {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn action(action: UpdateAction) -> Self {
        Self {
            action: Some(action),
        }
    }

    pub(crate) fn from_pending(pending: Option<PendingTask>) -> Self {
        Self {
            action: pending.map(UpdateAction::from),
        }
    }
}
