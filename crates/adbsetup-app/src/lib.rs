//! adbsetup-app - Setup state machine and orchestration for adb-setup
//!
//! This crate implements the TEA (The Elm Architecture) pattern for the
//! device setup flow: the step table, the state machine, the Engine that
//! runs entry work in the background, configuration loading, and the
//! dependency trait the machine talks to the outside world through.

pub mod actions;
pub mod config;
pub mod deps;
pub mod engine;
pub mod handler;
pub mod message;
pub mod state_machine;
pub mod steps;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_utils;

// Re-export primary types
pub use deps::{AdbSetupDeps, LocalSetupDeps, SetupDeps};
pub use engine::{Engine, EngineHandle};
pub use handler::{update, UpdateAction, UpdateResult};
pub use message::{Message, SetupAction, TaskOutcome};
pub use state_machine::{AndroidSetupStateMachine, PendingTask, SetupSnapshot, Task};
pub use steps::{step_config, EnterTask, StepConfig};

// Re-export adb types for frontends
pub use adbsetup_adb::{AndroidDevice, DeviceStatus};
