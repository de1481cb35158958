//! Per-state step configuration
//!
//! Each [`SetupState`] declares an optional entry task and the actions the
//! frontend may offer while it is active.

use adbsetup_core::{ActionKind, SetupState};

/// Background work started when a state is entered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnterTask {
    LocateAdb,
    DiscoverDevices,
    DetectService,
}

/// Entry behavior and permitted actions of one state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepConfig {
    pub on_enter: Option<EnterTask>,
    pub actions: &'static [ActionKind],
}

impl StepConfig {
    pub fn allows(&self, action: ActionKind) -> bool {
        self.actions.contains(&action)
    }
}

/// Step configuration for `state`
pub fn step_config(state: SetupState) -> StepConfig {
    use ActionKind::*;

    match state {
        SetupState::DetectAdb => StepConfig {
            on_enter: Some(EnterTask::LocateAdb),
            actions: &[],
        },
        SetupState::PromptLocateAdb => StepConfig {
            on_enter: None,
            actions: &[SaveAdbPath],
        },
        SetupState::PromptConnectToDevice => StepConfig {
            on_enter: None,
            actions: &[Rescan, LocateAdb],
        },
        SetupState::DetectDevices => StepConfig {
            on_enter: Some(EnterTask::DiscoverDevices),
            actions: &[Cancel],
        },
        SetupState::PromptChooseDevice => StepConfig {
            on_enter: None,
            actions: &[SelectDevice, Rescan, Cancel],
        },
        // Cancel stays disabled while the service check runs
        SetupState::DetectService => StepConfig {
            on_enter: Some(EnterTask::DetectService),
            actions: &[],
        },
        SetupState::PromptInstallService => StepConfig {
            on_enter: None,
            actions: &[Retry, Cancel],
        },
        SetupState::DeviceDiscoveryFailed => StepConfig {
            on_enter: None,
            actions: &[Rescan, LocateAdb],
        },
        SetupState::ReadyToStart => StepConfig {
            on_enter: None,
            actions: &[Rescan, Cancel],
        },
    }
}
