//! The Android device setup state machine
//!
//! Pure orchestration: it tracks the active [`SetupState`], decides the next
//! state for actions and task results, and calls the synchronous setters of
//! its [`SetupDeps`]. Async entry work is handed back to the caller as a
//! [`PendingTask`] and reported back through [`complete_task`].
//!
//! Every transition bumps a generation counter. Pending tasks carry the
//! generation they were started in, so results that arrive after the state
//! moved on are dropped without side effects.
//!
//! [`complete_task`]: AndroidSetupStateMachine::complete_task

use std::path::PathBuf;
use std::sync::Arc;

use adbsetup_adb::{find_device, AndroidDevice, DeviceStatus};
use adbsetup_core::prelude::*;
use adbsetup_core::{ActionKind, SetupState};
use serde::Serialize;

use crate::deps::SetupDeps;
use crate::message::{SetupAction, TaskOutcome};
use crate::steps::{step_config, EnterTask};

/// Background work requested by a state's entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Task {
    LocateAdb,
    DiscoverDevices,
    DetectService { device_id: String },
}

/// A task tagged with the generation of the state that requested it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTask {
    pub generation: u64,
    pub task: Task,
}

/// What frontends see of the state machine
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SetupSnapshot {
    pub state: SetupState,
    pub actions: Vec<ActionKind>,
    pub devices: Vec<AndroidDevice>,
    pub selected_device: Option<AndroidDevice>,
    pub last_error: Option<String>,
}

impl SetupSnapshot {
    pub fn allows(&self, action: ActionKind) -> bool {
        self.actions.contains(&action)
    }
}

impl Default for SetupSnapshot {
    fn default() -> Self {
        let state = SetupState::default();
        Self {
            state,
            actions: step_config(state).actions.to_vec(),
            devices: Vec::new(),
            selected_device: None,
            last_error: None,
        }
    }
}

pub struct AndroidSetupStateMachine<D> {
    deps: Arc<D>,
    state: SetupState,
    generation: u64,
    devices: Vec<AndroidDevice>,
    selected_device: Option<AndroidDevice>,
    last_error: Option<String>,
    quitting: bool,
}

impl<D> std::fmt::Debug for AndroidSetupStateMachine<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AndroidSetupStateMachine")
            .field("state", &self.state)
            .field("generation", &self.generation)
            .field("devices", &self.devices.len())
            .field("selected_device", &self.selected_device)
            .finish_non_exhaustive()
    }
}

impl<D: SetupDeps> AndroidSetupStateMachine<D> {
    /// Create a machine sitting in `detect-adb`. Call [`start`](Self::start)
    /// to run its entry behavior.
    pub fn new(deps: Arc<D>) -> Self {
        Self::with_initial_state(deps, SetupState::default())
    }

    pub fn with_initial_state(deps: Arc<D>, state: SetupState) -> Self {
        Self {
            deps,
            state,
            generation: 0,
            devices: Vec::new(),
            selected_device: None,
            last_error: None,
            quitting: false,
        }
    }

    pub fn state(&self) -> SetupState {
        self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn devices(&self) -> &[AndroidDevice] {
        &self.devices
    }

    pub fn selected_device(&self) -> Option<&AndroidDevice> {
        self.selected_device.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn should_quit(&self) -> bool {
        self.quitting
    }

    pub fn request_quit(&mut self) {
        self.quitting = true;
    }

    pub fn snapshot(&self) -> SetupSnapshot {
        SetupSnapshot {
            state: self.state,
            actions: step_config(self.state).actions.to_vec(),
            devices: self.devices.clone(),
            selected_device: self.selected_device.clone(),
            last_error: self.last_error.clone(),
        }
    }

    /// Enter the current state, returning its entry task if it has one
    pub fn start(&mut self) -> Option<PendingTask> {
        self.step_transition(self.state)
    }

    /// Move to `next` and return the entry task it requests
    pub fn step_transition(&mut self, next: SetupState) -> Option<PendingTask> {
        if next != self.state {
            info!("Setup step {} -> {}", self.state, next);
        }
        self.state = next;
        self.generation += 1;
        self.last_error = None;

        let task = match step_config(next).on_enter? {
            EnterTask::LocateAdb => Task::LocateAdb,
            EnterTask::DiscoverDevices => Task::DiscoverDevices,
            EnterTask::DetectService => match &self.selected_device {
                Some(device) => Task::DetectService {
                    device_id: device.id.clone(),
                },
                None => {
                    warn!("Service detection requested without a selected device");
                    return self.step_transition(SetupState::PromptConnectToDevice);
                }
            },
        };

        Some(PendingTask {
            generation: self.generation,
            task,
        })
    }

    /// Apply a user action
    ///
    /// Actions the current step does not offer are rejected without touching
    /// any state.
    pub fn dispatch(&mut self, action: SetupAction) -> Result<Option<PendingTask>> {
        let kind = action.kind();
        if !step_config(self.state).allows(kind) {
            return Err(Error::action_not_available(kind, self.state));
        }

        debug!("Applying {} in {}", kind, self.state);

        let pending = match action {
            SetupAction::SaveAdbPath(path) => self.save_adb_path(path),
            SetupAction::Cancel => self.step_transition(SetupState::PromptConnectToDevice),
            SetupAction::Rescan => self.step_transition(SetupState::DetectDevices),
            SetupAction::LocateAdb => self.step_transition(SetupState::PromptLocateAdb),
            SetupAction::Retry => self.step_transition(SetupState::DetectService),
            SetupAction::SelectDevice(id) => {
                let device = find_device(&self.devices, &id)
                    .cloned()
                    .ok_or_else(|| Error::unknown_device(&id))?;
                self.select_device(device)
            }
        };

        Ok(pending)
    }

    /// Apply the result of an entry task started at `generation`
    ///
    /// Results from an earlier generation, or that do not belong to the
    /// current state, are discarded.
    pub fn complete_task(&mut self, generation: u64, outcome: TaskOutcome) -> Option<PendingTask> {
        if generation != self.generation {
            debug!(
                "Discarding stale task result from generation {} (now {} in {})",
                generation, self.generation, self.state
            );
            return None;
        }

        match (self.state, outcome) {
            (SetupState::DetectAdb, TaskOutcome::AdbLocated(Some(path))) => {
                self.deps.set_adb_path(&path);
                self.step_transition(SetupState::DetectDevices)
            }
            (SetupState::DetectAdb, TaskOutcome::AdbLocated(None)) => {
                self.step_transition(SetupState::PromptLocateAdb)
            }
            (SetupState::DetectDevices, TaskOutcome::DevicesDiscovered(devices)) => {
                self.on_devices_discovered(devices)
            }
            (SetupState::DetectDevices, TaskOutcome::DeviceDiscoveryFailed { error }) => {
                warn!("Device discovery failed: {}", error);
                self.devices.clear();
                self.selected_device = None;
                let pending = self.step_transition(SetupState::DeviceDiscoveryFailed);
                self.last_error = Some(error);
                pending
            }
            (SetupState::DetectService, TaskOutcome::ServiceDetected { installed: true }) => {
                self.step_transition(SetupState::ReadyToStart)
            }
            (SetupState::DetectService, TaskOutcome::ServiceDetected { installed: false }) => {
                self.step_transition(SetupState::PromptInstallService)
            }
            (SetupState::DetectService, TaskOutcome::ServiceDetectionFailed { error }) => {
                warn!("Service detection failed: {}", error);
                let pending = self.step_transition(SetupState::PromptInstallService);
                self.last_error = Some(error);
                pending
            }
            (state, outcome) => {
                warn!("Ignoring {:?} in {}", outcome, state);
                None
            }
        }
    }

    fn save_adb_path(&mut self, path: PathBuf) -> Option<PendingTask> {
        self.deps.set_adb_path(&path);
        self.step_transition(SetupState::PromptConnectToDevice)
    }

    /// Only online devices can be chosen. When nothing usable is left, the
    /// devices that were skipped are named in `last_error`.
    fn on_devices_discovered(&mut self, devices: Vec<AndroidDevice>) -> Option<PendingTask> {
        let (online, not_ready): (Vec<_>, Vec<_>) =
            devices.into_iter().partition(AndroidDevice::is_online);
        for device in &not_ready {
            warn!("Skipping device {} ({})", device.id, device.status);
        }

        self.devices = online;
        self.selected_device = None;

        match self.devices.len() {
            0 => {
                let pending = self.step_transition(SetupState::PromptConnectToDevice);
                if !not_ready.is_empty() {
                    self.last_error = Some(not_ready_hint(&not_ready));
                }
                pending
            }
            1 => {
                let device = self.devices[0].clone();
                self.select_device(device)
            }
            _ => self.step_transition(SetupState::PromptChooseDevice),
        }
    }

    fn select_device(&mut self, device: AndroidDevice) -> Option<PendingTask> {
        self.deps.set_selected_device_id(&device.id);
        self.selected_device = Some(device);
        self.step_transition(SetupState::DetectService)
    }
}

fn not_ready_hint(devices: &[AndroidDevice]) -> String {
    let listed = devices
        .iter()
        .map(|d| format!("{} ({})", d.id, d.status))
        .collect::<Vec<_>>()
        .join(", ");
    let mut hint = format!("Skipped {} device(s) that are not ready: {}.", devices.len(), listed);

    if devices.iter().any(|d| d.status == DeviceStatus::Unauthorized) {
        hint.push_str(" Accept the USB debugging prompt on the device, then rescan.");
    } else if devices.iter().any(|d| d.status == DeviceStatus::NoPermissions) {
        hint.push_str(" Check the udev rules for the device, then rescan.");
    }
    hint
}
