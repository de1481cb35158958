//! Domain types for the device setup flow

use serde::{Deserialize, Serialize};
use std::fmt;

/// A step of the Android device setup flow.
///
/// Exactly one state is active at a time. The wire form is kebab-case
/// (`detect-devices`, `prompt-choose-device`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SetupState {
    /// Looking for a usable adb binary (initial state)
    #[default]
    DetectAdb,
    /// Ask the user where adb lives
    PromptLocateAdb,
    /// Ask the user to physically connect a device
    PromptConnectToDevice,
    /// Enumerating connected devices
    DetectDevices,
    /// Several devices found, user must pick one
    PromptChooseDevice,
    /// Checking the accessibility service on the selected device
    DetectService,
    /// Service missing or its check failed
    PromptInstallService,
    /// Device enumeration failed
    DeviceDiscoveryFailed,
    /// Connected and ready to scan
    ReadyToStart,
}

impl SetupState {
    pub const ALL: [SetupState; 9] = [
        SetupState::DetectAdb,
        SetupState::PromptLocateAdb,
        SetupState::PromptConnectToDevice,
        SetupState::DetectDevices,
        SetupState::PromptChooseDevice,
        SetupState::DetectService,
        SetupState::PromptInstallService,
        SetupState::DeviceDiscoveryFailed,
        SetupState::ReadyToStart,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SetupState::DetectAdb => "detect-adb",
            SetupState::PromptLocateAdb => "prompt-locate-adb",
            SetupState::PromptConnectToDevice => "prompt-connect-to-device",
            SetupState::DetectDevices => "detect-devices",
            SetupState::PromptChooseDevice => "prompt-choose-device",
            SetupState::DetectService => "detect-service",
            SetupState::PromptInstallService => "prompt-install-service",
            SetupState::DeviceDiscoveryFailed => "device-discovery-failed",
            SetupState::ReadyToStart => "ready-to-start",
        }
    }

    /// States that wait on background work rather than on the user
    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            SetupState::DetectAdb | SetupState::DetectDevices | SetupState::DetectService
        )
    }
}

impl fmt::Display for SetupState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tag of a user-triggerable action, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionKind {
    SaveAdbPath,
    Cancel,
    Rescan,
    LocateAdb,
    SelectDevice,
    Retry,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::SaveAdbPath => "save-adb-path",
            ActionKind::Cancel => "cancel",
            ActionKind::Rescan => "rescan",
            ActionKind::LocateAdb => "locate-adb",
            ActionKind::SelectDevice => "select-device",
            ActionKind::Retry => "retry",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
