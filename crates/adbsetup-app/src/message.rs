//! Message types for the setup flow (TEA pattern)

use std::path::PathBuf;

use adbsetup_adb::AndroidDevice;
use adbsetup_core::ActionKind;

/// A user-triggerable action together with its payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetupAction {
    /// Record where the adb binary lives
    SaveAdbPath(PathBuf),
    Cancel,
    /// Enumerate devices again
    Rescan,
    /// Go back to entering an adb location
    LocateAdb,
    /// Pick one of the discovered devices by serial
    SelectDevice(String),
    /// Check for the service again
    Retry,
}

impl SetupAction {
    pub fn kind(&self) -> ActionKind {
        match self {
            SetupAction::SaveAdbPath(_) => ActionKind::SaveAdbPath,
            SetupAction::Cancel => ActionKind::Cancel,
            SetupAction::Rescan => ActionKind::Rescan,
            SetupAction::LocateAdb => ActionKind::LocateAdb,
            SetupAction::SelectDevice(_) => ActionKind::SelectDevice,
            SetupAction::Retry => ActionKind::Retry,
        }
    }
}

/// Result of a state's entry work, posted back by the spawned task
#[derive(Debug, Clone)]
pub enum TaskOutcome {
    AdbLocated(Option<PathBuf>),
    DevicesDiscovered(Vec<AndroidDevice>),
    DeviceDiscoveryFailed { error: String },
    ServiceDetected { installed: bool },
    ServiceDetectionFailed { error: String },
}

/// All possible messages in the setup flow
#[derive(Debug, Clone)]
pub enum Message {
    /// Action requested by the frontend
    Action(SetupAction),

    /// Entry work for the state entered at `generation` finished
    TaskCompleted {
        generation: u64,
        outcome: TaskOutcome,
    },

    /// Stop the engine
    Quit,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_kinds() {
        assert_eq!(
            SetupAction::SaveAdbPath(PathBuf::from("/usr/bin/adb")).kind(),
            ActionKind::SaveAdbPath
        );
        assert_eq!(SetupAction::Cancel.kind(), ActionKind::Cancel);
        assert_eq!(SetupAction::Rescan.kind(), ActionKind::Rescan);
        assert_eq!(SetupAction::LocateAdb.kind(), ActionKind::LocateAdb);
        assert_eq!(
            SetupAction::SelectDevice("emulator-5554".to_string()).kind(),
            ActionKind::SelectDevice
        );
        assert_eq!(SetupAction::Retry.kind(), ActionKind::Retry);
    }
}
