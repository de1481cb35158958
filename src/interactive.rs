//! Interactive mode - human-readable prompts on stdout

use std::fmt::Write as _;

use adbsetup_app::SetupSnapshot;
use adbsetup_core::prelude::*;
use adbsetup_core::{ActionKind, SetupState};

use crate::command::{CommandError, HELP};
use crate::runner::Presenter;

/// What the user sees for each step
pub fn describe_state(state: SetupState) -> &'static str {
    match state {
        SetupState::DetectAdb => "Looking for adb...",
        SetupState::PromptLocateAdb => "Could not find adb. Where is it installed?",
        SetupState::PromptConnectToDevice => {
            "Connect an Android device with USB debugging enabled, or start an emulator."
        }
        SetupState::DetectDevices => "Scanning for devices...",
        SetupState::PromptChooseDevice => "More than one device is connected. Choose one:",
        SetupState::DetectService => "Checking for the accessibility service...",
        SetupState::PromptInstallService => {
            "The accessibility service is not installed on the device."
        }
        SetupState::DeviceDiscoveryFailed => "Could not list connected devices.",
        SetupState::ReadyToStart => "Connected and ready to go!",
    }
}

/// The command that triggers `action`
pub fn command_hint(action: ActionKind) -> &'static str {
    match action {
        ActionKind::SaveAdbPath => "adb <path>",
        ActionKind::Cancel => "cancel",
        ActionKind::Rescan => "rescan",
        ActionKind::LocateAdb => "locate",
        ActionKind::SelectDevice => "select <id>",
        ActionKind::Retry => "retry",
    }
}

/// Render a snapshot as a block of text
pub fn render_snapshot(snapshot: &SetupSnapshot) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "[{}] {}", snapshot.state, describe_state(snapshot.state));

    if let Some(error) = &snapshot.last_error {
        let _ = writeln!(out, "  error: {}", error);
    }

    match snapshot.state {
        SetupState::PromptChooseDevice => {
            for device in &snapshot.devices {
                let _ = writeln!(out, "  {:<24} {}", device.id, device.display_name());
            }
        }
        SetupState::DetectService | SetupState::PromptInstallService | SetupState::ReadyToStart => {
            if let Some(device) = &snapshot.selected_device {
                let _ = writeln!(out, "  device: {} ({})", device.display_name(), device.id);
            }
        }
        _ => {}
    }

    if !snapshot.actions.is_empty() {
        let hints: Vec<&str> = snapshot.actions.iter().map(|a| command_hint(*a)).collect();
        let _ = writeln!(out, "  > {}", hints.join(" | "));
    }

    out
}

/// Prints every state change for a person at a terminal
#[derive(Debug, Default)]
pub struct InteractivePresenter;

impl Presenter for InteractivePresenter {
    fn snapshot_changed(&mut self, snapshot: &SetupSnapshot) {
        print!("{}", render_snapshot(snapshot));
    }

    fn action_rejected(&mut self, action: ActionKind, error: &Error) {
        warn!("Rejected {}: {}", action, error);
        println!("  ! {}", error);
    }

    fn invalid_command(&mut self, _line: &str, error: &CommandError) {
        println!("  ! {}", error);
    }

    fn status(&mut self, snapshot: &SetupSnapshot) {
        print!("{}", render_snapshot(snapshot));
    }

    fn help(&mut self) {
        println!("{}", HELP);
    }
}
