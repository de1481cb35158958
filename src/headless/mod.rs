//! Headless mode - JSON event output for scripting
//!
//! Instead of prompts, headless mode writes structured events to stdout as
//! NDJSON (newline-delimited JSON), one event per line. Commands are still
//! read from stdin.
//!
//! `state_changed` reports the latest state, coalesced. Steps that resolve
//! quickly (such as `detect-adb` on a machine with adb on the PATH) may not
//! get an event of their own, but the final state always does.
//!
//! # Example Output
//!
//! ```json
//! {"event":"state_changed","state":"detect-devices","actions":["cancel"],"devices":[],"selected_device":null,"error":null,"timestamp":1704700001000}
//! {"event":"state_changed","state":"ready-to-start","actions":["rescan","cancel"],"devices":["emulator-5554"],"selected_device":"emulator-5554","error":null,"timestamp":1704700002000}
//! {"event":"ready","device_id":"emulator-5554","device_name":"emulator-5554 (emulator)","timestamp":1704700002000}
//! ```

use chrono::Utc;
use serde::Serialize;
use std::io::{self, Write};

use adbsetup_app::SetupSnapshot;
use adbsetup_core::prelude::*;
use adbsetup_core::{ActionKind, SetupState};

use crate::command::CommandError;
use crate::runner::Presenter;

/// Events emitted in headless mode
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HeadlessEvent {
    /// The active step changed
    StateChanged {
        state: SetupState,
        actions: Vec<ActionKind>,
        devices: Vec<String>,
        selected_device: Option<String>,
        error: Option<String>,
        timestamp: i64,
    },

    /// An action was refused
    ActionRejected {
        action: ActionKind,
        reason: String,
        timestamp: i64,
    },

    /// Setup finished with a device ready for scanning
    Ready {
        device_id: String,
        device_name: String,
        timestamp: i64,
    },

    /// Error occurred
    Error {
        message: String,
        fatal: bool,
        timestamp: i64,
    },
}

impl HeadlessEvent {
    /// Emit this event to stdout as JSON
    pub fn emit(&self) {
        let json = match serde_json::to_string(self) {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to serialize headless event: {}", e);
                return;
            }
        };

        let mut stdout = io::stdout().lock();
        if let Err(e) = writeln!(stdout, "{}", json) {
            error!("Failed to write headless event to stdout: {}", e);
            return;
        }

        if let Err(e) = stdout.flush() {
            error!("Failed to flush headless stdout: {}", e);
        }
    }

    /// Get current timestamp in milliseconds
    fn now() -> i64 {
        Utc::now().timestamp_millis()
    }

    // ─────────────────────────────────────────────────────────
    // Convenience constructors
    // ─────────────────────────────────────────────────────────

    pub fn state_changed(snapshot: &SetupSnapshot) -> Self {
        Self::StateChanged {
            state: snapshot.state,
            actions: snapshot.actions.clone(),
            devices: snapshot.devices.iter().map(|d| d.id.clone()).collect(),
            selected_device: snapshot.selected_device.as_ref().map(|d| d.id.clone()),
            error: snapshot.last_error.clone(),
            timestamp: Self::now(),
        }
    }

    pub fn action_rejected(action: ActionKind, reason: String) -> Self {
        Self::ActionRejected {
            action,
            reason,
            timestamp: Self::now(),
        }
    }

    /// Event for a failed dispatch: a rejection, or a fatal error when the
    /// engine can no longer be reached
    pub fn dispatch_failed(action: ActionKind, error: &Error) -> Self {
        if error.is_fatal() {
            Self::error(error.to_string(), true)
        } else {
            Self::action_rejected(action, error.to_string())
        }
    }

    /// `None` unless the snapshot is `ready-to-start` with a device
    pub fn ready(snapshot: &SetupSnapshot) -> Option<Self> {
        if snapshot.state != SetupState::ReadyToStart {
            return None;
        }
        let device = snapshot.selected_device.as_ref()?;
        Some(Self::Ready {
            device_id: device.id.clone(),
            device_name: device.display_name(),
            timestamp: Self::now(),
        })
    }

    pub fn error(message: String, fatal: bool) -> Self {
        Self::Error {
            message,
            fatal,
            timestamp: Self::now(),
        }
    }
}

/// Emits NDJSON events and finishes once a device is ready
#[derive(Debug, Default)]
pub struct HeadlessPresenter;

impl Presenter for HeadlessPresenter {
    fn snapshot_changed(&mut self, snapshot: &SetupSnapshot) {
        HeadlessEvent::state_changed(snapshot).emit();
        if let Some(ready) = HeadlessEvent::ready(snapshot) {
            ready.emit();
        }
    }

    fn action_rejected(&mut self, action: ActionKind, error: &Error) {
        HeadlessEvent::dispatch_failed(action, error).emit();
    }

    fn invalid_command(&mut self, line: &str, error: &CommandError) {
        warn!("Invalid stdin command {:?}: {}", line, error);
        HeadlessEvent::error(error.to_string(), false).emit();
    }

    fn status(&mut self, snapshot: &SetupSnapshot) {
        HeadlessEvent::state_changed(snapshot).emit();
    }

    fn help(&mut self) {
        debug!("Help requested in headless mode");
    }

    fn is_finished(&self, snapshot: &SetupSnapshot) -> bool {
        snapshot.state == SetupState::ReadyToStart
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adbsetup_adb::test_utils::{test_device, test_emulators};
    use serde_json::Value;

    fn to_json(event: &HeadlessEvent) -> Value {
        serde_json::to_value(event).unwrap()
    }

    #[test]
    fn test_state_changed_event() {
        let snapshot = SetupSnapshot {
            state: SetupState::PromptChooseDevice,
            actions: vec![ActionKind::SelectDevice, ActionKind::Rescan, ActionKind::Cancel],
            devices: test_emulators(2),
            selected_device: None,
            last_error: None,
        };

        let json = to_json(&HeadlessEvent::state_changed(&snapshot));

        assert_eq!(json["event"], "state_changed");
        assert_eq!(json["state"], "prompt-choose-device");
        assert_eq!(
            json["actions"],
            serde_json::json!(["select-device", "rescan", "cancel"])
        );
        assert_eq!(
            json["devices"],
            serde_json::json!(["emulator-5554", "emulator-5556"])
        );
        assert!(json["selected_device"].is_null());
        assert!(json["timestamp"].as_i64().unwrap() > 0);
    }

    #[test]
    fn test_ready_requires_ready_state_and_device() {
        let mut snapshot = SetupSnapshot {
            state: SetupState::DetectService,
            selected_device: Some(test_device("R58M123ABC", Some("Pixel_7"))),
            ..Default::default()
        };
        assert!(HeadlessEvent::ready(&snapshot).is_none());

        snapshot.state = SetupState::ReadyToStart;
        let json = to_json(&HeadlessEvent::ready(&snapshot).unwrap());
        assert_eq!(json["event"], "ready");
        assert_eq!(json["device_id"], "R58M123ABC");
        assert_eq!(json["device_name"], "Pixel 7");

        snapshot.selected_device = None;
        assert!(HeadlessEvent::ready(&snapshot).is_none());
    }

    #[test]
    fn test_action_rejected_event() {
        let error = Error::action_not_available(ActionKind::Retry, SetupState::DetectDevices);
        let json = to_json(&HeadlessEvent::action_rejected(
            ActionKind::Retry,
            error.to_string(),
        ));

        assert_eq!(json["event"], "action_rejected");
        assert_eq!(json["action"], "retry");
        assert!(json["reason"].as_str().unwrap().contains("detect-devices"));
    }

    #[test]
    fn test_dispatch_failure_on_stopped_engine_is_fatal() {
        let json = to_json(&HeadlessEvent::dispatch_failed(
            ActionKind::Rescan,
            &Error::channel_send("rescan action"),
        ));
        assert_eq!(json["event"], "error");
        assert_eq!(json["fatal"], true);

        let json = to_json(&HeadlessEvent::dispatch_failed(
            ActionKind::Rescan,
            &Error::unknown_device("R58M123ABC"),
        ));
        assert_eq!(json["event"], "action_rejected");
        assert_eq!(json["action"], "rescan");
    }

    #[test]
    fn test_error_event() {
        let json = to_json(&HeadlessEvent::error("unknown command".to_string(), false));
        assert_eq!(json["event"], "error");
        assert_eq!(json["fatal"], false);
    }

    #[test]
    fn test_presenter_finishes_when_ready() {
        let presenter = HeadlessPresenter;
        let mut snapshot = SetupSnapshot::default();
        assert!(!presenter.is_finished(&snapshot));

        snapshot.state = SetupState::ReadyToStart;
        assert!(presenter.is_finished(&snapshot));
    }
}
