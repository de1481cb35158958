//! Engine - drives the setup state machine
//!
//! The engine owns the [`AndroidSetupStateMachine`] and processes one
//! [`Message`] at a time. Entry tasks run on spawned tokio tasks and report
//! back through the same message channel, so the machine never handles two
//! transitions at once while frontends stay responsive.
//!
//! Frontends talk to a running engine through an [`EngineHandle`]: they send
//! actions and watch [`SetupSnapshot`]s.

use std::sync::Arc;

use adbsetup_adb::find_device;
use adbsetup_core::prelude::*;
use adbsetup_core::SetupState;
use tokio::sync::{mpsc, watch};

use crate::actions::handle_action;
use crate::deps::SetupDeps;
use crate::handler::{update, UpdateResult};
use crate::message::{Message, SetupAction};
use crate::state_machine::{AndroidSetupStateMachine, SetupSnapshot};

/// Capacity of the engine's message channel
const MESSAGE_CHANNEL_CAPACITY: usize = 32;

pub struct Engine<D> {
    machine: AndroidSetupStateMachine<D>,
    deps: Arc<D>,
    msg_tx: mpsc::Sender<Message>,
    msg_rx: mpsc::Receiver<Message>,
    snapshot_tx: watch::Sender<SetupSnapshot>,
}

impl<D> std::fmt::Debug for Engine<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("machine", &self.machine)
            .finish_non_exhaustive()
    }
}

impl<D> Engine<D>
where
    D: SetupDeps + Sync + 'static,
{
    /// Create an engine starting in `detect-adb`
    pub fn new(deps: Arc<D>) -> Self {
        Self::with_initial_state(deps, SetupState::default())
    }

    pub fn with_initial_state(deps: Arc<D>, state: SetupState) -> Self {
        let machine = AndroidSetupStateMachine::with_initial_state(deps.clone(), state);
        let (msg_tx, msg_rx) = mpsc::channel(MESSAGE_CHANNEL_CAPACITY);
        let (snapshot_tx, _) = watch::channel(machine.snapshot());

        Self {
            machine,
            deps,
            msg_tx,
            msg_rx,
            snapshot_tx,
        }
    }

    /// Handle for sending actions and observing snapshots
    pub fn handle(&self) -> EngineHandle {
        EngineHandle {
            msg_tx: self.msg_tx.clone(),
            snapshot_rx: self.snapshot_tx.subscribe(),
        }
    }

    /// Run until a [`Message::Quit`] arrives
    ///
    /// Returns the final state.
    pub async fn run(mut self) -> SetupState {
        info!("Setup engine starting in {}", self.machine.state());

        let pending = self.machine.start();
        self.process(UpdateResult::from_pending(pending));
        self.publish();

        // The engine holds its own sender, so recv() only ends on Quit
        while let Some(message) = self.msg_rx.recv().await {
            let result = update(&mut self.machine, message);
            self.process(result);
            self.publish();

            if self.machine.should_quit() {
                break;
            }
        }

        info!("Setup engine stopped in {}", self.machine.state());
        self.machine.state()
    }

    fn process(&self, result: UpdateResult) {
        if let Some(action) = result.action {
            handle_action(action, self.deps.clone(), self.msg_tx.clone());
        }
    }

    fn publish(&self) {
        let snapshot = self.machine.snapshot();
        self.snapshot_tx.send_if_modified(|current| {
            if *current == snapshot {
                false
            } else {
                *current = snapshot;
                true
            }
        });
    }
}

/// Cloneable handle to a running [`Engine`]
#[derive(Debug, Clone)]
pub struct EngineHandle {
    msg_tx: mpsc::Sender<Message>,
    snapshot_rx: watch::Receiver<SetupSnapshot>,
}

impl EngineHandle {
    /// Send an action to the engine
    ///
    /// Fails fast with [`Error::ActionNotAvailable`] when the latest snapshot
    /// does not offer the action, or [`Error::UnknownDevice`] when it does not
    /// list the device to select. The engine checks again when it applies it.
    pub async fn dispatch(&self, action: SetupAction) -> Result<()> {
        let kind = action.kind();
        {
            let snapshot = self.snapshot_rx.borrow();
            if !snapshot.allows(kind) {
                return Err(Error::action_not_available(kind, snapshot.state));
            }
            if let SetupAction::SelectDevice(id) = &action {
                if find_device(&snapshot.devices, id).is_none() {
                    return Err(Error::unknown_device(id));
                }
            }
        }

        self.msg_tx
            .send(Message::Action(action))
            .await
            .map_err(|_| Error::channel_send(format!("{} action", kind)))
    }

    /// Ask the engine to stop
    pub async fn quit(&self) -> Result<()> {
        self.msg_tx
            .send(Message::Quit)
            .await
            .map_err(|_| Error::channel_send("quit"))
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> SetupSnapshot {
        self.snapshot_rx.borrow().clone()
    }

    /// A fresh receiver for snapshot changes
    ///
    /// Only the latest snapshot is kept, so a slow receiver sees intermediate
    /// steps coalesced.
    pub fn subscribe(&self) -> watch::Receiver<SetupSnapshot> {
        self.snapshot_rx.clone()
    }

    /// Wait until the engine publishes `state`
    pub async fn wait_for_state(&self, state: SetupState) -> Result<SetupSnapshot> {
        let mut rx = self.snapshot_rx.clone();
        let snapshot = rx
            .wait_for(|s| s.state == state)
            .await
            .map_err(|_| Error::ChannelClosed)?;
        Ok(snapshot.clone())
    }
}
