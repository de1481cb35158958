//! Frontend event loop shared by interactive and headless mode
//!
//! Stdin is read on a dedicated thread and forwarded line by line. The loop
//! reacts to whichever comes first: a new snapshot from the engine or a line
//! of input.

use adbsetup_app::{EngineHandle, SetupSnapshot};
use adbsetup_core::prelude::*;
use adbsetup_core::ActionKind;
use tokio::sync::mpsc;

use crate::command::{parse_command, Command, CommandError};

/// Capacity of the stdin line channel
const STDIN_CHANNEL_CAPACITY: usize = 16;

/// How a frontend presents the setup flow
pub trait Presenter {
    /// A new snapshot was published (also called once with the initial one)
    ///
    /// Snapshots are coalesced: steps the engine passes through faster than
    /// the frontend polls are skipped, and the latest state is always shown.
    fn snapshot_changed(&mut self, snapshot: &SetupSnapshot);

    /// The engine refused an action, or could not be reached (`error.is_fatal()`)
    fn action_rejected(&mut self, action: ActionKind, error: &Error);

    /// A line of input could not be parsed
    fn invalid_command(&mut self, line: &str, error: &CommandError);

    /// The user asked for the current state
    fn status(&mut self, snapshot: &SetupSnapshot);

    fn help(&mut self);

    /// Whether the frontend is done once `snapshot` is shown
    fn is_finished(&self, _snapshot: &SetupSnapshot) -> bool {
        false
    }
}

/// Why the frontend loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    /// The presenter reported it is finished
    Finished,
    /// The user typed quit
    Quit,
    /// Input closed
    InputClosed,
    /// The engine stopped publishing
    EngineStopped,
}

/// Drive `presenter` from engine snapshots and input lines until one of them
/// ends the session
pub async fn run_frontend<P: Presenter>(
    handle: &EngineHandle,
    mut lines: mpsc::Receiver<String>,
    presenter: &mut P,
) -> Exit {
    let mut snapshots = handle.subscribe();

    let initial = snapshots.borrow_and_update().clone();
    presenter.snapshot_changed(&initial);
    if presenter.is_finished(&initial) {
        return Exit::Finished;
    }

    loop {
        tokio::select! {
            changed = snapshots.changed() => {
                if changed.is_err() {
                    info!("Engine stopped publishing snapshots");
                    return Exit::EngineStopped;
                }
                let snapshot = snapshots.borrow_and_update().clone();
                presenter.snapshot_changed(&snapshot);
                if presenter.is_finished(&snapshot) {
                    return Exit::Finished;
                }
            }

            line = lines.recv() => {
                let Some(line) = line else {
                    info!("Input closed");
                    return Exit::InputClosed;
                };

                match parse_command(&line) {
                    Ok(None) => {}
                    Ok(Some(Command::Quit)) => {
                        info!("Quit requested");
                        return Exit::Quit;
                    }
                    Ok(Some(Command::Status)) => presenter.status(&handle.snapshot()),
                    Ok(Some(Command::Help)) => presenter.help(),
                    Ok(Some(Command::Action(action))) => {
                        let kind = action.kind();
                        if let Err(e) = handle.dispatch(action).await {
                            presenter.action_rejected(kind, &e);
                            if e.is_fatal() {
                                error!("Setup engine is gone: {}", e);
                                return Exit::EngineStopped;
                            }
                            debug!("Action {} rejected: {}", kind, e);
                        }
                    }
                    Err(e) => presenter.invalid_command(&line, &e),
                }
            }
        }
    }
}

/// Read stdin on its own thread and forward each line
///
/// The returned receiver closes when stdin reaches end of file.
pub fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(STDIN_CHANNEL_CAPACITY);
    std::thread::spawn(move || read_lines_blocking(std::io::stdin().lock(), tx));
    rx
}

fn read_lines_blocking<R: std::io::BufRead>(reader: R, tx: mpsc::Sender<String>) {
    for line in reader.lines() {
        match line {
            Ok(line) => {
                if tx.blocking_send(line).is_err() {
                    break;
                }
            }
            Err(e) => {
                error!("Failed to read stdin: {}", e);
                break;
            }
        }
    }

    debug!("Stdin reader exiting");
}
