//! Real-time runner: hosts a `MissionSimulator` on its own thread.
//!
//! Commands arrive via `mpsc` channel. After every loop iteration that ran a
//! tick or applied a command, the snapshot is pushed to a `SnapshotSink` and
//! stored in shared state for synchronous polling.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Instant;

use thiserror::Error;
use tracing::warn;

use wayfinder_core::commands::SimCommand;
use wayfinder_core::error::SimError;
use wayfinder_core::state::SimSnapshot;

use crate::engine::MissionSimulator;

/// Receiver of simulator output (a renderer, an IPC bridge, a test probe).
pub trait SnapshotSink: Send + 'static {
    /// Called with each new snapshot.
    fn publish(&self, snapshot: &SimSnapshot);

    /// Called when a command was rejected.
    fn reject(&self, _error: &SimError) {}
}

impl<F> SnapshotSink for F
where
    F: Fn(&SimSnapshot) + Send + 'static,
{
    fn publish(&self, snapshot: &SimSnapshot) {
        self(snapshot)
    }
}

/// Messages sent to the runner thread.
#[derive(Debug)]
pub enum RunnerCommand {
    /// Forward a command to the simulator.
    Sim(SimCommand),
    /// Shut the runner thread down.
    Shutdown,
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("failed to spawn simulation thread: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("simulation thread is no longer running")]
    Disconnected,
    #[error("simulation thread panicked")]
    Panicked,
}

/// Handle to a running simulation thread.
pub struct RunnerHandle {
    command_tx: mpsc::Sender<RunnerCommand>,
    latest_snapshot: Arc<Mutex<Option<SimSnapshot>>>,
    thread: Option<JoinHandle<()>>,
}

impl RunnerHandle {
    /// Queue a command for the next loop iteration.
    pub fn send(&self, command: SimCommand) -> Result<(), RunnerError> {
        self.command_tx
            .send(RunnerCommand::Sim(command))
            .map_err(|_| RunnerError::Disconnected)
    }

    /// Most recently published snapshot, if any.
    pub fn latest_snapshot(&self) -> Option<SimSnapshot> {
        self.latest_snapshot
            .lock()
            .ok()
            .and_then(|lock| lock.clone())
    }

    /// Stop the thread and wait for it to exit.
    pub fn shutdown(mut self) -> Result<(), RunnerError> {
        self.join()
    }

    fn join(&mut self) -> Result<(), RunnerError> {
        let Some(thread) = self.thread.take() else {
            return Ok(());
        };
        // The thread may already be gone; join reports how it ended
        let _ = self.command_tx.send(RunnerCommand::Shutdown);
        thread.join().map_err(|_| RunnerError::Panicked)
    }
}

impl Drop for RunnerHandle {
    fn drop(&mut self) {
        let _ = self.join();
    }
}

/// Move `simulator` onto a new thread and start its loop.
pub fn spawn_runner(
    simulator: MissionSimulator,
    sink: impl SnapshotSink,
) -> Result<RunnerHandle, RunnerError> {
    let (command_tx, command_rx) = mpsc::channel::<RunnerCommand>();
    let latest_snapshot = Arc::new(Mutex::new(None));
    let latest = Arc::clone(&latest_snapshot);

    let thread = std::thread::Builder::new()
        .name("wayfinder-sim".into())
        .spawn(move || run_loop(simulator, command_rx, &sink, &latest))?;

    Ok(RunnerHandle {
        command_tx,
        latest_snapshot,
        thread: Some(thread),
    })
}

/// The runner loop. Runs until Shutdown or channel disconnect.
fn run_loop(
    mut simulator: MissionSimulator,
    command_rx: mpsc::Receiver<RunnerCommand>,
    sink: &dyn SnapshotSink,
    latest_snapshot: &Mutex<Option<SimSnapshot>>,
) {
    let frame_interval = simulator.config().frame_interval();
    let mut next_wake = Instant::now();

    loop {
        // 1. Drain all pending commands
        let mut changed = false;
        loop {
            match command_rx.try_recv() {
                Ok(RunnerCommand::Sim(command)) => {
                    changed = true;
                    if let Err(e) = simulator.handle_command(command) {
                        warn!("command rejected: {e}");
                        sink.reject(&e);
                    }
                }
                Ok(RunnerCommand::Shutdown) => return,
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => return,
            }
        }

        // 2. Run every due driver tick
        let fired = simulator.pump();

        // 3. Publish if anything happened
        if fired > 0 || changed || !simulator.pending_events().is_empty() {
            let snapshot = simulator.take_snapshot();
            sink.publish(&snapshot);
            if let Ok(mut lock) = latest_snapshot.lock() {
                *lock = Some(snapshot);
            }
        }

        // 4. Sleep until the next frame
        next_wake += frame_interval;
        let now = Instant::now();
        if next_wake > now {
            std::thread::sleep(next_wake - now);
        } else if now - next_wake > frame_interval * 2 {
            // Too far behind, re-anchor instead of catching up
            next_wake = now;
        }
    }
}
