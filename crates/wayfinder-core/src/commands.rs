//! Commands sent from the UI layer to the simulation.
//!
//! Hosts that talk to the simulator through a channel or IPC bridge send these
//! instead of calling the simulator methods directly.

use serde::{Deserialize, Serialize};

use crate::path::Waypoint;
use crate::state::WeatherReport;

/// All possible user actions on the simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SimCommand {
    // --- Lifecycle ---
    /// Start (or restart) a run over the given waypoints.
    Start { waypoints: Vec<Waypoint> },
    /// Pause a running simulation.
    Pause,
    /// Resume a paused simulation.
    Resume,
    /// Pause if running, resume if paused.
    TogglePause,
    /// End the run and clear the trail.
    Stop,
    /// Rewind the active run to the first waypoint.
    Reset,

    // --- Preferences ---
    /// Set the speed multiplier (clamped to [0.1, 10]).
    SetSpeed { multiplier: f64 },
    /// Enable or disable auto-pause at every waypoint.
    SetStepMode { enabled: bool },
    /// Set the trail capacity (clamped to [10, 500]).
    SetTrailLength { length: usize },

    // --- Environment ---
    /// Replace the ambient weather. `None` means no data (calm).
    UpdateWeather { weather: Option<WeatherReport> },
}
