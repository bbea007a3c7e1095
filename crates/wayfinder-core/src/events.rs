//! Discrete events emitted by the simulation for UI notifications.

use serde::{Deserialize, Serialize};

/// Signals emitted at the moment they occur.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SimEvent {
    /// A run started over a path of `waypoint_count` waypoints.
    Started {
        waypoint_count: usize,
        total_distance: f64,
    },
    /// The drone arrived at waypoint `index`.
    WaypointReached {
        index: usize,
        waypoint_id: u32,
        elapsed_time: f64,
    },
    /// Step mode paused the run at waypoint `index`.
    StepPaused { index: usize },
    /// The final waypoint was reached. Emitted once per run.
    MissionComplete {
        elapsed_time: f64,
        distance_traveled: f64,
        battery: f64,
    },
    /// The run was stopped; renderers should remove markers and trails.
    Stopped,
    /// Battery crossed the low-battery threshold.
    BatteryLow { battery: f64 },
}

impl SimEvent {
    /// Short human-readable notification text.
    pub fn message(&self) -> String {
        match self {
            Self::Started { waypoint_count, .. } => {
                format!("Simulation started ({waypoint_count} waypoints)")
            }
            Self::WaypointReached { index, .. } => format!("Reached waypoint {}", index + 1),
            Self::StepPaused { index } => format!("Paused at waypoint {}", index + 1),
            Self::MissionComplete { .. } => "Mission complete".to_string(),
            Self::Stopped => "Simulation stopped".to_string(),
            Self::BatteryLow { battery } => format!("Battery low ({battery:.0}%)"),
        }
    }
}
