//! Simulation state, telemetry and the snapshot handed to renderers each tick.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::constants::{
    BATTERY_FULL, DEFAULT_VISIBILITY_M, MAX_SPEED_MULTIPLIER, MIN_SPEED_MULTIPLIER,
};
use crate::enums::{SimPhase, TurbulenceLevel};
use crate::events::SimEvent;
use crate::types::{LatLng, SimTime};

/// Progress bookkeeping for the current run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationState {
    pub is_active: bool,
    pub is_paused: bool,
    /// Start index of the segment being flown.
    pub current_waypoint_index: usize,
    /// Fraction of the current segment flown, [0, 1).
    pub progress: f64,
    pub speed_multiplier: f64,
    /// Simulated flight time in seconds.
    pub elapsed_time: f64,
    /// Meters flown along the path.
    pub distance_traveled: f64,
    /// Length of the whole path in meters.
    pub total_distance: f64,
    /// Seconds to finish the path; `None` when ground speed is ~0.
    pub estimated_time_remaining: Option<f64>,
    pub step_mode: bool,
}

impl Default for SimulationState {
    fn default() -> Self {
        Self {
            is_active: false,
            is_paused: false,
            current_waypoint_index: 0,
            progress: 0.0,
            speed_multiplier: 1.0,
            elapsed_time: 0.0,
            distance_traveled: 0.0,
            total_distance: 0.0,
            estimated_time_remaining: None,
            step_mode: false,
        }
    }
}

impl SimulationState {
    /// Store a multiplier clamped to the allowed range. Non-finite input is ignored.
    pub fn set_speed_multiplier(&mut self, multiplier: f64) {
        if multiplier.is_finite() {
            self.speed_multiplier = multiplier.clamp(MIN_SPEED_MULTIPLIER, MAX_SPEED_MULTIPLIER);
        }
    }

    /// Zero the per-run counters, keeping user preferences.
    pub fn rewind(&mut self) {
        self.current_waypoint_index = 0;
        self.progress = 0.0;
        self.elapsed_time = 0.0;
        self.distance_traveled = 0.0;
    }
}

/// Instantaneous derived flight state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DroneTelemetry {
    /// Interpolated position plus wind drift.
    pub position: LatLng,
    /// Meters.
    pub altitude: f64,
    /// Commanded air speed, scaled by the multiplier (m/s).
    pub speed: f64,
    /// Degrees, [0, 360), 0 = North.
    pub heading: f64,
    /// Percent, [0, 100].
    pub battery: f64,
    pub ground_speed: f64,
    pub wind_speed: f64,
    pub wind_direction: f64,
    /// Meters to the active target waypoint.
    pub distance_to_waypoint: f64,
    /// Seconds to the active target; `None` when ground speed is ~0.
    pub time_to_waypoint: Option<f64>,
}

impl Default for DroneTelemetry {
    fn default() -> Self {
        Self {
            position: LatLng::default(),
            altitude: 0.0,
            speed: 0.0,
            heading: 0.0,
            battery: BATTERY_FULL,
            ground_speed: 0.0,
            wind_speed: 0.0,
            wind_direction: 0.0,
            distance_to_waypoint: 0.0,
            time_to_waypoint: None,
        }
    }
}

/// One recorded trail position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrailPoint {
    pub position: LatLng,
    pub altitude: f64,
    pub heading: f64,
    /// Simulated time of the sample (seconds since start).
    pub timestamp: f64,
}

/// Ambient weather as delivered by the weather collaborator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub wind_speed_ms: f64,
    /// Compass bearing in degrees.
    pub wind_direction_deg: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub visibility_m: Option<f64>,
}

/// Flight-relevant effect of the ambient weather.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherEffect {
    /// x = northward, y = eastward component (m/s).
    pub wind_vector: DVec2,
    pub wind_speed: f64,
    pub wind_direction: f64,
    /// Meters.
    pub visibility: f64,
    pub precipitation: bool,
    /// [0, 1]; advisory only.
    pub turbulence: f64,
    pub turbulence_level: TurbulenceLevel,
}

impl Default for WeatherEffect {
    fn default() -> Self {
        Self {
            wind_vector: DVec2::ZERO,
            wind_speed: 0.0,
            wind_direction: 0.0,
            visibility: DEFAULT_VISIBILITY_M,
            precipitation: false,
            turbulence: 0.0,
            turbulence_level: TurbulenceLevel::Negligible,
        }
    }
}

impl WeatherEffect {
    /// Wind magnitude in m/s.
    pub fn wind_magnitude(&self) -> f64 {
        self.wind_vector.length()
    }
}

/// Complete read-only view handed to renderers after a tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimSnapshot {
    pub time: SimTime,
    pub phase: SimPhase,
    pub state: SimulationState,
    pub telemetry: DroneTelemetry,
    /// Oldest first.
    pub trail: Vec<TrailPoint>,
    pub trail_max_length: usize,
    pub weather: WeatherEffect,
    pub events: Vec<SimEvent>,
}
