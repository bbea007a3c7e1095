//! Snapshot system: copies the simulator state into a `SimSnapshot`.
//!
//! This system is read-only. Renderers receive owned copies, so nothing they
//! do can race the next tick's writes.

use wayfinder_core::enums::SimPhase;
use wayfinder_core::events::SimEvent;
use wayfinder_core::state::{DroneTelemetry, SimSnapshot, SimulationState, WeatherEffect};
use wayfinder_core::types::SimTime;

use crate::trail::TrailBuffer;

/// Build a complete snapshot from the current simulator state.
pub fn build_snapshot(
    time: &SimTime,
    phase: SimPhase,
    state: &SimulationState,
    telemetry: &DroneTelemetry,
    trail: &TrailBuffer,
    weather: &WeatherEffect,
    events: Vec<SimEvent>,
) -> SimSnapshot {
    SimSnapshot {
        time: *time,
        phase,
        state: state.clone(),
        telemetry: telemetry.clone(),
        trail: trail.to_vec(),
        trail_max_length: trail.capacity(),
        weather: weather.clone(),
        events,
    }
}
