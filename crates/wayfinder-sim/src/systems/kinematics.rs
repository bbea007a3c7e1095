//! Kinematic interpolation along the waypoint path.
//!
//! Advances the segment progress by `speed * multiplier * dt` meters and
//! blends latitude, longitude and altitude linearly between the segment
//! endpoints. A planning tool does not need geodesic interpolation for
//! segments of a few kilometres.

use wayfinder_core::constants::COINCIDENT_DISTANCE_M;
use wayfinder_core::path::WaypointPath;
use wayfinder_core::state::SimulationState;
use wayfinder_core::types::LatLng;

/// Result of advancing one frame along the current segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Advance {
    /// Interpolated position before wind drift.
    pub position: LatLng,
    pub altitude: f64,
    /// Length of the current segment (meters).
    pub segment_distance: f64,
    /// Meters requested this frame.
    pub distance_step: f64,
    /// New progress, clamped to 1.0 when the waypoint was reached.
    pub progress: f64,
    /// Bearing from the new position to the segment end (degrees).
    pub heading: f64,
    /// Index of the waypoint being flown towards.
    pub target_index: usize,
    pub reached_waypoint: bool,
}

/// Advance the active segment by `dt` seconds.
///
/// Returns `None` if the state's index does not start a segment of `path`.
/// The caller owns the index increment and progress reset when
/// `reached_waypoint` is set.
pub fn advance(path: &WaypointPath, state: &SimulationState, dt: f64) -> Option<Advance> {
    let index = state.current_waypoint_index;
    let segment = path.segment(index)?;
    let segment_distance = segment.distance();

    let distance_step = segment.to.speed.max(0.0) * state.speed_multiplier * dt.max(0.0);

    // Coincident waypoints are reached immediately
    if segment_distance < COINCIDENT_DISTANCE_M {
        return Some(arrived(segment_distance, distance_step, segment.bearing(), index, path));
    }

    let progress = state.progress + distance_step / segment_distance;
    if progress >= 1.0 {
        return Some(arrived(segment_distance, distance_step, segment.bearing(), index, path));
    }

    let position = segment.from.position.lerp(&segment.to.position, progress);
    let altitude = lerp(segment.from.altitude, segment.to.altitude, progress);
    let heading = heading_towards(&position, &segment.to.position, segment.bearing());

    Some(Advance {
        position,
        altitude,
        segment_distance,
        distance_step,
        progress,
        heading,
        target_index: index + 1,
        reached_waypoint: false,
    })
}

/// Bearing from `from` to `to`, or `fallback` when the two coincide.
pub fn heading_towards(from: &LatLng, to: &LatLng, fallback: f64) -> f64 {
    if from.distance_to(to) < COINCIDENT_DISTANCE_M {
        fallback
    } else {
        from.bearing_to(to)
    }
}

fn arrived(
    segment_distance: f64,
    distance_step: f64,
    bearing: f64,
    index: usize,
    path: &WaypointPath,
) -> Advance {
    // segment() succeeded for `index`, so index + 1 exists
    let (position, altitude) = path
        .get(index + 1)
        .map(|w| (w.position, w.altitude))
        .unwrap_or_default();
    Advance {
        position,
        altitude,
        segment_distance,
        distance_step,
        progress: 1.0,
        heading: bearing,
        target_index: index + 1,
        reached_waypoint: true,
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}
