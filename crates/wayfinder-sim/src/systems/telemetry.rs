//! Telemetry derivation: heading, ground speed, distance/time to waypoint and battery.

use wayfinder_core::constants::{BATTERY_FULL, GROUND_SPEED_EPSILON};
use wayfinder_core::path::WaypointPath;
use wayfinder_core::state::{DroneTelemetry, SimulationState, WeatherEffect};

use crate::systems::kinematics::Advance;
use crate::systems::wind::{self, Drift};

/// Telemetry at the start of the path: drone sitting on waypoint[0].
pub fn initial(
    path: &WaypointPath,
    speed_multiplier: f64,
    effect: &WeatherEffect,
    damping: f64,
) -> DroneTelemetry {
    let Some(segment) = path.segment(0) else {
        return DroneTelemetry::default();
    };

    let speed = segment.to.speed.max(0.0) * speed_multiplier;
    let ground_speed = wind::ground_speed(speed, effect, damping);
    let distance = segment.distance();

    DroneTelemetry {
        position: segment.from.position,
        altitude: segment.from.altitude,
        speed,
        heading: segment.bearing(),
        battery: BATTERY_FULL,
        ground_speed,
        wind_speed: effect.wind_speed,
        wind_direction: effect.wind_direction,
        distance_to_waypoint: distance,
        time_to_waypoint: time_to_cover(distance, ground_speed),
    }
}

/// Telemetry for a frame, from the raw advance and the wind-perturbed position.
pub fn derive(
    advance: &Advance,
    drift: &Drift,
    effect: &WeatherEffect,
    path: &WaypointPath,
    state: &SimulationState,
    battery: f64,
    damping: f64,
) -> DroneTelemetry {
    let target_speed = path
        .get(advance.target_index)
        .map_or(0.0, |w| w.speed.max(0.0));
    let speed = target_speed * state.speed_multiplier;
    let ground_speed = wind::ground_speed(speed, effect, damping);
    let distance_to_waypoint = advance.segment_distance * (1.0 - advance.progress.clamp(0.0, 1.0));

    DroneTelemetry {
        position: drift.position,
        altitude: advance.altitude,
        speed,
        heading: advance.heading,
        battery,
        ground_speed,
        wind_speed: effect.wind_speed,
        wind_direction: effect.wind_direction,
        distance_to_waypoint,
        time_to_waypoint: time_to_cover(distance_to_waypoint, ground_speed),
    }
}

/// Re-derive the wind-dependent fields after the weather changed.
///
/// Position, air speed and distance are kept; ground speed and time to the
/// waypoint follow the new wind.
pub fn apply_weather(telemetry: &mut DroneTelemetry, effect: &WeatherEffect, damping: f64) {
    telemetry.wind_speed = effect.wind_speed;
    telemetry.wind_direction = effect.wind_direction;
    telemetry.ground_speed = wind::ground_speed(telemetry.speed, effect, damping);
    telemetry.time_to_waypoint = time_to_cover(telemetry.distance_to_waypoint, telemetry.ground_speed);
}

/// Battery after one fixed-rate tick, floored at zero.
///
/// `rate_per_sec` is a fraction of capacity; the battery is in percent.
pub fn drain_battery(battery: f64, rate_per_sec: f64, speed_multiplier: f64, interval_secs: f64) -> f64 {
    let drain = rate_per_sec * BATTERY_FULL * speed_multiplier * interval_secs;
    (battery - drain.max(0.0)).max(0.0)
}

/// Seconds to finish the path, `None` when the ground speed is ~0.
pub fn estimated_time_remaining(total_distance: f64, distance_traveled: f64, ground_speed: f64) -> Option<f64> {
    time_to_cover((total_distance - distance_traveled).max(0.0), ground_speed)
}

fn time_to_cover(distance: f64, ground_speed: f64) -> Option<f64> {
    if ground_speed < GROUND_SPEED_EPSILON {
        None
    } else {
        Some(distance / ground_speed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wayfinder_core::path::Waypoint;
    use wayfinder_core::state::WeatherReport;
    use wayfinder_core::types::LatLng;

    fn path() -> WaypointPath {
        WaypointPath::new(vec![
            Waypoint::new(1, 0.0, 0.0, 10.0, 8.0).home(),
            Waypoint::new(2, 0.0, 0.001, 50.0, 10.0),
        ])
    }

    fn advance_at(progress: f64, segment_distance: f64) -> Advance {
        Advance {
            position: LatLng::new(0.0, 0.0005),
            altitude: 30.0,
            segment_distance,
            distance_step: 0.1,
            progress,
            heading: 90.0,
            target_index: 1,
            reached_waypoint: false,
        }
    }

    fn no_drift(position: LatLng) -> Drift {
        Drift {
            offset_north_m: 0.0,
            offset_east_m: 0.0,
            position,
        }
    }

    #[test]
    fn test_initial_sits_on_first_waypoint() {
        let path = path();
        let t = initial(&path, 2.0, &WeatherEffect::default(), 0.1);
        assert_eq!(t.position, LatLng::new(0.0, 0.0));
        assert_eq!(t.altitude, 10.0);
        assert_eq!(t.speed, 20.0);
        assert_eq!(t.battery, BATTERY_FULL);
        assert!((t.heading - 90.0).abs() < 1e-6);
        assert!((t.distance_to_waypoint - path.segment_distance(0)).abs() < 1e-9);
        assert!(t.time_to_waypoint.is_some());
    }

    #[test]
    fn test_initial_on_short_path_is_default() {
        let single = WaypointPath::new(vec![Waypoint::new(1, 0.0, 0.0, 0.0, 1.0)]);
        assert_eq!(initial(&single, 1.0, &WeatherEffect::default(), 0.1), DroneTelemetry::default());
    }

    #[test]
    fn test_distance_to_waypoint_follows_progress() {
        let adv = advance_at(0.25, 200.0);
        let state = SimulationState::default();
        let t = derive(&adv, &no_drift(adv.position), &WeatherEffect::default(), &path(), &state, 90.0, 0.1);
        assert!((t.distance_to_waypoint - 150.0).abs() < 1e-9);
        assert_eq!(t.ground_speed, 10.0);
        assert_eq!(t.time_to_waypoint, Some(15.0));
        assert_eq!(t.battery, 90.0);
    }

    #[test]
    fn test_drifted_position_reported() {
        let adv = advance_at(0.5, 100.0);
        let drifted = LatLng::new(0.0001, 0.0005);
        let t = derive(&adv, &no_drift(drifted), &WeatherEffect::default(), &path(), &SimulationState::default(), 100.0, 0.1);
        assert_eq!(t.position, drifted);
        assert_eq!(t.altitude, 30.0);
    }

    #[test]
    fn test_zero_ground_speed_gives_unknown_time() {
        let adv = advance_at(0.5, 100.0);
        let gale = wind::compute_effect(Some(&WeatherReport {
            wind_speed_ms: 500.0,
            wind_direction_deg: 0.0,
            description: String::new(),
            visibility_m: None,
        }));
        let t = derive(&adv, &no_drift(adv.position), &gale, &path(), &SimulationState::default(), 100.0, 0.1);
        assert_eq!(t.ground_speed, 0.0);
        assert_eq!(t.time_to_waypoint, None);
        assert_eq!(t.wind_speed, 500.0);
    }

    #[test]
    fn test_apply_weather_rederives_ground_speed() {
        let path = path();
        let mut t = initial(&path, 1.0, &WeatherEffect::default(), 0.1);
        let distance = t.distance_to_waypoint;
        let windy = wind::compute_effect(Some(&WeatherReport {
            wind_speed_ms: 50.0,
            wind_direction_deg: 90.0,
            description: String::new(),
            visibility_m: None,
        }));

        apply_weather(&mut t, &windy, 0.1);
        assert_eq!(t.wind_speed, 50.0);
        assert_eq!(t.wind_direction, 90.0);
        assert!((t.ground_speed - 5.0).abs() < 1e-9);
        assert_eq!(t.distance_to_waypoint, distance);
        assert!((t.time_to_waypoint.unwrap() - distance / 5.0).abs() < 1e-9);

        apply_weather(&mut t, &WeatherEffect::default(), 0.1);
        assert_eq!(t.ground_speed, t.speed);
    }

    #[test]
    fn test_battery_drain() {
        // 0.001/s at 1x over 50 ms = 0.005 %
        let b = drain_battery(100.0, 0.001, 1.0, 0.05);
        assert!((b - 99.995).abs() < 1e-9);
        let fast = drain_battery(100.0, 0.001, 10.0, 0.05);
        assert!((fast - 99.95).abs() < 1e-9);
        assert_eq!(drain_battery(0.001, 0.001, 10.0, 1.0), 0.0);
    }

    #[test]
    fn test_estimated_time_remaining() {
        assert_eq!(estimated_time_remaining(300.0, 100.0, 10.0), Some(20.0));
        assert_eq!(estimated_time_remaining(300.0, 100.0, 0.0), None);
        assert_eq!(estimated_time_remaining(100.0, 150.0, 5.0), Some(0.0));
    }
}
