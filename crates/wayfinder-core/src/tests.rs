#[cfg(test)]
mod tests {
    use crate::commands::SimCommand;
    use crate::constants::*;
    use crate::enums::*;
    use crate::error::SimError;
    use crate::events::SimEvent;
    use crate::path::{Waypoint, WaypointPath};
    use crate::state::{SimSnapshot, SimulationState, WeatherReport};
    use crate::types::{normalize_degrees, LatLng};

    fn two_point_path() -> WaypointPath {
        WaypointPath::new(vec![
            Waypoint::new(1, 0.0, 0.0, 0.0, 10.0).home(),
            Waypoint::new(2, 0.0, 0.001, 50.0, 10.0),
        ])
    }

    /// Verify SimCommand round-trips through serde (tagged union).
    #[test]
    fn test_sim_command_serde() {
        let commands = vec![
            SimCommand::Start {
                waypoints: two_point_path().waypoints().to_vec(),
            },
            SimCommand::Pause,
            SimCommand::Resume,
            SimCommand::TogglePause,
            SimCommand::Stop,
            SimCommand::Reset,
            SimCommand::SetSpeed { multiplier: 2.5 },
            SimCommand::SetStepMode { enabled: true },
            SimCommand::SetTrailLength { length: 42 },
            SimCommand::UpdateWeather {
                weather: Some(WeatherReport {
                    wind_speed_ms: 7.0,
                    wind_direction_deg: 270.0,
                    description: "light rain".into(),
                    visibility_m: None,
                }),
            },
            SimCommand::UpdateWeather { weather: None },
        ];
        for cmd in &commands {
            let json = serde_json::to_string(cmd).unwrap();
            let back: SimCommand = serde_json::from_str(&json).unwrap();
            // Compare JSON representations since SimCommand doesn't derive PartialEq
            assert_eq!(json, serde_json::to_string(&back).unwrap());
        }
    }

    #[test]
    fn test_sim_command_from_frontend_json() {
        let json = r#"{"type":"SetSpeed","multiplier":4.0}"#;
        let cmd: SimCommand = serde_json::from_str(json).unwrap();
        assert!(matches!(cmd, SimCommand::SetSpeed { multiplier } if multiplier == 4.0));

        // is_home is optional on the wire
        let json = r#"{"type":"Start","waypoints":[{"id":1,"position":{"lat":1.0,"lng":2.0},"altitude":0.0,"speed":5.0}]}"#;
        let cmd: SimCommand = serde_json::from_str(json).unwrap();
        match cmd {
            SimCommand::Start { waypoints } => {
                assert_eq!(waypoints.len(), 1);
                assert!(!waypoints[0].is_home);
            }
            other => panic!("expected Start, got {other:?}"),
        }
    }

    #[test]
    fn test_sim_event_serde() {
        let events = vec![
            SimEvent::Started {
                waypoint_count: 2,
                total_distance: 111.2,
            },
            SimEvent::WaypointReached {
                index: 1,
                waypoint_id: 2,
                elapsed_time: 11.1,
            },
            SimEvent::StepPaused { index: 1 },
            SimEvent::MissionComplete {
                elapsed_time: 11.1,
                distance_traveled: 111.2,
                battery: 98.9,
            },
            SimEvent::Stopped,
            SimEvent::BatteryLow { battery: 19.9 },
        ];
        for event in &events {
            let json = serde_json::to_string(event).unwrap();
            let back: SimEvent = serde_json::from_str(&json).unwrap();
            assert_eq!(*event, back);
        }
    }

    #[test]
    fn test_event_messages() {
        assert_eq!(
            SimEvent::WaypointReached {
                index: 0,
                waypoint_id: 9,
                elapsed_time: 0.0
            }
            .message(),
            "Reached waypoint 1"
        );
        assert_eq!(
            SimEvent::BatteryLow { battery: 19.6 }.message(),
            "Battery low (20%)"
        );
    }

    #[test]
    fn test_snapshot_serde() {
        let snapshot = SimSnapshot::default();
        let json = serde_json::to_string(&snapshot).unwrap();
        let back: SimSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(snapshot.phase, back.phase);
        assert_eq!(snapshot.state, back.state);
        assert_eq!(snapshot.telemetry, back.telemetry);
        assert!(
            json.len() < 1024,
            "Empty snapshot should be <1KB, was {} bytes",
            json.len()
        );
    }

    #[test]
    fn test_error_message_is_actionable() {
        let err = SimError::InsufficientWaypoints { count: 1 };
        assert!(err.to_string().starts_with("add at least 2 waypoints"));
    }

    // ---- Geodesy ----

    #[test]
    fn test_haversine_known_distance() {
        // 0.001 deg of longitude at the equator ≈ 111.19 m
        let a = LatLng::new(0.0, 0.0);
        let b = LatLng::new(0.0, 0.001);
        let d = a.distance_to(&b);
        assert!((d - 111.19).abs() < 0.05, "distance was {d}");
        assert!((b.distance_to(&a) - d).abs() < 1e-9);
        assert_eq!(a.distance_to(&a), 0.0);
    }

    #[test]
    fn test_bearing_cardinal_directions() {
        let origin = LatLng::new(0.0, 0.0);
        let north = origin.bearing_to(&LatLng::new(1.0, 0.0));
        let east = origin.bearing_to(&LatLng::new(0.0, 1.0));
        let south = origin.bearing_to(&LatLng::new(-1.0, 0.0));
        let west = origin.bearing_to(&LatLng::new(0.0, -1.0));
        assert!(north.abs() < 1e-9, "north {north}");
        assert!((east - 90.0).abs() < 1e-9, "east {east}");
        assert!((south - 180.0).abs() < 1e-9, "south {south}");
        assert!((west - 270.0).abs() < 1e-9, "west {west}");
    }

    #[test]
    fn test_normalize_degrees() {
        assert_eq!(normalize_degrees(360.0), 0.0);
        assert_eq!(normalize_degrees(-90.0), 270.0);
        assert_eq!(normalize_degrees(725.0), 5.0);
        assert!(normalize_degrees(-1e-20) < 360.0);
    }

    #[test]
    fn test_lerp_and_offset() {
        let a = LatLng::new(10.0, 20.0);
        let b = LatLng::new(12.0, 24.0);
        assert_eq!(a.lerp(&b, 0.5), LatLng::new(11.0, 22.0));
        assert_eq!(a.lerp(&b, 0.0), a);

        let shifted = a.offset_by_meters(100.0, 0.0);
        assert!((a.distance_to(&shifted) - 100.0).abs() < 0.01);
        assert!(shifted.lat > a.lat);
    }

    // ---- Path ----

    #[test]
    fn test_path_segments_and_total() {
        let path = WaypointPath::new(vec![
            Waypoint::new(1, 0.0, 0.0, 0.0, 10.0),
            Waypoint::new(2, 0.0, 0.001, 50.0, 10.0),
            Waypoint::new(3, 0.001, 0.001, 50.0, 10.0),
        ]);
        assert_eq!(path.segment_count(), 2);
        let total = path.total_distance();
        let sum = path.segment_distance(0) + path.segment_distance(1);
        assert!((total - sum).abs() < 1e-9);
        assert!(path.segment(2).is_none());
        assert_eq!(path.segment_distance(5), 0.0);
    }

    #[test]
    fn test_path_home_fallback() {
        let path = two_point_path();
        assert_eq!(path.home().map(|w| w.id), Some(1));

        let no_home: WaypointPath = vec![
            Waypoint::new(7, 0.0, 0.0, 0.0, 1.0),
            Waypoint::new(8, 0.0, 1.0, 0.0, 1.0),
        ]
        .into();
        assert_eq!(no_home.home().map(|w| w.id), Some(7));
        assert!(WaypointPath::default().home().is_none());
    }

    // ---- State ----

    #[test]
    fn test_speed_multiplier_clamp() {
        let mut state = SimulationState::default();
        state.set_speed_multiplier(999.0);
        assert_eq!(state.speed_multiplier, MAX_SPEED_MULTIPLIER);
        state.set_speed_multiplier(0.0001);
        assert_eq!(state.speed_multiplier, MIN_SPEED_MULTIPLIER);
        state.set_speed_multiplier(f64::NAN);
        assert_eq!(state.speed_multiplier, MIN_SPEED_MULTIPLIER);
        state.set_speed_multiplier(2.0);
        assert_eq!(state.speed_multiplier, 2.0);
    }

    #[test]
    fn test_phase_activity() {
        assert!(!SimPhase::Idle.is_active());
        assert!(SimPhase::Running.is_active());
        assert!(SimPhase::Paused.is_active());
        assert_eq!(SimPhase::default(), SimPhase::Idle);
    }

    #[test]
    fn test_turbulence_factor_range() {
        for level in [
            TurbulenceLevel::Negligible,
            TurbulenceLevel::Moderate,
            TurbulenceLevel::High,
        ] {
            let f = level.factor();
            assert!((0.0..=1.0).contains(&f), "{} out of range", level.as_str());
        }
        assert!(TurbulenceLevel::High.factor() > TurbulenceLevel::Moderate.factor());
    }

    #[test]
    fn test_tick_constants() {
        assert!((FRAME_DT - 1.0 / 60.0).abs() < 1e-12);
        assert!((TELEMETRY_DT - 0.05).abs() < 1e-12);
        assert!(MIN_TRAIL_LENGTH <= DEFAULT_TRAIL_LENGTH && DEFAULT_TRAIL_LENGTH <= MAX_TRAIL_LENGTH);
    }
}
