//! mission-replay: fly a mission file headless and print what happened.
//!
//! Usage:
//!   mission-replay run --mission survey.json [--speed 4] [--max-seconds 3600]
//!   mission-replay sample > survey.json
//!
//! Every event is printed to stdout as one JSON line, followed by a summary line.

use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use wayfinder_core::enums::SimPhase;
use wayfinder_core::events::SimEvent;
use wayfinder_core::path::Waypoint;
use wayfinder_core::state::WeatherReport;
use wayfinder_sim::clock::ManualClock;
use wayfinder_sim::config::SimConfig;
use wayfinder_sim::MissionSimulator;

/// A mission file: the path plus optional weather and simulator settings.
#[derive(Debug, Serialize, Deserialize)]
struct MissionFile {
    waypoints: Vec<Waypoint>,
    #[serde(default)]
    weather: Option<WeatherReport>,
    #[serde(default)]
    config: SimConfig,
}

#[derive(Debug, Serialize)]
struct ReplaySummary {
    waypoints: usize,
    completed: bool,
    elapsed_time: f64,
    distance_traveled: f64,
    total_distance: f64,
    battery: f64,
    frame_ticks: u64,
    telemetry_ticks: u64,
    trail_points: usize,
}

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    match args[1].as_str() {
        "run" => cmd_run(&args[2..]),
        "sample" => cmd_sample(),
        "help" | "--help" | "-h" => print_usage(),
        other => {
            eprintln!("Unknown command: {other}");
            print_usage();
            process::exit(1);
        }
    }
}

fn print_usage() {
    eprintln!(
        "mission-replay: run a waypoint mission without a renderer\n\
         \n\
         Commands:\n\
         \n\
         run       Fly a mission file to completion\n\
         \n\
           --mission <path>     Mission JSON (waypoints, optional weather and config)\n\
           --speed <x>          Override the speed multiplier (0.1 to 10)\n\
           --max-seconds <N>    Give up after N seconds of driver time (default: 3600)\n\
         \n\
         sample    Print an example mission file\n\
         \n\
         Examples:\n\
         \n\
           mission-replay sample > survey.json\n\
           mission-replay run --mission survey.json --speed 10\n"
    );
}

fn parse_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    for i in 0..args.len() {
        if args[i] == flag && i + 1 < args.len() {
            return Some(&args[i + 1]);
        }
    }
    None
}

fn parse_f64(args: &[String], flag: &str) -> Option<f64> {
    let raw = parse_value(args, flag)?;
    match raw.parse::<f64>() {
        Ok(v) => Some(v),
        Err(_) => {
            eprintln!("Error: {flag} expects a number, got '{raw}'");
            process::exit(1);
        }
    }
}

fn load_mission(path: &Path) -> MissionFile {
    let json = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading {}: {e}", path.display());
            process::exit(1);
        }
    };
    match serde_json::from_str(&json) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("Error parsing {}: {e}", path.display());
            process::exit(1);
        }
    }
}

fn print_json(value: &impl Serialize) {
    match serde_json::to_string(value) {
        Ok(line) => println!("{line}"),
        Err(e) => eprintln!("Error encoding output: {e}"),
    }
}

// --- Run command ---

fn cmd_run(args: &[String]) {
    let mission_path = match parse_value(args, "--mission") {
        Some(p) => PathBuf::from(p),
        None => {
            eprintln!("Error: --mission <path> is required");
            process::exit(1);
        }
    };
    let max_seconds = parse_f64(args, "--max-seconds").unwrap_or(3600.0).max(0.0);

    let mission = load_mission(&mission_path);
    let waypoint_count = mission.waypoints.len();

    let clock = ManualClock::new();
    let mut sim = MissionSimulator::with_clock(mission.config, clock.clone());
    if let Some(speed) = parse_f64(args, "--speed") {
        sim.set_speed(speed);
    }
    sim.set_weather(mission.weather);

    if let Err(e) = sim.start(mission.waypoints) {
        eprintln!("Error: {e}");
        process::exit(1);
    }

    // Step the clock one frame interval at a time so both drivers keep their rates
    let step = sim.config().frame_interval();
    let limit = Duration::from_secs_f64(max_seconds);
    let mut driven = Duration::ZERO;
    let mut completed = false;

    while sim.phase().is_active() && driven < limit {
        clock.advance(step);
        driven += step;
        sim.pump();

        for event in sim.take_events() {
            print_json(&event);
            match event {
                SimEvent::MissionComplete { .. } => completed = true,
                // Nobody is at the controls to press resume
                SimEvent::StepPaused { .. } => sim.resume(),
                _ => {}
            }
        }
    }

    if sim.phase() != SimPhase::Idle {
        tracing::warn!(
            seconds = driven.as_secs_f64(),
            "mission did not finish within the time limit"
        );
    }

    let state = sim.state();
    let time = sim.time();
    print_json(&ReplaySummary {
        waypoints: waypoint_count,
        completed,
        elapsed_time: state.elapsed_time,
        distance_traveled: state.distance_traveled,
        total_distance: state.total_distance,
        battery: sim.telemetry().battery,
        frame_ticks: time.frame_tick,
        telemetry_ticks: time.telemetry_tick,
        trail_points: sim.trail().len(),
    });

    if !completed {
        process::exit(2);
    }
}

// --- Sample command ---

fn cmd_sample() {
    let mission = MissionFile {
        waypoints: vec![
            Waypoint::new(1, 47.3769, 8.5417, 0.0, 12.0).home(),
            Waypoint::new(2, 47.3790, 8.5440, 60.0, 12.0),
            Waypoint::new(3, 47.3805, 8.5402, 80.0, 15.0),
            Waypoint::new(4, 47.3772, 8.5385, 40.0, 10.0),
        ],
        weather: Some(WeatherReport {
            wind_speed_ms: 6.5,
            wind_direction_deg: 240.0,
            description: "light rain".into(),
            visibility_m: Some(8000.0),
        }),
        config: SimConfig::default(),
    };
    match serde_json::to_string_pretty(&mission) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("Error encoding sample: {e}");
            process::exit(1);
        }
    }
}
