//! Mission simulator: the scheduler that owns all simulation state.
//!
//! `MissionSimulator` holds the frozen waypoint path, the run state, the
//! current telemetry and the trail. Two interval drivers (frame, telemetry)
//! are fed by an injected `Clock`; hosts call `pump()` from their animation
//! loop, or call `frame_tick`/`telemetry_tick` directly. Completely headless,
//! enabling deterministic testing.

use std::time::Duration;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use wayfinder_core::commands::SimCommand;
use wayfinder_core::constants::{BATTERY_FULL, BATTERY_LOW_THRESHOLD, MAX_CATCH_UP_SECS};
use wayfinder_core::enums::SimPhase;
use wayfinder_core::error::SimError;
use wayfinder_core::events::SimEvent;
use wayfinder_core::path::WaypointPath;
use wayfinder_core::state::{
    DroneTelemetry, SimSnapshot, SimulationState, TrailPoint, WeatherEffect, WeatherReport,
};
use wayfinder_core::types::SimTime;

use crate::clock::{Clock, IntervalDriver, SystemClock};
use crate::config::SimConfig;
use crate::systems;
use crate::trail::TrailBuffer;

/// Which driver fired during a `pump()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DriverKind {
    Frame,
    Telemetry,
}

/// The simulation scheduler. Owns the path, state, telemetry and trail.
pub struct MissionSimulator {
    config: SimConfig,
    clock: Box<dyn Clock>,
    path: WaypointPath,
    phase: SimPhase,
    state: SimulationState,
    telemetry: DroneTelemetry,
    trail: TrailBuffer,
    weather_report: Option<WeatherReport>,
    weather: WeatherEffect,
    time: SimTime,
    rng: ChaCha8Rng,
    frame_driver: IntervalDriver,
    telemetry_driver: IntervalDriver,
    events: Vec<SimEvent>,
    battery_low_raised: bool,
}

impl MissionSimulator {
    /// Create a simulator driven by the system clock.
    pub fn new(config: SimConfig) -> Self {
        Self::with_clock(config, SystemClock::new())
    }

    /// Create a simulator driven by the given clock.
    pub fn with_clock(config: SimConfig, clock: impl Clock + 'static) -> Self {
        let config = config.normalized();
        let max_lag = Duration::from_secs_f64(MAX_CATCH_UP_SECS);
        let state = SimulationState {
            speed_multiplier: config.speed_multiplier,
            step_mode: config.step_mode,
            ..Default::default()
        };

        Self {
            clock: Box::new(clock),
            path: WaypointPath::default(),
            phase: SimPhase::Idle,
            state,
            telemetry: DroneTelemetry::default(),
            trail: TrailBuffer::new(config.trail_max_length),
            weather_report: None,
            weather: WeatherEffect::default(),
            time: SimTime::default(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            frame_driver: IntervalDriver::new(config.frame_interval(), max_lag),
            telemetry_driver: IntervalDriver::new(config.telemetry_interval(), max_lag),
            events: Vec::new(),
            battery_low_raised: false,
            config,
        }
    }

    // --- Lifecycle ---

    /// Start a run over `path`. Restarts if a run is already active.
    ///
    /// Rejects paths with fewer than two waypoints without touching any state.
    pub fn start(&mut self, path: impl Into<WaypointPath>) -> Result<(), SimError> {
        let path = path.into();
        if path.len() < 2 {
            warn!(count = path.len(), "refusing to start simulation");
            return Err(SimError::InsufficientWaypoints { count: path.len() });
        }

        self.cancel_drivers();
        self.path = path;
        self.weather = systems::wind::compute_effect(self.weather_report.as_ref());
        self.rng = ChaCha8Rng::seed_from_u64(self.config.seed);
        self.time = SimTime::default();

        self.state.rewind();
        self.state.is_active = true;
        self.state.is_paused = false;
        self.state.total_distance = self.path.total_distance();
        self.restart_telemetry(BATTERY_FULL);
        self.battery_low_raised = false;
        self.trail.clear();

        self.phase = SimPhase::Running;
        self.arm_drivers();

        info!(
            waypoints = self.path.len(),
            total_distance = self.state.total_distance,
            "simulation started"
        );
        self.events.push(SimEvent::Started {
            waypoint_count: self.path.len(),
            total_distance: self.state.total_distance,
        });
        Ok(())
    }

    /// Freeze a running simulation. No-op in any other phase.
    pub fn pause(&mut self) {
        if self.phase == SimPhase::Running {
            self.enter_paused();
        }
    }

    /// Continue a paused simulation from its frozen state.
    pub fn resume(&mut self) {
        if self.phase == SimPhase::Paused {
            self.phase = SimPhase::Running;
            self.state.is_paused = false;
            self.arm_drivers();
            debug!("simulation resumed");
        }
    }

    /// Pause if running, resume if paused.
    pub fn toggle_pause(&mut self) {
        match self.phase {
            SimPhase::Running => self.pause(),
            SimPhase::Paused => self.resume(),
            SimPhase::Idle => {}
        }
    }

    /// End the run. Keeps the speed multiplier and step mode.
    pub fn stop(&mut self) {
        if !self.phase.is_active() {
            return;
        }

        self.cancel_drivers();
        self.phase = SimPhase::Idle;
        self.state.is_active = false;
        self.state.is_paused = false;
        self.state.rewind();
        self.state.estimated_time_remaining = None;
        self.trail.clear();

        info!("simulation stopped");
        self.events.push(SimEvent::Stopped);
    }

    /// Rewind the active run to waypoint 0 without leaving Running/Paused.
    ///
    /// The battery keeps its level; only `start()` begins with a full one.
    pub fn reset(&mut self) {
        if !self.phase.is_active() {
            return;
        }

        self.state.rewind();
        self.restart_telemetry(self.telemetry.battery);
        self.trail.clear();
        debug!("simulation reset");
    }

    // --- Preferences ---

    /// Set the speed multiplier, clamped to [0.1, 10]. Applies from the next tick.
    pub fn set_speed(&mut self, multiplier: f64) {
        self.state.set_speed_multiplier(multiplier);
    }

    /// Auto-pause at every intermediate waypoint from now on.
    pub fn set_step_mode(&mut self, enabled: bool) {
        self.state.step_mode = enabled;
    }

    /// Change the trail capacity, clamped to [10, 500].
    pub fn set_trail_length(&mut self, length: usize) {
        self.trail.set_capacity(length);
    }

    /// Replace the ambient weather and recompute its effect.
    ///
    /// Wind-dependent telemetry and the ETA are re-derived at once, so a paused
    /// run shows the new ground speed without waiting for a tick.
    pub fn set_weather(&mut self, report: Option<WeatherReport>) {
        self.weather = systems::wind::compute_effect(report.as_ref());
        self.weather_report = report;
        systems::telemetry::apply_weather(
            &mut self.telemetry,
            &self.weather,
            self.config.wind_damping,
        );
        if self.phase.is_active() {
            self.state.estimated_time_remaining = systems::telemetry::estimated_time_remaining(
                self.state.total_distance,
                self.state.distance_traveled,
                self.telemetry.ground_speed,
            );
        }
    }

    /// Apply a command from the UI layer.
    pub fn handle_command(&mut self, command: SimCommand) -> Result<(), SimError> {
        match command {
            SimCommand::Start { waypoints } => return self.start(waypoints),
            SimCommand::Pause => self.pause(),
            SimCommand::Resume => self.resume(),
            SimCommand::TogglePause => self.toggle_pause(),
            SimCommand::Stop => self.stop(),
            SimCommand::Reset => self.reset(),
            SimCommand::SetSpeed { multiplier } => self.set_speed(multiplier),
            SimCommand::SetStepMode { enabled } => self.set_step_mode(enabled),
            SimCommand::SetTrailLength { length } => self.set_trail_length(length),
            SimCommand::UpdateWeather { weather } => self.set_weather(weather),
        }
        Ok(())
    }

    // --- Ticking ---

    /// Fire every driver tick that is due on the clock, in due-time order.
    ///
    /// Returns the number of ticks run. A tick that pauses or ends the run
    /// cancels both drivers, so no queued tick runs after it.
    pub fn pump(&mut self) -> usize {
        let now = self.clock.now();
        let frame_dt = self.frame_driver.interval().as_secs_f64();
        let mut fired = 0;

        while let Some(kind) = self.next_due_driver(now) {
            match kind {
                DriverKind::Frame => {
                    self.frame_driver.complete_tick(now);
                    self.frame_tick(frame_dt);
                }
                DriverKind::Telemetry => {
                    self.telemetry_driver.complete_tick(now);
                    self.telemetry_tick();
                }
            }
            fired += 1;
        }
        fired
    }

    /// Advance the drone by `dt` seconds of wall-clock time.
    ///
    /// Returns false without doing anything unless the phase is Running.
    pub fn frame_tick(&mut self, dt: f64) -> bool {
        if self.phase != SimPhase::Running {
            return false;
        }

        let Some(advance) = systems::kinematics::advance(&self.path, &self.state, dt) else {
            warn!(
                index = self.state.current_waypoint_index,
                "no segment at waypoint index, ending run"
            );
            self.complete_mission();
            return true;
        };

        self.time.frame_tick += 1;
        self.state.elapsed_time += dt.max(0.0) * self.state.speed_multiplier;

        // 1. Distance bookkeeping (never past the end of the segment)
        let remaining = advance.segment_distance * (1.0 - self.state.progress).max(0.0);
        self.state.distance_traveled = (self.state.distance_traveled
            + advance.distance_step.min(remaining))
        .min(self.state.total_distance);

        // 2. Wind drift
        let gust = systems::wind::gust_factor(&mut self.rng);
        let drift = systems::wind::apply_drift(
            advance.position,
            &self.weather,
            self.config.drift_scale,
            gust,
        );

        // 3. Telemetry
        self.telemetry = systems::telemetry::derive(
            &advance,
            &drift,
            &self.weather,
            &self.path,
            &self.state,
            self.telemetry.battery,
            self.config.wind_damping,
        );

        // 4. Trail
        self.trail.push(TrailPoint {
            position: self.telemetry.position,
            altitude: self.telemetry.altitude,
            heading: self.telemetry.heading,
            timestamp: self.state.elapsed_time,
        });

        // 5. Waypoint arrival
        if advance.reached_waypoint {
            self.state.current_waypoint_index += 1;
            self.state.progress = 0.0;
            self.on_waypoint_reached();
        } else {
            self.state.progress = advance.progress;
        }
        true
    }

    /// Fixed-rate update: battery drain and time remaining. Running only.
    pub fn telemetry_tick(&mut self) -> bool {
        if self.phase != SimPhase::Running {
            return false;
        }

        self.time.telemetry_tick += 1;
        let interval = self.telemetry_driver.interval().as_secs_f64();
        self.telemetry.battery = systems::telemetry::drain_battery(
            self.telemetry.battery,
            self.config.battery_drain_per_sec,
            self.state.speed_multiplier,
            interval,
        );
        self.state.estimated_time_remaining = systems::telemetry::estimated_time_remaining(
            self.state.total_distance,
            self.state.distance_traveled,
            self.telemetry.ground_speed,
        );

        if !self.battery_low_raised && self.telemetry.battery <= BATTERY_LOW_THRESHOLD {
            self.battery_low_raised = true;
            warn!(battery = self.telemetry.battery, "battery low");
            self.events.push(SimEvent::BatteryLow {
                battery: self.telemetry.battery,
            });
        }
        true
    }

    // --- Read access ---

    /// Current lifecycle phase.
    pub fn phase(&self) -> SimPhase {
        self.phase
    }

    /// Progress bookkeeping for the current (or last) run.
    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    /// Latest derived telemetry.
    pub fn telemetry(&self) -> &DroneTelemetry {
        &self.telemetry
    }

    /// Recent positions, oldest first.
    pub fn trail(&self) -> &TrailBuffer {
        &self.trail
    }

    /// Effect of the current weather report (calm when there is none).
    pub fn weather(&self) -> &WeatherEffect {
        &self.weather
    }

    /// The path frozen at the last `start()`.
    pub fn path(&self) -> &WaypointPath {
        &self.path
    }

    /// Tick counters since the last `start()`.
    pub fn time(&self) -> SimTime {
        self.time
    }

    /// The normalized configuration in use.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Events emitted since the last `take_events`/`take_snapshot`.
    pub fn pending_events(&self) -> &[SimEvent] {
        &self.events
    }

    /// Whether either driver is currently scheduled.
    pub fn drivers_armed(&self) -> bool {
        self.frame_driver.is_armed() || self.telemetry_driver.is_armed()
    }

    /// Drain the pending events.
    pub fn take_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    /// Snapshot without draining pending events.
    pub fn snapshot(&self) -> SimSnapshot {
        self.build_snapshot(Vec::new())
    }

    /// Snapshot carrying (and draining) every pending event.
    pub fn take_snapshot(&mut self) -> SimSnapshot {
        let events = self.take_events();
        self.build_snapshot(events)
    }

    // --- Internals ---

    fn build_snapshot(&self, events: Vec<SimEvent>) -> SimSnapshot {
        systems::snapshot::build_snapshot(
            &self.time,
            self.phase,
            &self.state,
            &self.telemetry,
            &self.trail,
            &self.weather,
            events,
        )
    }

    fn on_waypoint_reached(&mut self) {
        let index = self.state.current_waypoint_index;
        let waypoint_id = self.path.get(index).map_or(0, |w| w.id);
        debug!(index, waypoint_id, "waypoint reached");
        self.events.push(SimEvent::WaypointReached {
            index,
            waypoint_id,
            elapsed_time: self.state.elapsed_time,
        });

        if index + 1 >= self.path.len() {
            self.complete_mission();
        } else if self.state.step_mode {
            self.enter_paused();
            self.events.push(SimEvent::StepPaused { index });
        }
    }

    /// Running -> Idle after the final waypoint. Final state, telemetry and
    /// trail stay in place for display until the next start.
    fn complete_mission(&mut self) {
        self.cancel_drivers();
        self.phase = SimPhase::Idle;
        self.state.is_active = false;
        self.state.is_paused = false;
        self.state.progress = 0.0;
        self.state.distance_traveled = self.state.total_distance;
        self.state.estimated_time_remaining = Some(0.0);
        self.telemetry.distance_to_waypoint = 0.0;
        self.telemetry.time_to_waypoint = Some(0.0);

        info!(
            elapsed_time = self.state.elapsed_time,
            battery = self.telemetry.battery,
            "mission complete"
        );
        self.events.push(SimEvent::MissionComplete {
            elapsed_time: self.state.elapsed_time,
            distance_traveled: self.state.distance_traveled,
            battery: self.telemetry.battery,
        });
    }

    fn enter_paused(&mut self) {
        self.cancel_drivers();
        self.phase = SimPhase::Paused;
        self.state.is_paused = true;
        debug!("simulation paused");
    }

    /// Telemetry back on waypoint 0 with the given battery level.
    fn restart_telemetry(&mut self, battery: f64) {
        self.telemetry = systems::telemetry::initial(
            &self.path,
            self.state.speed_multiplier,
            &self.weather,
            self.config.wind_damping,
        );
        self.telemetry.battery = battery;
        self.state.estimated_time_remaining = systems::telemetry::estimated_time_remaining(
            self.state.total_distance,
            self.state.distance_traveled,
            self.telemetry.ground_speed,
        );
    }

    fn arm_drivers(&mut self) {
        let now = self.clock.now();
        self.frame_driver.arm(now);
        self.telemetry_driver.arm(now);
    }

    fn cancel_drivers(&mut self) {
        self.frame_driver.cancel();
        self.telemetry_driver.cancel();
    }

    /// The due driver with the earliest deadline; frame wins ties.
    fn next_due_driver(&self, now: Duration) -> Option<DriverKind> {
        let frame = self
            .frame_driver
            .next_due()
            .filter(|_| self.frame_driver.is_due(now));
        let telemetry = self
            .telemetry_driver
            .next_due()
            .filter(|_| self.telemetry_driver.is_due(now));

        match (frame, telemetry) {
            (Some(f), Some(t)) if t < f => Some(DriverKind::Telemetry),
            (Some(_), _) => Some(DriverKind::Frame),
            (None, Some(_)) => Some(DriverKind::Telemetry),
            (None, None) => None,
        }
    }
}
