//! Simulator configuration.
//!
//! Hosts either build a `SimConfig` in code or load one from the JSON settings
//! blob the UI stores. Out-of-range values are clamped by `normalized()` rather
//! than rejected.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use wayfinder_core::constants::*;

/// Errors raised while loading a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid simulator config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Configuration for the mission simulator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// RNG seed for wind gusts. Same seed = same run.
    pub seed: u64,
    /// Initial speed multiplier.
    pub speed_multiplier: f64,
    /// Auto-pause at every waypoint.
    pub step_mode: bool,
    /// Trail capacity in points.
    pub trail_max_length: usize,
    /// Per-frame driver rate (Hz).
    pub frame_rate: u32,
    /// Fixed-rate telemetry driver rate (Hz).
    pub telemetry_rate: u32,
    /// Battery drain at 1x, fraction of capacity per second.
    pub battery_drain_per_sec: f64,
    /// Ground-speed reduction per m/s of wind.
    pub wind_damping: f64,
    /// Positional drift per m/s of wind (meters).
    pub drift_scale: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            speed_multiplier: 1.0,
            step_mode: false,
            trail_max_length: DEFAULT_TRAIL_LENGTH,
            frame_rate: FRAME_RATE,
            telemetry_rate: TELEMETRY_RATE,
            battery_drain_per_sec: BATTERY_DRAIN_PER_SEC,
            wind_damping: WIND_DAMPING,
            drift_scale: DRIFT_SCALE_M,
        }
    }
}

impl SimConfig {
    /// Parse a JSON config; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_json::from_str(json)?;
        Ok(config.normalized())
    }

    /// Clamp every field into its supported range.
    pub fn normalized(mut self) -> Self {
        let defaults = Self::default();

        self.speed_multiplier = if self.speed_multiplier.is_finite() {
            self.speed_multiplier
                .clamp(MIN_SPEED_MULTIPLIER, MAX_SPEED_MULTIPLIER)
        } else {
            tracing::warn!("non-finite speed multiplier in config, using default");
            defaults.speed_multiplier
        };
        self.trail_max_length = self
            .trail_max_length
            .clamp(MIN_TRAIL_LENGTH, MAX_TRAIL_LENGTH);
        if self.frame_rate == 0 {
            tracing::warn!("frame rate of 0 Hz in config, using {FRAME_RATE} Hz");
            self.frame_rate = FRAME_RATE;
        }
        if self.telemetry_rate == 0 {
            tracing::warn!("telemetry rate of 0 Hz in config, using {TELEMETRY_RATE} Hz");
            self.telemetry_rate = TELEMETRY_RATE;
        }
        self.frame_rate = self.frame_rate.min(MAX_DRIVER_RATE);
        self.telemetry_rate = self.telemetry_rate.min(MAX_DRIVER_RATE);
        self.battery_drain_per_sec = non_negative_or(self.battery_drain_per_sec, defaults.battery_drain_per_sec);
        self.wind_damping = non_negative_or(self.wind_damping, defaults.wind_damping);
        self.drift_scale = non_negative_or(self.drift_scale, defaults.drift_scale);
        self
    }

    /// Interval between frame ticks.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.frame_rate.max(1) as f64)
    }

    /// Interval between telemetry ticks.
    pub fn telemetry_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.telemetry_rate.max(1) as f64)
    }
}

fn non_negative_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() && value >= 0.0 {
        value
    } else {
        fallback
    }
}
