//! Simulation constants and tuning parameters.

/// Nominal per-frame driver rate (Hz).
pub const FRAME_RATE: u32 = 60;

/// Seconds per frame tick at the nominal frame rate.
pub const FRAME_DT: f64 = 1.0 / FRAME_RATE as f64;

/// Fixed-rate telemetry driver rate (Hz).
pub const TELEMETRY_RATE: u32 = 20;

/// Seconds per telemetry tick (50 ms).
pub const TELEMETRY_DT: f64 = 1.0 / TELEMETRY_RATE as f64;

/// Highest rate either driver may be configured to (Hz).
pub const MAX_DRIVER_RATE: u32 = 1000;

/// A driver further behind than this re-anchors instead of replaying ticks.
pub const MAX_CATCH_UP_SECS: f64 = 0.25;

// --- Geodesy ---

/// Mean Earth radius used by the haversine formula (meters).
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Segments shorter than this are treated as coincident waypoints (meters).
pub const COINCIDENT_DISTANCE_M: f64 = 1e-6;

// --- Speed ---

/// Lower bound of the speed multiplier.
pub const MIN_SPEED_MULTIPLIER: f64 = 0.1;

/// Upper bound of the speed multiplier.
pub const MAX_SPEED_MULTIPLIER: f64 = 10.0;

/// Ground speeds below this are considered zero when dividing (m/s).
pub const GROUND_SPEED_EPSILON: f64 = 1e-3;

// --- Trail ---

/// Smallest allowed trail capacity.
pub const MIN_TRAIL_LENGTH: usize = 10;

/// Largest allowed trail capacity.
pub const MAX_TRAIL_LENGTH: usize = 500;

/// Trail capacity when nothing else is configured.
pub const DEFAULT_TRAIL_LENGTH: usize = 100;

// --- Battery ---

/// Battery level at the start of a run (percent).
pub const BATTERY_FULL: f64 = 100.0;

/// Battery drain at 1x speed, as a fraction of capacity per second.
pub const BATTERY_DRAIN_PER_SEC: f64 = 0.001;

/// Battery level that raises the low-battery advisory (percent).
pub const BATTERY_LOW_THRESHOLD: f64 = 20.0;

// --- Wind ---

/// Ground-speed reduction per m/s of wind.
pub const WIND_DAMPING: f64 = 0.1;

/// Positional drift per m/s of wind (meters).
pub const DRIFT_SCALE_M: f64 = 0.5;

/// Upper bound of the positional drift (meters).
pub const MAX_DRIFT_M: f64 = 15.0;

/// Gust jitter applied to the drift magnitude (fraction either side of 1.0).
pub const GUST_JITTER: f64 = 0.2;

/// Wind speed above which turbulence is high (m/s).
pub const TURBULENCE_HIGH_WIND: f64 = 10.0;

/// Wind speed above which turbulence is moderate (m/s).
pub const TURBULENCE_MODERATE_WIND: f64 = 5.0;

/// Visibility assumed when the weather report carries none (meters).
pub const DEFAULT_VISIBILITY_M: f64 = 10_000.0;
