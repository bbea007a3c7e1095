//! Per-tick systems the mission simulator runs.
//!
//! Systems are pure functions over plain values. They do not own state;
//! all state lives in the `MissionSimulator`.

pub mod kinematics;
pub mod snapshot;
pub mod telemetry;
pub mod wind;
