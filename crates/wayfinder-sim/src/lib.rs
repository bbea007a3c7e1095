//! Simulation engine for Wayfinder.
//!
//! Owns the mission run: kinematic interpolation along the waypoint path,
//! wind perturbation, telemetry derivation and the trail, ticked by frame and
//! telemetry drivers. Produces `SimSnapshot`s for renderers.

pub mod clock;
pub mod config;
pub mod engine;
pub mod runner;
pub mod systems;
pub mod trail;

pub use engine::MissionSimulator;
pub use wayfinder_core as core;
