//! Core types and definitions for the Wayfinder mission simulator.
//!
//! This crate defines the vocabulary shared across all other crates:
//! waypoints, commands, events, state snapshots, and constants.
//! It has no dependency on any runtime or rendering framework.

pub mod commands;
pub mod constants;
pub mod enums;
pub mod error;
pub mod events;
pub mod path;
pub mod state;
pub mod types;

#[cfg(test)]
mod tests;
