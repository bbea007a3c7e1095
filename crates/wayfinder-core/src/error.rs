//! Errors surfaced to callers of the simulation.

use thiserror::Error;

/// Rejected simulator operations. State is never mutated when one is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    #[error("add at least 2 waypoints to simulate a mission (path has {count})")]
    InsufficientWaypoints { count: usize },
}
