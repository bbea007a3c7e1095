//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Scheduler lifecycle phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimPhase {
    /// No run in progress (initial state, after stop, after mission complete).
    #[default]
    Idle,
    /// Both drivers armed and ticking.
    Running,
    /// Run frozen; drivers cancelled.
    Paused,
}

impl SimPhase {
    /// Whether a run exists (running or paused).
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Running | Self::Paused)
    }
}

/// Advisory turbulence category derived from wind speed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurbulenceLevel {
    #[default]
    Negligible,
    Moderate,
    High,
}

impl TurbulenceLevel {
    /// Turbulence factor in [0, 1].
    pub fn factor(&self) -> f64 {
        match self {
            Self::Negligible => 0.0,
            Self::Moderate => 0.4,
            Self::High => 0.8,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Negligible => "Negligible",
            Self::Moderate => "Moderate",
            Self::High => "High",
        }
    }
}
