//! Wind model: weather effect, positional drift and ground-speed reduction.
//!
//! The drift is a bounded perturbation proportional to wind speed, not a
//! physical drift model. It only needs to make wind visible on the map.

use glam::DVec2;
use rand::Rng;

use wayfinder_core::constants::*;
use wayfinder_core::enums::TurbulenceLevel;
use wayfinder_core::state::{WeatherEffect, WeatherReport};
use wayfinder_core::types::{normalize_degrees, LatLng};

/// Words in a weather description that imply precipitation.
const PRECIPITATION_WORDS: [&str; 7] = ["rain", "drizzle", "snow", "sleet", "hail", "shower", "storm"];

/// Positional perturbation applied to one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Drift {
    pub offset_north_m: f64,
    pub offset_east_m: f64,
    /// Input position shifted by the offset.
    pub position: LatLng,
}

/// Derive the flight-relevant effect of a weather report. Missing data is calm.
pub fn compute_effect(report: Option<&WeatherReport>) -> WeatherEffect {
    let Some(report) = report else {
        return WeatherEffect::default();
    };

    let wind_speed = if report.wind_speed_ms.is_finite() {
        report.wind_speed_ms.max(0.0)
    } else {
        0.0
    };
    let wind_direction = if report.wind_direction_deg.is_finite() {
        normalize_degrees(report.wind_direction_deg)
    } else {
        0.0
    };

    let turbulence_level = turbulence_for(wind_speed);
    WeatherEffect {
        wind_vector: wind_vector(wind_speed, wind_direction),
        wind_speed,
        wind_direction,
        visibility: report
            .visibility_m
            .filter(|v| v.is_finite() && *v >= 0.0)
            .unwrap_or(DEFAULT_VISIBILITY_M),
        precipitation: has_precipitation(&report.description),
        turbulence: turbulence_level.factor(),
        turbulence_level,
    }
}

/// Wind as a vector: x = cos(dir) * speed (north), y = sin(dir) * speed (east).
pub fn wind_vector(speed: f64, direction_deg: f64) -> DVec2 {
    let dir = direction_deg.to_radians();
    DVec2::new(dir.cos() * speed, dir.sin() * speed)
}

/// Advisory turbulence category for a wind speed in m/s.
pub fn turbulence_for(wind_speed: f64) -> TurbulenceLevel {
    if wind_speed > TURBULENCE_HIGH_WIND {
        TurbulenceLevel::High
    } else if wind_speed > TURBULENCE_MODERATE_WIND {
        TurbulenceLevel::Moderate
    } else {
        TurbulenceLevel::Negligible
    }
}

fn has_precipitation(description: &str) -> bool {
    let lower = description.to_lowercase();
    PRECIPITATION_WORDS.iter().any(|w| lower.contains(w))
}

/// Draw a gust factor in [1 - GUST_JITTER, 1 + GUST_JITTER].
pub fn gust_factor(rng: &mut impl Rng) -> f64 {
    rng.gen_range((1.0 - GUST_JITTER)..=(1.0 + GUST_JITTER))
}

/// Shift `position` downwind by `min(|wind| * drift_scale, MAX_DRIFT_M) * gust` meters.
pub fn apply_drift(position: LatLng, effect: &WeatherEffect, drift_scale: f64, gust: f64) -> Drift {
    let magnitude = effect.wind_magnitude();
    if magnitude <= f64::EPSILON {
        return Drift {
            offset_north_m: 0.0,
            offset_east_m: 0.0,
            position,
        };
    }

    let distance = (magnitude * drift_scale).min(MAX_DRIFT_M) * gust.max(0.0);
    let offset = effect.wind_vector / magnitude * distance;
    Drift {
        offset_north_m: offset.x,
        offset_east_m: offset.y,
        position: position.offset_by_meters(offset.x, offset.y),
    }
}

/// Air speed reduced by wind opposition, floored at zero.
pub fn ground_speed(air_speed: f64, effect: &WeatherEffect, damping: f64) -> f64 {
    (air_speed - effect.wind_magnitude() * damping).max(0.0)
}
