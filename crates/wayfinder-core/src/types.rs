//! Fundamental geographic and simulation types.

use serde::{Deserialize, Serialize};

use crate::constants::EARTH_RADIUS_M;

/// Geographic position in decimal degrees (WGS84).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// Simulation time tracking for both drivers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimTime {
    /// Number of frame ticks run in the current session.
    pub frame_tick: u64,
    /// Number of telemetry ticks run in the current session.
    pub telemetry_tick: u64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Great-circle distance to another position in meters (haversine).
    pub fn distance_to(&self, other: &LatLng) -> f64 {
        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();
        let dlat = (other.lat - self.lat).to_radians();
        let dlng = (other.lng - self.lng).to_radians();

        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).max(0.0).sqrt());
        EARTH_RADIUS_M * c
    }

    /// Forward azimuth to another position in degrees, [0, 360), 0 = North.
    pub fn bearing_to(&self, other: &LatLng) -> f64 {
        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();
        let dlng = (other.lng - self.lng).to_radians();

        let y = dlng.sin() * lat2.cos();
        let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlng.cos();
        normalize_degrees(y.atan2(x).to_degrees())
    }

    /// Linear blend towards `other`; `t = 0` is `self`, `t = 1` is `other`.
    pub fn lerp(&self, other: &LatLng, t: f64) -> LatLng {
        LatLng {
            lat: self.lat + (other.lat - self.lat) * t,
            lng: self.lng + (other.lng - self.lng) * t,
        }
    }

    /// Shift by a local north/east offset in meters (flat-earth approximation).
    pub fn offset_by_meters(&self, north_m: f64, east_m: f64) -> LatLng {
        let meters_per_rad = EARTH_RADIUS_M;
        let dlat = north_m / meters_per_rad;
        let cos_lat = self.lat.to_radians().cos().max(1e-9);
        let dlng = east_m / (meters_per_rad * cos_lat);
        LatLng {
            lat: self.lat + dlat.to_degrees(),
            lng: self.lng + dlng.to_degrees(),
        }
    }
}

/// Wrap an angle in degrees into [0, 360).
pub fn normalize_degrees(deg: f64) -> f64 {
    let wrapped = deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}
