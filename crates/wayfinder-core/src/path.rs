//! Waypoints and the ordered path the drone flies.
//!
//! A `WaypointPath` is built from the mission editor's list and handed to the
//! simulator by value, so the simulator's copy cannot change under a running
//! simulation.

use serde::{Deserialize, Serialize};

use crate::types::LatLng;

/// A target position/altitude/speed the simulated drone visits in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub id: u32,
    pub position: LatLng,
    /// Altitude in meters.
    pub altitude: f64,
    /// Cruise speed requested at/after this waypoint (m/s).
    pub speed: f64,
    #[serde(default)]
    pub is_home: bool,
}

impl Waypoint {
    pub fn new(id: u32, lat: f64, lng: f64, altitude: f64, speed: f64) -> Self {
        Self {
            id,
            position: LatLng::new(lat, lng),
            altitude,
            speed,
            is_home: false,
        }
    }

    /// Mark this waypoint as the home point.
    pub fn home(mut self) -> Self {
        self.is_home = true;
        self
    }
}

/// One leg of the path: the waypoint flown from and the one flown to.
#[derive(Debug, Clone, Copy)]
pub struct Segment<'a> {
    pub from: &'a Waypoint,
    pub to: &'a Waypoint,
}

impl Segment<'_> {
    /// Great-circle length of the segment in meters.
    pub fn distance(&self) -> f64 {
        self.from.position.distance_to(&self.to.position)
    }

    /// Initial bearing of the segment in degrees.
    pub fn bearing(&self) -> f64 {
        self.from.position.bearing_to(&self.to.position)
    }
}

/// Ordered, immutable sequence of waypoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WaypointPath {
    waypoints: Vec<Waypoint>,
}

impl WaypointPath {
    pub fn new(waypoints: Vec<Waypoint>) -> Self {
        Self { waypoints }
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Waypoint> {
        self.waypoints.get(index)
    }

    pub fn first(&self) -> Option<&Waypoint> {
        self.waypoints.first()
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    /// Number of flyable segments.
    pub fn segment_count(&self) -> usize {
        self.waypoints.len().saturating_sub(1)
    }

    /// Segment starting at `index`, if both endpoints exist.
    pub fn segment(&self, index: usize) -> Option<Segment<'_>> {
        let from = self.waypoints.get(index)?;
        let to = self.waypoints.get(index + 1)?;
        Some(Segment { from, to })
    }

    /// Length of the segment starting at `index`; 0 past the end.
    pub fn segment_distance(&self, index: usize) -> f64 {
        self.segment(index).map_or(0.0, |s| s.distance())
    }

    /// Sum of all segment lengths in meters.
    pub fn total_distance(&self) -> f64 {
        self.waypoints
            .windows(2)
            .map(|w| w[0].position.distance_to(&w[1].position))
            .sum()
    }

    /// The designated home waypoint, falling back to the first entry.
    pub fn home(&self) -> Option<&Waypoint> {
        self.waypoints
            .iter()
            .find(|w| w.is_home)
            .or_else(|| self.waypoints.first())
    }
}

impl From<Vec<Waypoint>> for WaypointPath {
    fn from(waypoints: Vec<Waypoint>) -> Self {
        Self::new(waypoints)
    }
}

impl FromIterator<Waypoint> for WaypointPath {
    fn from_iter<I: IntoIterator<Item = Waypoint>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
