//! Bounded history of recent drone positions for the trail polyline.

use std::collections::VecDeque;

use wayfinder_core::constants::{MAX_TRAIL_LENGTH, MIN_TRAIL_LENGTH};
use wayfinder_core::state::TrailPoint;

/// FIFO trail buffer. `len() <= capacity()` always holds.
#[derive(Debug, Clone)]
pub struct TrailBuffer {
    points: VecDeque<TrailPoint>,
    capacity: usize,
}

impl TrailBuffer {
    /// Create an empty buffer; `capacity` is clamped to [10, 500].
    pub fn new(capacity: usize) -> Self {
        let capacity = clamp_capacity(capacity);
        Self {
            points: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a point, evicting the oldest one when full.
    pub fn push(&mut self, point: TrailPoint) {
        if self.points.len() == self.capacity {
            self.points.pop_front();
        }
        self.points.push_back(point);
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Change the capacity (clamped), dropping the oldest points if needed.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = clamp_capacity(capacity);
        while self.points.len() > self.capacity {
            self.points.pop_front();
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Oldest point.
    pub fn first(&self) -> Option<&TrailPoint> {
        self.points.front()
    }

    /// Newest point.
    pub fn last(&self) -> Option<&TrailPoint> {
        self.points.back()
    }

    /// Points in chronological order.
    pub fn iter(&self) -> impl Iterator<Item = &TrailPoint> {
        self.points.iter()
    }

    /// Owned copy in chronological order, for snapshots.
    pub fn to_vec(&self) -> Vec<TrailPoint> {
        self.points.iter().copied().collect()
    }
}

fn clamp_capacity(capacity: usize) -> usize {
    capacity.clamp(MIN_TRAIL_LENGTH, MAX_TRAIL_LENGTH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wayfinder_core::types::LatLng;

    fn point(i: usize) -> TrailPoint {
        TrailPoint {
            position: LatLng::new(0.0, i as f64 * 1e-5),
            altitude: 0.0,
            heading: 90.0,
            timestamp: i as f64,
        }
    }

    #[test]
    fn test_fifo_eviction_keeps_newest() {
        let mut trail = TrailBuffer::new(10);
        for i in 1..=50 {
            trail.push(point(i));
        }
        assert_eq!(trail.len(), 10);
        // First element is the 41st appended point
        assert_eq!(trail.first().map(|p| p.timestamp), Some(41.0));
        assert_eq!(trail.last().map(|p| p.timestamp), Some(50.0));

        let stamps: Vec<f64> = trail.iter().map(|p| p.timestamp).collect();
        assert!(stamps.windows(2).all(|w| w[0] < w[1]), "not chronological");
    }

    #[test]
    fn test_capacity_clamped() {
        assert_eq!(TrailBuffer::new(1).capacity(), MIN_TRAIL_LENGTH);
        assert_eq!(TrailBuffer::new(10_000).capacity(), MAX_TRAIL_LENGTH);
        assert_eq!(TrailBuffer::new(123).capacity(), 123);
    }

    #[test]
    fn test_shrink_drops_oldest() {
        let mut trail = TrailBuffer::new(100);
        for i in 0..60 {
            trail.push(point(i));
        }
        trail.set_capacity(20);
        assert_eq!(trail.len(), 20);
        assert_eq!(trail.first().map(|p| p.timestamp), Some(40.0));

        // Growing keeps existing points
        trail.set_capacity(200);
        assert_eq!(trail.len(), 20);
    }

    #[test]
    fn test_clear() {
        let mut trail = TrailBuffer::new(10);
        trail.push(point(0));
        trail.clear();
        assert!(trail.is_empty());
        assert!(trail.to_vec().is_empty());
        assert_eq!(trail.capacity(), 10);
    }
}
