//! Time sources and interval drivers.
//!
//! The simulator never reads wall-clock time directly. It asks a `Clock`, and
//! each repeating callback (frame, telemetry) is an `IntervalDriver` that can be
//! armed and cancelled independently.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Monotonic time source measured from an arbitrary origin.
pub trait Clock: Send {
    fn now(&self) -> Duration;
}

/// Real monotonic clock, origin at construction.
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Hand-advanced clock for deterministic tests. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    nanos: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward, saturating at the largest representable instant.
    pub fn advance(&self, by: Duration) {
        let by = saturating_nanos(by);
        // The closure never returns None, so the update cannot fail
        let _ = self
            .nanos
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| {
                Some(n.saturating_add(by))
            });
    }

    pub fn set(&self, to: Duration) {
        self.nanos.store(saturating_nanos(to), Ordering::SeqCst);
    }
}

fn saturating_nanos(d: Duration) -> u64 {
    u64::try_from(d.as_nanos()).unwrap_or(u64::MAX)
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        Duration::from_nanos(self.nanos.load(Ordering::SeqCst))
    }
}

/// A repeating callback schedule with a fixed interval.
///
/// While armed, `next_due` is the time of the next tick. Cancelling drops the
/// pending tick; nothing fires again until the driver is re-armed.
#[derive(Debug, Clone)]
pub struct IntervalDriver {
    interval: Duration,
    next_due: Option<Duration>,
    max_lag: Duration,
}

impl IntervalDriver {
    pub fn new(interval: Duration, max_lag: Duration) -> Self {
        Self {
            interval,
            next_due: None,
            max_lag,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_armed(&self) -> bool {
        self.next_due.is_some()
    }

    /// Time of the next pending tick, if armed.
    pub fn next_due(&self) -> Option<Duration> {
        self.next_due
    }

    /// Schedule the first tick one interval after `now`.
    pub fn arm(&mut self, now: Duration) {
        self.next_due = Some(now + self.interval);
    }

    pub fn cancel(&mut self) {
        self.next_due = None;
    }

    /// Whether a tick is due at `now`.
    pub fn is_due(&self, now: Duration) -> bool {
        self.next_due.is_some_and(|due| due <= now)
    }

    /// Consume the pending tick and schedule the following one.
    ///
    /// A driver more than `max_lag` behind re-anchors on `now` instead of
    /// replaying every missed tick.
    pub fn complete_tick(&mut self, now: Duration) {
        if let Some(due) = self.next_due {
            let next = due + self.interval;
            self.next_due = if now.saturating_sub(next) > self.max_lag {
                Some(now + self.interval)
            } else {
                Some(next)
            };
        }
    }
}
