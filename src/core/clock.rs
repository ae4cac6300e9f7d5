use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

use crate::traits::TimeSource;

/// Wall-clock time source backed by `Instant`
#[derive(Debug, Clone, Copy)]
pub struct MonotonicTime {
    start: Instant,
}

impl MonotonicTime {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for MonotonicTime {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for MonotonicTime {
    fn seconds(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}

/// Hand-driven time source; clones share the same reading
#[derive(Debug, Clone, Default)]
pub struct ManualTime {
    now: Rc<Cell<f64>>,
}

impl ManualTime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, seconds: f64) {
        self.now.set(seconds);
    }

    pub fn advance(&self, seconds: f64) {
        self.now.set(self.now.get() + seconds);
    }
}

impl TimeSource for ManualTime {
    fn seconds(&self) -> f64 {
        self.now.get()
    }
}

/// Elapsed seconds since construction.
///
/// Never reset, never paused. Readings are non-decreasing even if the time
/// source steps backwards or returns garbage.
#[derive(Debug)]
pub struct Clock<S: TimeSource = MonotonicTime> {
    source: S,
    origin: f64,
    last: f64,
}

impl Clock<MonotonicTime> {
    /// Create new clock starting now
    pub fn new() -> Self {
        Self::with_source(MonotonicTime::new())
    }
}

impl Default for Clock<MonotonicTime> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: TimeSource> Clock<S> {
    pub fn with_source(source: S) -> Self {
        let origin = source.seconds();
        Self {
            source,
            origin: if origin.is_finite() { origin } else { 0.0 },
            last: 0.0,
        }
    }

    /// Seconds since the clock was created
    pub fn elapsed(&mut self) -> f64 {
        let now = self.source.seconds() - self.origin;
        if now.is_finite() && now > self.last {
            self.last = now;
        }
        self.last
    }
}
