use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

/// Monotonic source of elapsed seconds since the loop started
pub trait Clock {
    fn elapsed(&self) -> f64;
}

/// Wall clock backed by [`Instant`]
#[derive(Debug)]
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    /// Create new clock starting now
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn elapsed(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}

/// Synthetic clock advanced by hand; clones share the same reading.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
}

impl ManualClock {
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

impl Clock for ManualClock {
    fn elapsed(&self) -> f64 {
        self.now.get()
    }
}

/// Reading supplied by the host each frame (e.g. the
/// `requestAnimationFrame` timestamp), rebased to the first reading.
#[derive(Debug, Clone, Default)]
pub struct HostClock {
    origin: Rc<Cell<Option<f64>>>,
    latest: Rc<Cell<f64>>,
}

impl HostClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_millis(&self, timestamp: f64) {
        let seconds = timestamp / 1000.0;
        let origin = match self.origin.get() {
            Some(origin) => origin,
            None => {
                self.origin.set(Some(seconds));
                seconds
            }
        };
        self.latest.set((seconds - origin).max(0.0));
    }
}

impl Clock for HostClock {
    fn elapsed(&self) -> f64 {
        self.latest.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let first = clock.elapsed();
        thread::sleep(Duration::from_millis(5));
        assert!(clock.elapsed() > first);
    }

    #[test]
    fn manual_clock_clones_share_time() {
        let clock = ManualClock::new();
        let handle = clock.clone();
        handle.advance(0.5);
        handle.advance(0.25);
        assert_eq!(clock.elapsed(), 0.75);
    }

    #[test]
    fn host_clock_rebases_to_first_frame() {
        let clock = HostClock::new();
        clock.record_millis(1500.0);
        assert_eq!(clock.elapsed(), 0.0);
        clock.record_millis(2500.0);
        assert_eq!(clock.elapsed(), 1.0);
    }
}
