//! Autosave Scheduler
//!
//! Decides when builder state should be written. Edits ask for an immediate
//! save; otherwise dirty state is flushed on a fixed interval. A failed save
//! leaves the state dirty, so the next window retries it.

#[derive(Debug, Clone)]
pub struct AutosaveTimer {
    interval: f32,
    elapsed: f32,
    dirty: bool,
    immediate: bool,
    consecutive_failures: u32,
}

impl AutosaveTimer {
    pub fn new(interval: f32) -> Self {
        Self {
            interval: interval.max(0.0),
            elapsed: 0.0,
            dirty: false,
            immediate: false,
            consecutive_failures: 0,
        }
    }

    /// Something changed that should reach storage eventually.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// An edit happened: save on the next tick.
    pub fn request_now(&mut self) {
        self.dirty = true;
        self.immediate = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    /// Advance the timer. Returns `true` when a save should run now.
    pub fn tick(&mut self, delta_time: f32) -> bool {
        self.elapsed += delta_time.max(0.0);
        if self.immediate {
            self.immediate = false;
            self.elapsed = 0.0;
            return true;
        }
        if self.elapsed >= self.interval {
            self.elapsed = 0.0;
            return self.dirty;
        }
        false
    }

    pub fn record_success(&mut self) {
        self.dirty = false;
        self.consecutive_failures = 0;
    }

    pub fn record_failure(&mut self) {
        self.dirty = true;
        self.consecutive_failures += 1;
    }

    /// Forget pending work, e.g. when leaving the builder.
    pub fn reset(&mut self) {
        self.elapsed = 0.0;
        self.dirty = false;
        self.immediate = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_immediate_request_fires_next_tick() {
        let mut timer = AutosaveTimer::new(10.0);
        assert!(!timer.tick(0.016));
        timer.request_now();
        assert!(timer.tick(0.016));
        assert!(!timer.tick(0.016));
    }

    #[test]
    fn test_periodic_save_only_when_dirty() {
        let mut timer = AutosaveTimer::new(10.0);
        assert!(!timer.tick(10.0));
        timer.mark_dirty();
        assert!(!timer.tick(5.0));
        assert!(timer.tick(5.0));
        timer.record_success();
        assert!(!timer.tick(10.0));
    }

    #[test]
    fn test_failure_retries_next_window() {
        let mut timer = AutosaveTimer::new(10.0);
        timer.request_now();
        assert!(timer.tick(0.1));
        timer.record_failure();
        assert_eq!(timer.consecutive_failures(), 1);
        assert!(!timer.tick(1.0));
        assert!(timer.tick(9.0));
        timer.record_success();
        assert_eq!(timer.consecutive_failures(), 0);
    }
}
