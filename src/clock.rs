use crate::config::DEFAULT_MAX_TIME_SKIP;

/// Wall clock fed with frame timestamps in milliseconds.
///
/// A frame never accounts for more than `max_time_skip` seconds, so a stalled tab or a
/// breakpoint does not make the world unroll thousands of steps at once.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameClock {
    previous: f64,
    current: f64,
    total: f64,
    paused: bool,
    max_time_skip: f64,
}

impl FrameClock {
    pub fn new(now_ms: f64) -> Self {
        Self::with_max_time_skip(now_ms, DEFAULT_MAX_TIME_SKIP)
    }

    pub fn with_max_time_skip(now_ms: f64, max_time_skip: f64) -> Self {
        Self {
            previous: now_ms,
            current: now_ms,
            total: 0.0,
            paused: false,
            max_time_skip,
        }
    }

    pub fn set_max_time_skip(&mut self, seconds: f64) {
        self.max_time_skip = seconds;
    }

    pub fn update(&mut self, now_ms: f64) {
        self.previous = self.current.max(now_ms - 1000.0 * self.max_time_skip);
        self.current = now_ms;
        self.total += self.delta_ms();
    }

    pub fn pause(&mut self, now_ms: f64) {
        self.update(now_ms);
        self.paused = true;
    }

    /// Resumes without accounting for the time spent paused.
    pub fn unpause(&mut self, now_ms: f64) {
        self.paused = false;
        self.previous = now_ms;
        self.current = now_ms;
    }

    pub fn is_paused(&self) -> bool { self.paused }

    pub fn delta_ms(&self) -> f64 { self.current - self.previous }
    /// Seconds accounted to the last frame.
    pub fn delta(&self) -> f64 { self.delta_ms() / 1000.0 }
    pub fn total_ms(&self) -> f64 { self.total }
    pub fn total(&self) -> f64 { self.total / 1000.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_frames_are_clamped() {
        let mut clock = FrameClock::new(1000.0);
        clock.update(1016.0);
        assert_eq!(clock.delta_ms(), 16.0);
        clock.update(6016.0);
        assert_eq!(clock.delta_ms(), 100.0);
        assert!((clock.total() - 0.116).abs() < 1e-12);
    }

    #[test]
    fn pause_drops_the_gap() {
        let mut clock = FrameClock::new(0.0);
        clock.pause(20.0);
        assert!(clock.is_paused());
        assert_eq!(clock.delta_ms(), 20.0);
        clock.unpause(5000.0);
        assert_eq!(clock.delta(), 0.0);
        clock.update(5010.0);
        assert_eq!(clock.delta_ms(), 10.0);
        assert_eq!(clock.total_ms(), 30.0);
    }
}
