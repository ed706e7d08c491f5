use std::time::{Duration, Instant};

/// Source of per-frame time deltas.
///
/// The frame scheduler reads exactly one delta per tick. Implementations
/// return the seconds elapsed since their previous call.
pub trait Clock {
    /// Returns the elapsed seconds since the previous call.
    fn delta(&mut self) -> f32;
}

/// Wall-clock timer for tracking frame timing and elapsed time.
pub struct Timer {
    start_time: Instant,
    last_update: Instant,
    /// Time since last tick
    pub delta: Duration,
    /// Total elapsed time since creation
    pub elapsed: Duration,
    /// Total number of ticks
    pub frame_count: u64,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    /// Creates a new timer starting from now.
    #[must_use]
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start_time: now,
            last_update: now,
            delta: Duration::ZERO,
            elapsed: Duration::ZERO,
            frame_count: 0,
        }
    }

    /// Advances the timer to now.
    pub fn tick(&mut self) {
        let now = Instant::now();
        self.delta = now - self.last_update;
        self.elapsed = now - self.start_time;
        self.last_update = now;
        self.frame_count += 1;
    }

    #[must_use]
    pub fn dt_seconds(&self) -> f32 {
        self.delta.as_secs_f32()
    }
}

impl Clock for Timer {
    fn delta(&mut self) -> f32 {
        self.tick();
        self.dt_seconds()
    }
}

/// Deterministic clock that reports the same step every tick.
///
/// Used for fixed-step simulation and tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedClock {
    step: f32,
}

impl FixedClock {
    /// Creates a clock with the given step in seconds.
    ///
    /// Negative or non-finite steps collapse to zero.
    #[must_use]
    pub fn new(step: f32) -> Self {
        let step = if step.is_finite() { step.max(0.0) } else { 0.0 };
        Self { step }
    }

    /// A 60 Hz clock.
    #[must_use]
    pub fn sixty_hz() -> Self {
        Self::new(1.0 / 60.0)
    }

    #[must_use]
    pub fn step(&self) -> f32 {
        self.step
    }
}

impl Clock for FixedClock {
    fn delta(&mut self) -> f32 {
        self.step
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_sanitizes_step() {
        assert_eq!(FixedClock::new(-1.0).step(), 0.0);
        assert_eq!(FixedClock::new(f32::NAN).step(), 0.0);
        assert_eq!(FixedClock::new(0.25).delta(), 0.25);
    }

    #[test]
    fn timer_counts_ticks() {
        let mut timer = Timer::new();
        let first = timer.delta();
        let second = timer.delta();
        assert!(first >= 0.0 && second >= 0.0);
        assert_eq!(timer.frame_count, 2);
        assert!(timer.elapsed >= timer.delta);
    }
}
