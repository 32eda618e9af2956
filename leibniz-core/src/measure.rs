//! Trial Timing
//!
//! Trials are timed with a monotonic clock so wall-clock adjustments never
//! show up as negative or inflated durations. The [`Clock`] trait lets the
//! runner be driven by a scripted clock in tests.

use std::time::Instant;

/// Source of monotonic time marks
pub trait Clock: Sync {
    /// Opaque point in time
    type Mark: Copy;

    /// Capture the current point in time
    fn mark(&self) -> Self::Mark;

    /// Seconds elapsed from `start` to `end`
    fn seconds_between(&self, start: Self::Mark, end: Self::Mark) -> f64;
}

/// [`Clock`] backed by [`std::time::Instant`]
#[derive(Debug, Clone, Copy, Default)]
pub struct MonotonicClock;

impl Clock for MonotonicClock {
    type Mark = Instant;

    #[inline(always)]
    fn mark(&self) -> Instant {
        Instant::now()
    }

    #[inline(always)]
    fn seconds_between(&self, start: Instant, end: Instant) -> f64 {
        end.saturating_duration_since(start).as_secs_f64()
    }
}

/// Stopwatch over any [`Clock`]
pub struct Timer<'c, C: Clock> {
    clock: &'c C,
    start: C::Mark,
}

impl<'c, C: Clock> Timer<'c, C> {
    /// Start a new timer
    #[inline(always)]
    pub fn start(clock: &'c C) -> Self {
        Self {
            clock,
            start: clock.mark(),
        }
    }

    /// Seconds since the timer was started
    #[inline(always)]
    pub fn stop(&self) -> f64 {
        self.clock.seconds_between(self.start, self.clock.mark())
    }
}
