//! Rolling frame-time and frame-rate measurement.

use std::time::Duration;

use crate::clock::{Clock, MonotonicClock};

/// Averages the time between the last `N` frame marks.
///
/// The window sum is maintained incrementally, so reading the average is
/// constant time regardless of `N`.
pub struct FramerateTimer<const N: usize, C: Clock = MonotonicClock> {
    clock: C,
    last_mark: C::Instant,
    frames: [Duration; N],
    next: usize,
    filled: usize,
    sum: Duration,
}

impl<const N: usize, C: Clock + Default> FramerateTimer<N, C> {
    pub fn new() -> Self {
        Self::with_clock(C::default())
    }
}

impl<const N: usize, C: Clock> FramerateTimer<N, C> {
    pub fn with_clock(clock: C) -> Self {
        const { assert!(N > 0, "FramerateTimer needs a window of at least one frame") };
        let last_mark = clock.now();
        Self {
            clock,
            last_mark,
            frames: [Duration::ZERO; N],
            next: 0,
            filled: 0,
            sum: Duration::ZERO,
        }
    }

    /// Close the current frame and return its duration.
    pub fn mark_frame(&mut self) -> Duration {
        let now = self.clock.now();
        let frame = self.clock.between(self.last_mark, now);

        self.sum -= self.frames[self.next];
        self.frames[self.next] = frame;
        self.sum += frame;
        self.next = (self.next + 1) % N;
        self.filled = (self.filled + 1).min(N);
        self.last_mark = now;

        frame
    }

    /// Drop the window and start the next frame now.
    pub fn reset(&mut self) {
        self.last_mark = self.clock.now();
        self.frames = [Duration::ZERO; N];
        self.next = 0;
        self.filled = 0;
        self.sum = Duration::ZERO;
    }

    /// Average frame duration over the marked frames in the window.
    pub fn frame_time(&self) -> Duration {
        if self.filled == 0 {
            return Duration::ZERO;
        }
        self.sum / u32::try_from(self.filled).unwrap_or(u32::MAX)
    }

    pub fn frame_time_ms(&self) -> f64 {
        self.frame_time().as_secs_f64() * 1_000.0
    }

    /// Frames per second, or `0.0` until a non-zero frame time is measured.
    pub fn framerate(&self) -> f64 {
        let secs = self.frame_time().as_secs_f64();
        if secs > 0.0 { 1.0 / secs } else { 0.0 }
    }
}

impl<const N: usize, C: Clock + Default> Default for FramerateTimer<N, C> {
    fn default() -> Self {
        Self::new()
    }
}
