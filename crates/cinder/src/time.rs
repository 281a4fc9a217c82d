//! Frame timing handed to every system.

/// Longest step a single frame may integrate, in seconds.
pub const MAX_DELTA_SECONDS: f32 = 0.1;

/// Timing for one update.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameTime {
    /// Frame number, starting at 1.
    pub frame: u64,
    /// Seconds since the previous frame, clamped to [`MAX_DELTA_SECONDS`].
    pub delta_seconds: f32,
    /// Seconds since the clock started.
    pub elapsed_seconds: f64,
}

/// Accumulates frame deltas into [`FrameTime`] values.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameClock {
    elapsed_seconds: f64,
}

impl FrameClock {
    /// Creates a clock at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            elapsed_seconds: 0.0,
        }
    }

    /// Advances the clock and returns the timing for `frame`.
    ///
    /// Negative or non-finite deltas count as zero; long stalls are clamped
    /// so one frame never integrates more than [`MAX_DELTA_SECONDS`].
    pub fn tick(&mut self, frame: u64, delta_seconds: f32) -> FrameTime {
        let delta_seconds = if delta_seconds.is_finite() {
            delta_seconds.clamp(0.0, MAX_DELTA_SECONDS)
        } else {
            0.0
        };
        self.elapsed_seconds += f64::from(delta_seconds);
        FrameTime {
            frame,
            delta_seconds,
            elapsed_seconds: self.elapsed_seconds,
        }
    }

    /// Restarts from zero, for session resets.
    pub fn reset(&mut self) {
        self.elapsed_seconds = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_accumulates() {
        let mut clock = FrameClock::new();
        let _ = clock.tick(1, 0.05);
        let time = clock.tick(2, 0.05);
        assert_eq!(time.frame, 2);
        assert!((time.elapsed_seconds - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_clock_clamps_bad_deltas() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick(1, 5.0).delta_seconds, MAX_DELTA_SECONDS);
        assert_eq!(clock.tick(2, -1.0).delta_seconds, 0.0);
        assert_eq!(clock.tick(3, f32::NAN).delta_seconds, 0.0);
    }
}
