//! Frame delta timing.

use std::time::{Duration, Instant};

/// Upper bound on a wall-clock delta, so a stall (debugger, suspended
/// process) does not hand the script one enormous step.
pub const MAX_FRAME_DT: f32 = 0.25;

/// Produces the `dt` passed to `on_update`.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Option<Instant>,
    fixed: Option<f32>,
}

impl FrameClock {
    /// Wall-clock deltas. The first tick returns 0.
    pub fn new() -> Self {
        Self { last: None, fixed: None }
    }

    /// Deterministic deltas: every tick returns `dt`.
    pub fn fixed(dt: f32) -> Self {
        Self {
            last: None,
            fixed: Some(dt),
        }
    }

    pub fn is_fixed(&self) -> bool {
        self.fixed.is_some()
    }

    /// Seconds since the previous tick.
    pub fn tick(&mut self) -> f32 {
        if let Some(dt) = self.fixed {
            return dt;
        }
        let now = Instant::now();
        let dt = self
            .last
            .replace(now)
            .map_or(Duration::ZERO, |last| now.duration_since(last));
        dt.as_secs_f32().min(MAX_FRAME_DT)
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Wall time of one frame's phases, logged at trace level.
#[derive(Debug, Clone, Copy, Default)]
pub struct PhaseTimings {
    pub input: Duration,
    pub update: Duration,
    pub commit: Duration,
    pub draw: Duration,
}

impl PhaseTimings {
    pub fn total(&self) -> Duration {
        self.input + self.update + self.commit + self.draw
    }
}

/// Run `f` and add its wall time to `slot`.
#[inline]
pub(crate) fn measure<T>(slot: &mut Duration, f: impl FnOnce() -> T) -> T {
    let start = Instant::now();
    let result = f();
    *slot += start.elapsed();
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock() {
        let mut clock = FrameClock::fixed(0.5);
        assert!(clock.is_fixed());
        assert_eq!(clock.tick(), 0.5);
        assert_eq!(clock.tick(), 0.5);
    }

    #[test]
    fn test_wall_clock_first_tick_is_zero() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick(), 0.0);
        let dt = clock.tick();
        assert!((0.0..=MAX_FRAME_DT).contains(&dt));
    }

    #[test]
    fn test_measure_accumulates() {
        let mut slot = Duration::ZERO;
        let value = measure(&mut slot, || 7);
        assert_eq!(value, 7);
        let before = slot;
        measure(&mut slot, || std::thread::sleep(Duration::from_millis(1)));
        assert!(slot > before);
    }
}
