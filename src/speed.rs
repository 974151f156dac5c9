//! Gravity speed ramp
//!
//! The fall interval shrinks by a fixed factor every time a fixed amount of
//! unpaused play time has accumulated. It never grows back until restart.

use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct SpeedRamp {
    /// Milliseconds between automatic one-row drops
    fall_interval_ms: f64,
    increase_every: Duration,
    factor: f64,
    since_increase: Duration,
    /// Number of speed-ups applied so far
    pub stage: u32,
}

impl SpeedRamp {
    pub fn new(initial_fall_ms: f64, increase_every: Duration, factor: f64) -> Self {
        Self {
            fall_interval_ms: initial_fall_ms,
            increase_every,
            factor,
            since_increase: Duration::ZERO,
            stage: 0,
        }
    }

    pub fn fall_interval_ms(&self) -> f64 {
        self.fall_interval_ms
    }

    /// Accumulate play time; returns true when the interval shrank.
    ///
    /// The accumulator resets to zero on each speed-up, so time past the
    /// threshold is not carried into the next period.
    pub fn advance(&mut self, elapsed: Duration) -> bool {
        self.since_increase += elapsed;
        if self.since_increase < self.increase_every {
            return false;
        }
        self.fall_interval_ms *= self.factor;
        self.since_increase = Duration::ZERO;
        self.stage += 1;
        tracing::info!(
            stage = self.stage,
            fall_interval_ms = self.fall_interval_ms,
            "speed increased"
        );
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp() -> SpeedRamp {
        SpeedRamp::new(800.0, Duration::from_secs(30), 0.85)
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_no_change_before_interval() {
        let mut speed = ramp();
        assert!(!speed.advance(Duration::from_millis(29_999)));
        assert_eq!(speed.fall_interval_ms(), 800.0);
    }

    #[test]
    fn test_two_steps() {
        let mut speed = ramp();
        assert!(speed.advance(Duration::from_secs(30)));
        assert!(close(speed.fall_interval_ms(), 680.0));
        for _ in 0..299 {
            assert!(!speed.advance(Duration::from_millis(100)));
        }
        assert!(speed.advance(Duration::from_millis(100)));
        assert!(close(speed.fall_interval_ms(), 578.0));
        assert_eq!(speed.stage, 2);
    }

    #[test]
    fn test_overshoot_is_discarded() {
        let mut speed = ramp();
        assert!(speed.advance(Duration::from_secs(50)));
        // The extra 20s do not count toward the next step
        assert!(!speed.advance(Duration::from_secs(29)));
        assert!(close(speed.fall_interval_ms(), 680.0));
    }
}
