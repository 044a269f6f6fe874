use crate::easing::ease_in_out_sine;
use crate::percent::clamp_percent;

/// One playback of a KPI counter from 0 to its target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationRun {
    pub start_ms: f64,
    pub target_percent: f64,
    pub duration_ms: f64,
}

impl AnimationRun {
    pub fn new(start_ms: f64, target_percent: f64, duration_ms: f64) -> Self {
        AnimationRun {
            start_ms,
            target_percent: clamp_percent(target_percent),
            duration_ms: duration_ms.max(0.0),
        }
    }

    /// Elapsed fraction of the run, clamped to `[0, 1]`.
    pub fn progress(&self, now_ms: f64) -> f64 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        ((now_ms - self.start_ms) / self.duration_ms).clamp(0.0, 1.0)
    }

    pub fn final_value(&self) -> u32 {
        self.target_percent.round() as u32
    }

    /// Counter value shown at `now_ms`.
    pub fn value_at(&self, now_ms: f64) -> u32 {
        let eased = ease_in_out_sine(self.progress(now_ms));
        (self.final_value() as f64 * eased).round() as u32
    }

    pub fn is_finished(&self, now_ms: f64) -> bool {
        self.progress(now_ms) >= 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_zero_and_ends_at_rounded_target() {
        let run = AnimationRun::new(1000.0, 74.6, 1600.0);
        assert_eq!(run.value_at(1000.0), 0);
        assert_eq!(run.value_at(2600.0), 75);
        assert_eq!(run.final_value(), 75);
        assert!(run.is_finished(2600.0));
        assert!(!run.is_finished(2599.0));
    }

    #[test]
    fn before_start_reads_as_zero() {
        let run = AnimationRun::new(500.0, 80.0, 1600.0);
        assert_eq!(run.progress(0.0), 0.0);
        assert_eq!(run.value_at(0.0), 0);
    }

    #[test]
    fn halfway_is_half() {
        let run = AnimationRun::new(0.0, 60.0, 1600.0);
        assert_eq!(run.value_at(800.0), 30);
    }

    #[test]
    fn zero_duration_finishes_immediately() {
        let run = AnimationRun::new(10.0, 42.0, 0.0);
        assert!(run.is_finished(10.0));
        assert_eq!(run.value_at(10.0), 42);
    }

    #[test]
    fn counter_never_exceeds_target() {
        for p in [0.0_f64, 1.0, 33.3, 50.0, 99.5, 100.0] {
            let run = AnimationRun::new(0.0, p, 1600.0);
            let mut prev = 0;
            for ms in (0..=1700).step_by(16) {
                let v = run.value_at(ms as f64);
                assert!(v >= prev);
                assert!(v <= run.final_value());
                prev = v;
            }
            assert_eq!(prev, p.round() as u32);
        }
    }
}
