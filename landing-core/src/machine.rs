//! Per-card animation lifecycle.
//!
//! A card moves `Idle -> Armed -> Running -> Done` and never goes back, which
//! is what makes a second visibility trigger harmless.

use crate::config::LandingConfig;
use crate::easing::CubicBezier;
use crate::geometry::Ring;
use crate::percent::clamp_percent;
use crate::run::AnimationRun;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum KpiPhase {
    Idle,
    Armed { start_at_ms: f64 },
    Running { run: AnimationRun, shown: u32 },
    Done { shown: u32 },
}

/// Declarative ring transition applied once when a run starts.
#[derive(Clone, Debug, PartialEq)]
pub struct RingTarget {
    pub offset: f64,
    /// Value for the CSS `transition` property.
    pub transition: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CounterFrame {
    pub value: u32,
    pub finished: bool,
}

#[derive(Clone, Debug)]
pub struct KpiMachine {
    phase: KpiPhase,
    ring: Ring,
    target_percent: f64,
    ring_duration_ms: f64,
    counter_duration_ms: f64,
    curve: CubicBezier,
}

impl KpiMachine {
    pub fn new(
        target_percent: f64,
        ring: Ring,
        ring_duration_ms: f64,
        counter_duration_ms: f64,
    ) -> Self {
        KpiMachine {
            phase: KpiPhase::Idle,
            ring,
            target_percent: clamp_percent(target_percent),
            ring_duration_ms: ring_duration_ms.max(0.0),
            counter_duration_ms: counter_duration_ms.max(0.0),
            curve: CubicBezier::EASE_IN_OUT_CUBIC,
        }
    }

    pub fn from_config(target_percent: f64, config: &LandingConfig) -> Self {
        KpiMachine::new(
            target_percent,
            Ring::new(config.ring_radius),
            config.ring_duration_ms as f64,
            config.counter_duration_ms as f64,
        )
    }

    pub fn phase(&self) -> KpiPhase {
        self.phase
    }

    pub fn ring(&self) -> Ring {
        self.ring
    }

    pub fn target_percent(&self) -> f64 {
        self.target_percent
    }

    /// Value the counter should currently display.
    pub fn shown(&self) -> u32 {
        match self.phase {
            KpiPhase::Running { shown, .. } | KpiPhase::Done { shown } => shown,
            _ => 0,
        }
    }

    /// Schedule the run `delay_ms` after `now_ms`. Only valid from `Idle`.
    pub fn arm(&mut self, now_ms: f64, delay_ms: u32) -> bool {
        if self.phase != KpiPhase::Idle {
            return false;
        }
        self.phase = KpiPhase::Armed {
            start_at_ms: now_ms + delay_ms as f64,
        };
        true
    }

    /// Start the run if the card is armed and its delay has elapsed.
    pub fn start(&mut self, now_ms: f64) -> Option<RingTarget> {
        let KpiPhase::Armed { start_at_ms } = self.phase else {
            return None;
        };
        if now_ms < start_at_ms {
            return None;
        }
        let run = AnimationRun::new(now_ms, self.target_percent, self.counter_duration_ms);
        self.phase = KpiPhase::Running { run, shown: 0 };
        Some(RingTarget {
            offset: self.ring.offset_for(self.target_percent),
            transition: format!(
                "stroke-dashoffset {}ms {}",
                self.ring_duration_ms,
                self.curve.css()
            ),
        })
    }

    /// Advance the counter. `None` means no further frames are needed.
    pub fn tick(&mut self, now_ms: f64) -> Option<CounterFrame> {
        let KpiPhase::Running { run, shown } = self.phase else {
            return None;
        };
        let value = run.value_at(now_ms).max(shown);
        if run.is_finished(now_ms) {
            let value = run.final_value();
            self.phase = KpiPhase::Done { shown: value };
            return Some(CounterFrame {
                value,
                finished: true,
            });
        }
        self.phase = KpiPhase::Running { run, shown: value };
        Some(CounterFrame {
            value,
            finished: false,
        })
    }
}
