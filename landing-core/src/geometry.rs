use std::f64::consts::PI;

use crate::percent::clamp_percent;

/// Radius of the KPI ring stroke, matching `r` on the SVG circle.
pub const RING_RADIUS: f64 = 90.0;

pub fn circumference(radius: f64) -> f64 {
    2.0 * PI * radius
}

/// Circular stroke whose visible arc is controlled by its dash offset.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ring {
    pub radius: f64,
}

impl Default for Ring {
    fn default() -> Self {
        Ring {
            radius: RING_RADIUS,
        }
    }
}

impl Ring {
    pub fn new(radius: f64) -> Self {
        Ring { radius }
    }

    pub fn circumference(&self) -> f64 {
        circumference(self.radius)
    }

    /// Offset hiding the whole stroke (0% shown).
    pub fn initial_offset(&self) -> f64 {
        self.circumference()
    }

    /// Offset showing an arc proportional to `pct`.
    pub fn offset_for(&self, pct: f64) -> f64 {
        let c = self.circumference();
        c - c * clamp_percent(pct) / 100.0
    }
}
