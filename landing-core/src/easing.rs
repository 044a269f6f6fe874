use std::f64::consts::PI;

/// `0.5 * (1 - cos(PI * t))` with `t` clamped to `[0, 1]`.
pub fn ease_in_out_sine(t: f64) -> f64 {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    0.5 * (1.0 - (PI * t).cos())
}

/// CSS-style cubic Bézier timing curve anchored at (0,0) and (1,1).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CubicBezier {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl CubicBezier {
    /// Ease-in-out cubic used by the ring stroke transition.
    pub const EASE_IN_OUT_CUBIC: CubicBezier = CubicBezier {
        x1: 0.65,
        y1: 0.0,
        x2: 0.35,
        y2: 1.0,
    };

    pub fn css(&self) -> String {
        format!(
            "cubic-bezier({}, {}, {}, {})",
            self.x1, self.y1, self.x2, self.y2
        )
    }
}
