/// Delay between sibling KPI cards (ms).
pub const STAGGER_MS: u32 = 120;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Stagger {
    pub step_ms: u32,
}

impl Default for Stagger {
    fn default() -> Self {
        Stagger {
            step_ms: STAGGER_MS,
        }
    }
}

impl Stagger {
    pub fn new(step_ms: u32) -> Self {
        Stagger { step_ms }
    }

    pub fn delay_for(&self, index: usize) -> u32 {
        (index as u32).saturating_mul(self.step_ms)
    }
}
