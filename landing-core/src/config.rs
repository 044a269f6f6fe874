use serde::{Deserialize, Serialize};

use crate::error::LandingError;
use crate::geometry::RING_RADIUS;
use crate::stagger::{STAGGER_MS, Stagger};
use crate::trigger::VISIBILITY_THRESHOLD;

/// Chat widgets the host platform injects uninvited.
pub const DEFAULT_SWEEP_SELECTORS: &[&str] = &[
    "#chat-widget",
    ".chat-widget",
    ".tawk-button",
    ".hubspot-chat",
    ".intercom-launcher",
    "[id*=\"chat\"]",
    "[class*=\"chat-bubble\"]",
];

/// Longest delay browser timers accept (ms).
pub const MAX_TIMER_MS: u32 = i32::MAX as u32;

const DEFAULT_SCOPE_CLASS: &str = "landing-eg";

/// Page tunables, read from an optional JSON block on the page.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LandingConfig {
    pub ring_radius: f64,
    pub stagger_ms: u32,
    pub ring_duration_ms: u32,
    pub counter_duration_ms: u32,
    pub visibility_threshold: f64,
    /// 0 disables the periodic sweep (the initial pass still runs).
    pub sweep_interval_ms: u32,
    pub sweep_selectors: Vec<String>,
    pub scope_class: String,
    pub debug: bool,
}

impl Default for LandingConfig {
    fn default() -> Self {
        LandingConfig {
            ring_radius: RING_RADIUS,
            stagger_ms: STAGGER_MS,
            ring_duration_ms: 1500,
            counter_duration_ms: 1600,
            visibility_threshold: VISIBILITY_THRESHOLD,
            sweep_interval_ms: 1000,
            sweep_selectors: DEFAULT_SWEEP_SELECTORS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            scope_class: DEFAULT_SCOPE_CLASS.to_string(),
            debug: false,
        }
    }
}

impl LandingConfig {
    /// Parse from JSON text. Blank text yields the defaults.
    pub fn from_json(text: &str) -> Result<Self, LandingError> {
        if text.trim().is_empty() {
            return Ok(LandingConfig::default());
        }
        let cfg: LandingConfig = serde_json::from_str(text)?;
        cfg.validate()
    }

    pub fn validate(mut self) -> Result<Self, LandingError> {
        if !(self.ring_radius.is_finite() && self.ring_radius > 0.0) {
            return Err(LandingError::InvalidConfig(format!(
                "ring_radius must be positive, got {}",
                self.ring_radius
            )));
        }
        if !self.visibility_threshold.is_finite() || self.visibility_threshold <= 0.0 {
            self.visibility_threshold = VISIBILITY_THRESHOLD;
        }
        self.visibility_threshold = self.visibility_threshold.min(1.0);
        self.stagger_ms = self.stagger_ms.min(MAX_TIMER_MS);
        self.sweep_interval_ms = self.sweep_interval_ms.min(MAX_TIMER_MS);
        // classList.add throws on empty tokens and tokens with whitespace
        if self.scope_class.is_empty() || self.scope_class.contains(char::is_whitespace) {
            self.scope_class = DEFAULT_SCOPE_CLASS.to_string();
        }
        self.sweep_selectors.retain(|s| !s.trim().is_empty());
        Ok(self)
    }

    pub fn stagger(&self) -> Stagger {
        Stagger::new(self.stagger_ms)
    }

    /// Selector list joined for a single `querySelectorAll` call.
    pub fn sweep_query(&self) -> Option<String> {
        if self.sweep_selectors.is_empty() {
            None
        } else {
            Some(self.sweep_selectors.join(", "))
        }
    }
}
