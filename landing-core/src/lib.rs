//! Platform-independent logic behind the landing page KPI rings.
//!
//! Nothing in here touches the DOM: the browser crate builds typed views on
//! top of these pieces and only forwards timestamps and attribute strings.

pub mod config;
pub mod easing;
pub mod error;
pub mod geometry;
pub mod machine;
pub mod percent;
pub mod run;
pub mod stagger;
pub mod trigger;

pub use config::LandingConfig;
pub use easing::{CubicBezier, ease_in_out_sine};
pub use error::LandingError;
pub use geometry::{RING_RADIUS, Ring, circumference};
pub use machine::{CounterFrame, KpiMachine, KpiPhase, RingTarget};
pub use percent::parse_percent;
pub use run::AnimationRun;
pub use stagger::{STAGGER_MS, Stagger};
pub use trigger::{GroupTrigger, VISIBILITY_THRESHOLD, crosses_threshold, in_view_on_load};
